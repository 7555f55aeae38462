//! Client-side pagination over already-fetched rows

/// Anything shown a page at a time
pub trait Paginated {
    /// Current page number (0-based)
    fn current_page(&self) -> usize;

    fn set_current_page(&mut self, page: usize);

    fn total_pages(&self) -> usize;

    fn items_per_page(&self) -> usize;

    fn next_page(&mut self) {
        let current = self.current_page();
        if current + 1 < self.total_pages() {
            self.set_current_page(current + 1);
        }
    }

    fn previous_page(&mut self) {
        let current = self.current_page();
        if current > 0 {
            self.set_current_page(current - 1);
        }
    }

    fn go_to_first_page(&mut self) {
        self.set_current_page(0);
    }

    fn go_to_last_page(&mut self) {
        let total = self.total_pages();
        if total > 0 {
            self.set_current_page(total - 1);
        }
    }
}

/// Rows plus a page cursor. A page is a plain slice of `items`.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    page: usize,
    per_page: usize,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self {
            items,
            page: 0,
            per_page: per_page.max(1),
        }
    }

    /// Replace the rows, keeping the cursor in range
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = self.page.min(self.total_pages().saturating_sub(1));
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_items(&self) -> &[T] {
        let start = (self.page * self.per_page).min(self.items.len());
        let end = (start + self.per_page).min(self.items.len());
        &self.items[start..end]
    }

    /// Index into `items` of row `row` on the current page
    pub fn absolute_index(&self, row: usize) -> usize {
        self.page * self.per_page + row
    }

    /// Move the cursor to the page holding `index`
    pub fn show_index(&mut self, index: usize) {
        if index < self.items.len() {
            self.page = index / self.per_page;
        }
    }
}

impl<T> Paginated for PagedList<T> {
    fn current_page(&self) -> usize {
        self.page
    }

    fn set_current_page(&mut self, page: usize) {
        self.page = page.min(self.total_pages().saturating_sub(1));
    }

    fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    fn items_per_page(&self) -> usize {
        self.per_page
    }
}
