//! Distress thermometer index

use serde::Serialize;

/// Highest self-rating on the thermometer
pub const MAX_RATING: u8 = 10;
/// Ratings at or above this are clinically significant
pub const SIGNIFICANT_RATING: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProblemArea {
    Practical,
    Family,
    Emotional,
    Spiritual,
    Physical,
}

impl ProblemArea {
    pub const ALL: [ProblemArea; 5] = [
        ProblemArea::Practical,
        ProblemArea::Family,
        ProblemArea::Emotional,
        ProblemArea::Spiritual,
        ProblemArea::Physical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemArea::Practical => "Practical",
            ProblemArea::Family => "Family",
            ProblemArea::Emotional => "Emotional",
            ProblemArea::Spiritual => "Spiritual/religious",
            ProblemArea::Physical => "Physical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DistressIndex {
    pub rating: Option<u8>,
    /// Ticked problems per area, in `ProblemArea::ALL` order
    pub problems_by_area: Vec<(ProblemArea, usize)>,
    pub total_problems: usize,
    pub significant: bool,
}

impl DistressIndex {
    /// `problems` gives the number of ticked checklist entries for an area
    pub fn compute<F>(rating: Option<u8>, problems: F) -> Self
    where
        F: Fn(ProblemArea) -> usize,
    {
        let rating = rating.map(|r| r.min(MAX_RATING));
        let problems_by_area: Vec<(ProblemArea, usize)> =
            ProblemArea::ALL.iter().map(|area| (*area, problems(*area))).collect();
        let total_problems = problems_by_area.iter().map(|(_, n)| n).sum();

        Self {
            rating,
            problems_by_area,
            total_problems,
            significant: rating.map_or(false, |r| r >= SIGNIFICANT_RATING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_counts_and_threshold() {
        let index = DistressIndex::compute(Some(6), |area| match area {
            ProblemArea::Practical => 2,
            ProblemArea::Physical => 3,
            _ => 0,
        });
        assert_eq!(index.total_problems, 5);
        assert!(index.significant);
        assert_eq!(index.problems_by_area[0], (ProblemArea::Practical, 2));
    }

    #[test]
    fn test_low_or_missing_rating_is_not_significant() {
        assert!(!DistressIndex::compute(Some(3), |_| 1).significant);
        assert!(!DistressIndex::compute(None, |_| 0).significant);
        assert_eq!(DistressIndex::compute(Some(14), |_| 0).rating, Some(10));
    }
}
