//! Field values of one form instance

use chrono::NaiveDate;

use crate::forms::errors::FormError;
use crate::forms::schema::{ChoiceOption, FieldKind, FieldSpec, FormSchema};
use crate::models::{display_date, parse_date};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    /// Free text, numeric text, or the id of a selected choice
    Text(String),
    Date(NaiveDate),
    /// Selected option ids in selection order
    Multi(Vec<String>),
    Rating(u8),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Multi(ids) => ids.is_empty(),
            FieldValue::Date(_) | FieldValue::Rating(_) => false,
        }
    }

    /// Human-readable rendering; dates use `DD-MM-YYYY`, options their labels
    pub fn display(&self, spec: &FieldSpec) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => spec.option_label(s).map(str::to_string).unwrap_or_else(|| s.clone()),
            FieldValue::Date(date) => display_date(*date),
            FieldValue::Multi(ids) => ids
                .iter()
                .map(|id| spec.option_label(id).unwrap_or(id.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Rating(value) => value.to_string(),
        }
    }
}

/// Chip-style multi-select: a selected value is removed, a new one appended
pub fn toggle_chip(selected: &mut Vec<String>, value: &str) {
    if let Some(pos) = selected.iter().position(|v| v == value) {
        selected.remove(pos);
    } else {
        selected.push(value.to_string());
    }
}

fn match_option(options: &[ChoiceOption], input: &str) -> Option<&'static str> {
    let input = input.trim();
    options
        .iter()
        .find(|o| o.id == input)
        .or_else(|| options.iter().find(|o| o.id.eq_ignore_ascii_case(input) || o.label.eq_ignore_ascii_case(input)))
        .map(|o| o.id)
}

#[derive(Debug, Clone)]
pub struct FormValues {
    schema: &'static FormSchema,
    values: Vec<FieldValue>,
}

impl PartialEq for FormValues {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl FormValues {
    /// Blank form: dates marked "defaults to today" get `today`, the rest empty
    pub fn defaults(schema: &'static FormSchema, today: NaiveDate) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| match field.kind {
                FieldKind::Date { default_today: true } => FieldValue::Date(today),
                _ => FieldValue::Empty,
            })
            .collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> {
        self.schema.fields.iter().zip(self.values.iter())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.schema.index_of(key).and_then(|i| self.values.get(i))
    }

    /// Text content of a field, empty for non-text values
    pub fn text(&self, key: &str) -> &str {
        match self.get(key) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn rating(&self, key: &str) -> Option<u8> {
        match self.get(key) {
            Some(FieldValue::Rating(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.get(key) {
            Some(FieldValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn multi(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(FieldValue::Multi(ids)) => ids.as_slice(),
            _ => &[],
        }
    }

    fn spec(&self, key: &str) -> Result<(usize, &'static FieldSpec), FormError> {
        self.schema
            .index_of(key)
            .map(|i| (i, &self.schema.fields[i]))
            .ok_or_else(|| FormError::UnknownField {
                form: self.schema.title.to_string(),
                field: key.to_string(),
            })
    }

    /// Store a typed value after checking it fits the field
    pub fn set(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        let (index, spec) = self.spec(key)?;
        let value = check_value(spec, value)?;
        self.values[index] = value;
        Ok(())
    }

    /// Parse user input for a field and store it. Empty input clears it.
    pub fn set_input(&mut self, key: &str, input: &str) -> Result<(), FormError> {
        let (_, spec) = self.spec(key)?;
        let value = parse_input(spec, input)?;
        self.set(key, value)
    }

    /// Chip tap: toggles membership on multi-selects, selects on choices
    pub fn toggle_option(&mut self, key: &str, option: &str) -> Result<(), FormError> {
        let (index, spec) = self.spec(key)?;
        let id = match_option(spec.options(), option).ok_or_else(|| invalid(spec, format!("'{}' is not an option", option)))?;

        match spec.kind {
            FieldKind::Multi { .. } => {
                let mut selected = self.multi(key).to_vec();
                toggle_chip(&mut selected, id);
                self.values[index] = FieldValue::Multi(selected);
            }
            FieldKind::Choice(_) => {
                self.values[index] = FieldValue::text(id);
            }
            _ => return Err(invalid(spec, "field has no options".to_string())),
        }
        Ok(())
    }

    /// Whether a field is relevant given its reveal condition
    pub fn is_revealed(&self, spec: &FieldSpec) -> bool {
        spec.reveal.map_or(true, |reveal| self.text(reveal.parent) == reveal.value)
    }

    pub fn is_revealed_key(&self, key: &str) -> bool {
        self.schema.field(key).map_or(false, |spec| self.is_revealed(spec))
    }

    /// Required, currently relevant fields that have no value
    pub fn missing_required(&self) -> Vec<&'static FieldSpec> {
        self.iter()
            .filter(|(spec, value)| spec.required && self.is_revealed(spec) && value.is_empty())
            .map(|(spec, _)| spec)
            .collect()
    }
}

fn invalid(spec: &FieldSpec, reason: String) -> FormError {
    FormError::InvalidValue {
        field: spec.label.to_string(),
        reason,
    }
}

/// Digits with at most one decimal point (`12`, `7.5`, `.5`)
fn is_decimal(s: &str) -> bool {
    let mut digits = 0;
    let mut points = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

fn check_value(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue, FormError> {
    if value.is_empty() {
        return match value {
            FieldValue::Multi(_) if matches!(spec.kind, FieldKind::Multi { .. }) => Ok(FieldValue::Multi(Vec::new())),
            _ => Ok(FieldValue::Empty),
        };
    }

    match (spec.kind, value) {
        (FieldKind::Text | FieldKind::LongText, FieldValue::Text(s)) => Ok(FieldValue::Text(s)),
        (FieldKind::Number, FieldValue::Text(s)) => {
            if is_decimal(s.trim()) {
                Ok(FieldValue::Text(s.trim().to_string()))
            } else {
                Err(invalid(spec, format!("'{}' is not a number", s)))
            }
        }
        (FieldKind::Date { .. }, FieldValue::Date(d)) => Ok(FieldValue::Date(d)),
        (FieldKind::Choice(options), FieldValue::Text(s)) => match_option(options, &s)
            .map(FieldValue::text)
            .ok_or_else(|| invalid(spec, format!("'{}' is not an option", s))),
        (FieldKind::Multi { options, .. }, FieldValue::Multi(ids)) => {
            let mut selected: Vec<String> = Vec::new();
            for id in ids {
                let id = match_option(options, &id).ok_or_else(|| invalid(spec, format!("'{}' is not an option", id)))?;
                if !selected.iter().any(|s| s == id) {
                    selected.push(id.to_string());
                }
            }
            Ok(FieldValue::Multi(selected))
        }
        (FieldKind::Rating { min, max }, FieldValue::Rating(v)) => {
            if (min..=max).contains(&v) {
                Ok(FieldValue::Rating(v))
            } else {
                Err(invalid(spec, format!("{} is outside {}..={}", v, min, max)))
            }
        }
        (_, other) => Err(invalid(spec, format!("{:?} does not fit this field", other))),
    }
}

fn parse_input(spec: &FieldSpec, input: &str) -> Result<FieldValue, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(FieldValue::Empty);
    }

    match spec.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Number | FieldKind::Choice(_) => {
            Ok(FieldValue::text(input))
        }
        FieldKind::Date { .. } => parse_date(input)
            .map(FieldValue::Date)
            .ok_or_else(|| invalid(spec, "use DD-MM-YYYY or YYYY-MM-DD".to_string())),
        FieldKind::Multi { .. } => Ok(FieldValue::Multi(
            input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        FieldKind::Rating { .. } => input
            .parse::<u8>()
            .map(FieldValue::Rating)
            .map_err(|_| invalid(spec, format!("'{}' is not a whole number", input))),
    }
}
