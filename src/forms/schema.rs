//! Static form descriptions
//!
//! A `FormSchema` is everything that differs between two data-capture forms:
//! endpoints, primary key column, fields, and the optional form-specific
//! validation rule and derived values. The lifecycle itself lives in the
//! controller and is the same for every form.

use serde_json::Value;

use crate::forms::values::FormValues;

/// Every form the client can capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    AdverseEvent,
    ExitInterview,
    InformedConsent,
    Screening,
    PreVrQuestionnaire,
    PostVrQuestionnaire,
    StudyObservation,
    FactG,
    DistressThermometer,
}

impl FormKind {
    pub const ALL: [FormKind; 9] = [
        FormKind::Screening,
        FormKind::InformedConsent,
        FormKind::PreVrQuestionnaire,
        FormKind::PostVrQuestionnaire,
        FormKind::FactG,
        FormKind::DistressThermometer,
        FormKind::StudyObservation,
        FormKind::AdverseEvent,
        FormKind::ExitInterview,
    ];

    /// Command-line name
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::AdverseEvent => "adverse-event",
            FormKind::ExitInterview => "exit-interview",
            FormKind::InformedConsent => "informed-consent",
            FormKind::Screening => "screening",
            FormKind::PreVrQuestionnaire => "pre-vr",
            FormKind::PostVrQuestionnaire => "post-vr",
            FormKind::StudyObservation => "study-observation",
            FormKind::FactG => "fact-g",
            FormKind::DistressThermometer => "distress",
        }
    }

    pub fn title(&self) -> &'static str {
        self.schema().title
    }

    pub fn parse(value: &str) -> Option<FormKind> {
        let normalized = value.trim().to_lowercase().replace('_', "-");
        FormKind::ALL.into_iter().find(|kind| kind.as_str() == normalized)
    }

    pub fn schema(&self) -> &'static FormSchema {
        crate::forms::catalog::schema_for(*self)
    }
}

/// One selectable option of a choice or multi-select field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Identifier sent to the backend
    pub id: &'static str,
    pub label: &'static str,
}

impl ChoiceOption {
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label }
    }
}

pub const YES_NO: &[ChoiceOption] = &[
    ChoiceOption::new("Yes", "Yes"),
    ChoiceOption::new("No", "No"),
];

pub const YES_NO_UNCERTAIN: &[ChoiceOption] = &[
    ChoiceOption::new("Yes", "Yes"),
    ChoiceOption::new("No", "No"),
    ChoiceOption::new("Uncertain", "Uncertain"),
];

/// Wire encoding of a multi-select answer. Endpoints disagree, so this is
/// declared per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiEncoding {
    /// `"1,4,7"`
    CommaJoined,
    /// `[{"Id": 1}, {"Id": 4}, {"Id": 7}]`
    IdObjects,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    LongText,
    /// Digits with an optional decimal point, kept as text
    Number,
    Date { default_today: bool },
    Choice(&'static [ChoiceOption]),
    Multi {
        options: &'static [ChoiceOption],
        encoding: MultiEncoding,
    },
    /// Integer rating in `min..=max`
    Rating { min: u8, max: u8 },
}

/// A field only matters while `parent` holds `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub parent: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Local name, used on the command line and in `FormValues`
    pub key: &'static str,
    /// Backend column name
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub reveal: Option<Reveal>,
}

impl FieldSpec {
    pub const fn new(key: &'static str, column: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            column,
            label,
            kind,
            required: false,
            reveal: None,
        }
    }

    pub const fn text(key: &'static str, column: &'static str, label: &'static str) -> Self {
        Self::new(key, column, label, FieldKind::Text)
    }

    pub const fn long_text(key: &'static str, column: &'static str, label: &'static str) -> Self {
        Self::new(key, column, label, FieldKind::LongText)
    }

    pub const fn number(key: &'static str, column: &'static str, label: &'static str) -> Self {
        Self::new(key, column, label, FieldKind::Number)
    }

    pub const fn date(key: &'static str, column: &'static str, label: &'static str) -> Self {
        Self::new(key, column, label, FieldKind::Date { default_today: false })
    }

    /// Date field that starts out as today on a blank form
    pub const fn today(key: &'static str, column: &'static str, label: &'static str) -> Self {
        Self::new(key, column, label, FieldKind::Date { default_today: true })
    }

    pub const fn choice(
        key: &'static str,
        column: &'static str,
        label: &'static str,
        options: &'static [ChoiceOption],
    ) -> Self {
        Self::new(key, column, label, FieldKind::Choice(options))
    }

    pub const fn multi(
        key: &'static str,
        column: &'static str,
        label: &'static str,
        options: &'static [ChoiceOption],
        encoding: MultiEncoding,
    ) -> Self {
        Self::new(key, column, label, FieldKind::Multi { options, encoding })
    }

    pub const fn rating(key: &'static str, column: &'static str, label: &'static str, min: u8, max: u8) -> Self {
        Self::new(key, column, label, FieldKind::Rating { min, max })
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn revealed_by(self, parent: &'static str, value: &'static str) -> Self {
        Self {
            reveal: Some(Reveal { parent, value }),
            ..self
        }
    }

    pub fn options(&self) -> &'static [ChoiceOption] {
        match self.kind {
            FieldKind::Choice(options) => options,
            FieldKind::Multi { options, .. } => options,
            _ => &[],
        }
    }

    pub fn option_label(&self, id: &str) -> Option<&'static str> {
        self.options().iter().find(|o| o.id == id).map(|o| o.label)
    }
}

/// Form-specific validation run after the required-field check
pub type RuleCheck = fn(&FormValues) -> Result<(), String>;

/// Extra payload columns computed from the answers
pub type Derive = fn(&FormValues) -> Vec<(&'static str, Value)>;

#[derive(Debug)]
pub struct FormSchema {
    pub kind: FormKind,
    pub title: &'static str,
    /// Fetched together on load; first rows are merged in this order
    pub load_endpoints: &'static [&'static str],
    pub save_endpoint: &'static str,
    /// Primary key column, `null` until the first save
    pub id_column: &'static str,
    /// Column carrying the selected date on weekly/dated forms
    pub date_column: Option<&'static str>,
    pub fields: &'static [FieldSpec],
    pub check: Option<RuleCheck>,
    pub derive: Option<Derive>,
}

impl FormSchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn is_dated(&self) -> bool {
        self.date_column.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_kind_parse_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FormKind::parse("Adverse_Event"), Some(FormKind::AdverseEvent));
        assert_eq!(FormKind::parse("lab-results"), None);
    }

    #[test]
    fn test_field_builders() {
        let field = FieldSpec::long_text("reason", "Reason", "Reason").required().revealed_by("completed", "No");
        assert!(field.required);
        assert_eq!(field.reveal, Some(Reveal { parent: "completed", value: "No" }));

        let choice = FieldSpec::choice("related", "IsRelated", "Related", YES_NO_UNCERTAIN);
        assert_eq!(choice.options().len(), 3);
        assert_eq!(choice.option_label("Uncertain"), Some("Uncertain"));
        assert!(FieldSpec::text("a", "A", "A").options().is_empty());
    }
}
