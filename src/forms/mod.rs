//! Remote-backed data-capture forms
//!
//! `schema` describes forms, `catalog` holds one schema per form, `values`
//! and `payload` hold and serialise answers, and `controller` runs the
//! load/edit/validate/save lifecycle against a `Gateway`.

pub mod catalog;
pub mod controller;
pub mod errors;
pub mod payload;
pub mod schema;
pub mod values;

pub use controller::{FormContext, FormController, FormPhase};
pub use errors::FormError;
pub use schema::{ChoiceOption, FieldKind, FieldSpec, FormKind, FormSchema, MultiEncoding};
pub use values::{toggle_chip, FieldValue, FormValues};
