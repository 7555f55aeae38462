//! Derived questionnaire scores
//!
//! Pure functions from item answers to summed outputs. Nothing here keeps
//! state; scores are recomputed from the current answers whenever needed.

pub mod fact_g;
pub mod distress;

pub use fact_g::{FactGScores, Polarity, Subscale};
pub use distress::{DistressIndex, ProblemArea};
