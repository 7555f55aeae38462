//! FACT-G quality-of-life scoring
//!
//! Four subscales, each item answered 0 ("not at all") to 4 ("very much").
//! Negatively worded items are reversed before summing.

use serde::Serialize;

/// Highest answer on the FACT-G scale
pub const MAX_ITEM_VALUE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Subscale {
    Physical,
    SocialFamily,
    Emotional,
    Functional,
}

impl Subscale {
    pub const ALL: [Subscale; 4] = [
        Subscale::Physical,
        Subscale::SocialFamily,
        Subscale::Emotional,
        Subscale::Functional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subscale::Physical => "Physical well-being",
            Subscale::SocialFamily => "Social/Family well-being",
            Subscale::Emotional => "Emotional well-being",
            Subscale::Functional => "Functional well-being",
        }
    }

    /// Backend column the subscale score is stored in
    pub fn column(&self) -> &'static str {
        match self {
            Subscale::Physical => "PWBScore",
            Subscale::SocialFamily => "SWBScore",
            Subscale::Emotional => "EWBScore",
            Subscale::Functional => "FWBScore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Item contribution for a raw answer
    pub fn score(&self, value: u8) -> u32 {
        let value = value.min(MAX_ITEM_VALUE);
        match self {
            Polarity::Positive => value as u32,
            Polarity::Negative => (MAX_ITEM_VALUE - value) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactGItem {
    pub code: &'static str,
    pub subscale: Subscale,
    pub polarity: Polarity,
}

const fn item(code: &'static str, subscale: Subscale, polarity: Polarity) -> FactGItem {
    FactGItem { code, subscale, polarity }
}

use Polarity::{Negative as N, Positive as P};
use Subscale::{Emotional as EWB, Functional as FWB, Physical as PWB, SocialFamily as SWB};

/// The 27 FACT-G (version 4) items in questionnaire order
pub const ITEMS: [FactGItem; 27] = [
    item("GP1", PWB, N),
    item("GP2", PWB, N),
    item("GP3", PWB, N),
    item("GP4", PWB, N),
    item("GP5", PWB, N),
    item("GP6", PWB, N),
    item("GP7", PWB, N),
    item("GS1", SWB, P),
    item("GS2", SWB, P),
    item("GS3", SWB, P),
    item("GS4", SWB, P),
    item("GS5", SWB, P),
    item("GS6", SWB, P),
    item("GS7", SWB, P),
    item("GE1", EWB, N),
    item("GE2", EWB, P),
    item("GE3", EWB, N),
    item("GE4", EWB, N),
    item("GE5", EWB, N),
    item("GE6", EWB, N),
    item("GF1", FWB, P),
    item("GF2", FWB, P),
    item("GF3", FWB, P),
    item("GF4", FWB, P),
    item("GF5", FWB, P),
    item("GF6", FWB, P),
    item("GF7", FWB, P),
];

/// Sum of item scores for one subscale's `(raw value, polarity)` answers
pub fn subscale_score(answers: &[(u8, Polarity)]) -> u32 {
    answers.iter().map(|(value, polarity)| polarity.score(*value)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FactGScores {
    pub physical: u32,
    pub social_family: u32,
    pub emotional: u32,
    pub functional: u32,
    pub total: u32,
    /// Items that had an answer
    pub answered: usize,
}

impl FactGScores {
    /// Score a full questionnaire. `answer` is looked up by item code;
    /// unanswered items contribute nothing.
    pub fn compute<F>(answer: F) -> Self
    where
        F: Fn(&str) -> Option<u8>,
    {
        let mut scores = FactGScores::default();

        for subscale in Subscale::ALL {
            let answers: Vec<(u8, Polarity)> = ITEMS
                .iter()
                .filter(|item| item.subscale == subscale)
                .filter_map(|item| answer(item.code).map(|value| (value, item.polarity)))
                .collect();
            scores.answered += answers.len();

            let score = subscale_score(&answers);
            match subscale {
                Subscale::Physical => scores.physical = score,
                Subscale::SocialFamily => scores.social_family = score,
                Subscale::Emotional => scores.emotional = score,
                Subscale::Functional => scores.functional = score,
            }
        }

        scores.total = scores.physical + scores.social_family + scores.emotional + scores.functional;
        scores
    }

    pub fn subscale(&self, subscale: Subscale) -> u32 {
        match subscale {
            Subscale::Physical => self.physical,
            Subscale::SocialFamily => self.social_family,
            Subscale::Emotional => self.emotional,
            Subscale::Functional => self.functional,
        }
    }
}
