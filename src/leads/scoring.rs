//! Lead scoring: additive 0–100 priority heuristic and display bands.

use serde::{Deserialize, Serialize};

use super::model::{LeadDetails, LeadField, UserType};

/// Upper bound of every score.
pub const MAX_SCORE: u32 = 100;

/// Scores at or above this are hot leads.
pub const HOT_THRESHOLD: u32 = 70;

/// Scores at or above this (and below hot) are warm leads.
pub const WARM_THRESHOLD: u32 = 40;

const SCHOOL_BONUS: u32 = 30;
const SIZE_BONUS: u32 = 20;
const URGENCY_BONUS: u32 = 25;
const EMAIL_BONUS: u32 = 15;
const PHONE_BONUS: u32 = 10;

/// The only urgency answer that earns the urgency bonus. Neither flow
/// offers it as a choice.
pub const IMMEDIATE_URGENCY: &str = "immediate";

/// Compute the priority score of a lead, clamped to [0, 100].
pub fn score(details: &LeadDetails) -> u32 {
    let mut total = 0;

    if details.user_type == UserType::School {
        total += SCHOOL_BONUS;
    }
    if details.children_count.is_some_and(|n| n > 1)
        || student_count_value(details).is_some_and(|n| n > 100)
    {
        total += SIZE_BONUS;
    }
    if details.urgency.as_deref() == Some(IMMEDIATE_URGENCY) {
        total += URGENCY_BONUS;
    }
    if details.has(LeadField::Email) {
        total += EMAIL_BONUS;
    }
    if details.has(LeadField::Phone) {
        total += PHONE_BONUS;
    }

    total.min(MAX_SCORE)
}

/// Numeric reading of the student count answer.
///
/// Only a bare integer counts; bucket labels like "1000+" or "< 200" yield
/// `None`, so the size bonus never fires for flow-collected answers.
fn student_count_value(details: &LeadDetails) -> Option<u64> {
    details
        .student_count
        .as_deref()
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Display classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Hot,
    Warm,
    Exploring,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= HOT_THRESHOLD {
            Self::Hot
        } else if score >= WARM_THRESHOLD {
            Self::Warm
        } else {
            Self::Exploring
        }
    }

    /// Badge label shown next to the score.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hot => "Hot Lead 🔥",
            Self::Warm => "Warm Lead ☀️",
            Self::Exploring => "Exploring 🌱",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hot => write!(f, "hot"),
            Self::Warm => write!(f, "warm"),
            Self::Exploring => write!(f, "exploring"),
        }
    }
}
