//! Answer validation for flow steps.
//!
//! The baseline accepts any non-empty text for typed steps. Strict mode adds
//! format checks for phone numbers and email addresses. Choice steps always
//! resolve the answer to one of their options.

use regex::Regex;
use serde::Serialize;

use super::flows::{FlowStep, InputKind};

/// Why a non-empty answer was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The answer matched none of the step's options.
    NotAnOption,
    InvalidPhone,
    InvalidEmail,
    /// The bot is still composing; input is not accepted yet.
    Busy,
}

impl Rejection {
    /// Notice shown to the visitor.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::NotAnOption => "Please pick one of the options below 👇",
            Self::InvalidPhone => {
                "Hmm, that doesn't look like a phone number. Could you check it? 📱"
            }
            Self::InvalidEmail => {
                "Hmm, that doesn't look like an email address. Could you check it? ✉️"
            }
            Self::Busy => "One moment please…",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnOption => write!(f, "not_an_option"),
            Self::InvalidPhone => write!(f, "invalid_phone"),
            Self::InvalidEmail => write!(f, "invalid_email"),
            Self::Busy => write!(f, "busy"),
        }
    }
}

/// Outcome of checking one raw answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checked {
    /// Empty or whitespace-only; ignored silently.
    Empty,
    Rejected(Rejection),
    /// The value to store.
    Accepted(String),
}

/// Validates raw answers against a flow step.
#[derive(Debug, Clone)]
pub struct AnswerValidator {
    strict: bool,
    phone: Regex,
    email: Regex,
}

impl AnswerValidator {
    /// Create a validator. `strict` enables phone and email format checks.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            phone: Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap(),
            email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
        }
    }

    /// Check `raw` against `step`.
    pub fn check(&self, step: &FlowStep, raw: &str) -> Checked {
        let answer = raw.trim();
        if answer.is_empty() {
            return Checked::Empty;
        }

        match step.input {
            InputKind::Choice(options) => match resolve_choice(options, answer) {
                Some(option) => Checked::Accepted(option.to_string()),
                None => Checked::Rejected(Rejection::NotAnOption),
            },
            InputKind::Phone if self.strict && !self.is_phone(answer) => {
                Checked::Rejected(Rejection::InvalidPhone)
            }
            InputKind::Email if self.strict && !self.email.is_match(answer) => {
                Checked::Rejected(Rejection::InvalidEmail)
            }
            // Typed answers are stored as entered.
            _ => Checked::Accepted(raw.to_string()),
        }
    }

    fn is_phone(&self, answer: &str) -> bool {
        let digits = answer.chars().filter(char::is_ascii_digit).count();
        self.phone.is_match(answer) && (7..=15).contains(&digits)
    }
}

/// Resolve a 1-based option number or a case-insensitive option label.
pub fn resolve_choice(options: &'static [&'static str], answer: &str) -> Option<&'static str> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(answer))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::flows::{PARENT_FLOW, SCHOOL_FLOW};

    fn step(flow: &'static [FlowStep], id: &str) -> &'static FlowStep {
        flow.iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn empty_and_whitespace_are_empty() {
        let v = AnswerValidator::new(true);
        for raw in ["", "   ", "\t\n"] {
            assert_eq!(v.check(step(PARENT_FLOW, "name"), raw), Checked::Empty);
            assert_eq!(v.check(step(PARENT_FLOW, "interest"), raw), Checked::Empty);
        }
    }

    #[test]
    fn lenient_accepts_any_contact_text() {
        let v = AnswerValidator::new(false);
        assert_eq!(
            v.check(step(PARENT_FLOW, "phone"), "call me maybe"),
            Checked::Accepted("call me maybe".into())
        );
        assert_eq!(
            v.check(step(PARENT_FLOW, "email"), "not an email"),
            Checked::Accepted("not an email".into())
        );
    }

    #[test]
    fn strict_checks_phone() {
        let v = AnswerValidator::new(true);
        let phone = step(SCHOOL_FLOW, "phone");
        assert_eq!(
            v.check(phone, "+91 98765 43210"),
            Checked::Accepted("+91 98765 43210".into())
        );
        assert_eq!(v.check(phone, "(555) 010-9999"), Checked::Accepted("(555) 010-9999".into()));
        assert_eq!(v.check(phone, "12345"), Checked::Rejected(Rejection::InvalidPhone));
        assert_eq!(v.check(phone, "call me"), Checked::Rejected(Rejection::InvalidPhone));
    }

    #[test]
    fn strict_checks_email() {
        let v = AnswerValidator::new(true);
        let email = step(PARENT_FLOW, "email");
        assert_eq!(v.check(email, "a@b.co"), Checked::Accepted("a@b.co".into()));
        assert_eq!(v.check(email, "a@b"), Checked::Rejected(Rejection::InvalidEmail));
        assert_eq!(v.check(email, "a b@c.d"), Checked::Rejected(Rejection::InvalidEmail));
    }

    #[test]
    fn strict_leaves_free_text_alone() {
        let v = AnswerValidator::new(true);
        assert_eq!(
            v.check(step(PARENT_FLOW, "child_age"), "8, 11"),
            Checked::Accepted("8, 11".into())
        );
    }

    #[test]
    fn choices_by_number_or_label() {
        let v = AnswerValidator::new(false);
        let urgency = step(PARENT_FLOW, "urgency");
        assert_eq!(v.check(urgency, "1"), Checked::Accepted("ASAP".into()));
        assert_eq!(v.check(urgency, " next month "), Checked::Accepted("Next month".into()));
        assert_eq!(v.check(urgency, "0"), Checked::Rejected(Rejection::NotAnOption));
        assert_eq!(v.check(urgency, "4"), Checked::Rejected(Rejection::NotAnOption));
        assert_eq!(v.check(urgency, "tomorrow"), Checked::Rejected(Rejection::NotAnOption));
    }

    #[test]
    fn resolve_choice_handles_non_ascii_labels() {
        let counts = step(SCHOOL_FLOW, "student_count").input.options().unwrap();
        assert_eq!(resolve_choice(counts, "200 – 500"), Some("200 – 500"));
        assert_eq!(resolve_choice(counts, "4"), Some("1000+"));
    }
}
