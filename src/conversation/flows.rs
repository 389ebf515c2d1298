//! Static question flows, one per visitor type.

use crate::leads::{LeadField, UserType};

/// How a step expects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Phone,
    Email,
    /// Exactly one of the listed values.
    Choice(&'static [&'static str]),
}

impl InputKind {
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match *self {
            Self::Choice(options) => Some(options),
            _ => None,
        }
    }
}

/// One question in a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowStep {
    pub id: &'static str,
    pub prompt: &'static str,
    pub field: LeadField,
    pub input: InputKind,
    /// Hint shown in the empty input for typed steps.
    pub placeholder: Option<&'static str>,
}

const PARENT_INTERESTS: &[&str] = &[
    "Coding & Robotics",
    "Math & Logic",
    "Science Experiments",
    "All STEM Areas",
];

const PARENT_URGENCY: &[&str] = &["ASAP", "Next month", "Just exploring"];

const STUDENT_COUNTS: &[&str] = &["< 200", "200 – 500", "500 – 1000", "1000+"];

const SCHOOL_PROGRAMS: &[&str] = &[
    "STEM Curriculum Integration",
    "After-School Clubs",
    "Teacher Training",
    "Full School Partnership",
];

const SCHOOL_TIMELINE: &[&str] = &[
    "This academic year",
    "Next academic year",
    "Exploring options",
];

pub const PARENT_FLOW: &[FlowStep] = &[
    FlowStep {
        id: "name",
        prompt: "What's your name? 😊",
        field: LeadField::Name,
        input: InputKind::Text,
        placeholder: Some("Your full name"),
    },
    FlowStep {
        id: "child_age",
        prompt: "How old is your child? (or enter multiple ages if you have more than one)",
        field: LeadField::ChildAge,
        input: InputKind::Text,
        placeholder: Some("e.g. 8, 11"),
    },
    FlowStep {
        id: "interest",
        prompt: "What are you most interested in for your child?",
        field: LeadField::Interest,
        input: InputKind::Choice(PARENT_INTERESTS),
        placeholder: None,
    },
    FlowStep {
        id: "urgency",
        prompt: "When are you looking to start?",
        field: LeadField::Urgency,
        input: InputKind::Choice(PARENT_URGENCY),
        placeholder: None,
    },
    FlowStep {
        id: "phone",
        prompt: "Great! What's the best phone number to reach you?",
        field: LeadField::Phone,
        input: InputKind::Phone,
        placeholder: Some("10-digit mobile number"),
    },
    FlowStep {
        id: "email",
        prompt: "And your email address?",
        field: LeadField::Email,
        input: InputKind::Email,
        placeholder: Some("you@example.com"),
    },
];

pub const SCHOOL_FLOW: &[FlowStep] = &[
    FlowStep {
        id: "name",
        prompt: "Wonderful! May I know your name and your role at the school? 🏫",
        field: LeadField::Name,
        input: InputKind::Text,
        placeholder: Some("Name & Title (e.g. Priya Sharma, Principal)"),
    },
    FlowStep {
        id: "school_name",
        prompt: "What's the name of your school?",
        field: LeadField::SchoolName,
        input: InputKind::Text,
        placeholder: Some("School name"),
    },
    FlowStep {
        id: "student_count",
        prompt: "How many students does your school have?",
        field: LeadField::StudentCount,
        input: InputKind::Choice(STUDENT_COUNTS),
        placeholder: None,
    },
    FlowStep {
        id: "program_interest",
        prompt: "Which partnership program interests you?",
        field: LeadField::ProgramInterest,
        input: InputKind::Choice(SCHOOL_PROGRAMS),
        placeholder: None,
    },
    FlowStep {
        id: "timeline",
        prompt: "What's your expected timeline?",
        field: LeadField::Urgency,
        input: InputKind::Choice(SCHOOL_TIMELINE),
        placeholder: None,
    },
    FlowStep {
        id: "phone",
        prompt: "What's the best phone number to connect with you?",
        field: LeadField::Phone,
        input: InputKind::Phone,
        placeholder: Some("Your mobile number"),
    },
    FlowStep {
        id: "email",
        prompt: "And your official email?",
        field: LeadField::Email,
        input: InputKind::Email,
        placeholder: Some("you@school.com"),
    },
];

/// The flow for a visitor type.
pub fn flow_for(user_type: UserType) -> &'static [FlowStep] {
    match user_type {
        UserType::Parent => PARENT_FLOW,
        UserType::School => SCHOOL_FLOW,
    }
}
