//! Lead data model. A lead is the set of answers one visitor gave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which kind of visitor a conversation is with. Chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Parent,
    School,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::School => write!(f, "school"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "school" => Ok(Self::School),
            _ => Err(format!("Unknown user type: {}", s)),
        }
    }
}

/// A lead attribute a flow step can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadField {
    Name,
    ChildAge,
    Interest,
    Urgency,
    Phone,
    Email,
    SchoolName,
    StudentCount,
    ProgramInterest,
}

impl std::fmt::Display for LeadField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::ChildAge => "childAge",
            Self::Interest => "interest",
            Self::Urgency => "urgency",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::SchoolName => "schoolName",
            Self::StudentCount => "studentCount",
            Self::ProgramInterest => "programInterest",
        };
        write!(f, "{s}")
    }
}

/// Answers collected for one visitor.
///
/// Used both as the in-progress draft and as the body of a finalized [`Lead`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetails {
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    /// Bucket label such as "1000+", not a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_interest: Option<String>,
    /// Read by scoring but never asked for by either flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_count: Option<u32>,
}

impl LeadDetails {
    /// Empty record for a visitor of the given type.
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            name: None,
            child_age: None,
            interest: None,
            urgency: None,
            phone: None,
            email: None,
            school_name: None,
            student_count: None,
            program_interest: None,
            children_count: None,
        }
    }

    fn slot_mut(&mut self, field: LeadField) -> &mut Option<String> {
        match field {
            LeadField::Name => &mut self.name,
            LeadField::ChildAge => &mut self.child_age,
            LeadField::Interest => &mut self.interest,
            LeadField::Urgency => &mut self.urgency,
            LeadField::Phone => &mut self.phone,
            LeadField::Email => &mut self.email,
            LeadField::SchoolName => &mut self.school_name,
            LeadField::StudentCount => &mut self.student_count,
            LeadField::ProgramInterest => &mut self.program_interest,
        }
    }

    /// Store an answer under `field`, replacing any earlier value.
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Read the answer stored under `field`.
    pub fn get(&self, field: LeadField) -> Option<&str> {
        let slot = match field {
            LeadField::Name => &self.name,
            LeadField::ChildAge => &self.child_age,
            LeadField::Interest => &self.interest,
            LeadField::Urgency => &self.urgency,
            LeadField::Phone => &self.phone,
            LeadField::Email => &self.email,
            LeadField::SchoolName => &self.school_name,
            LeadField::StudentCount => &self.student_count,
            LeadField::ProgramInterest => &self.program_interest,
        };
        slot.as_deref()
    }

    /// Whether `field` holds a non-empty answer.
    pub fn has(&self, field: LeadField) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }

    /// First word of the visitor's name, or an empty string.
    pub fn first_name(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|n| n.split(' ').next())
            .unwrap_or("")
    }
}

/// A finalized lead, appended to the store once its flow is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: LeadDetails,
}

impl Lead {
    /// Finalize a completed draft.
    pub fn new(details: LeadDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            details,
        }
    }

    pub fn user_type(&self) -> UserType {
        self.details.user_type
    }
}
