//! Shared active enums
//!
//! Enumerations stored as compact one-letter (or numeric) codes. The codes are
//! the stored representation and must never change once rows exist.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Action half of a permission.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[sea_orm(string_value = "C")]
    Create,
    #[sea_orm(string_value = "R")]
    Read,
    #[sea_orm(string_value = "U")]
    Update,
    #[sea_orm(string_value = "D")]
    Delete,
}

impl Action {
    /// Stored one-letter code.
    pub fn code(&self) -> char {
        match self {
            Action::Create => 'C',
            Action::Read => 'R',
            Action::Update => 'U',
            Action::Delete => 'D',
        }
    }

    /// Parse a one-letter code, case-insensitively.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Action::Create),
            'R' => Some(Action::Read),
            'U' => Some(Action::Update),
            'D' => Some(Action::Delete),
            _ => None,
        }
    }

    /// Lower-case name used in the textual permission form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse the lower-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Kind of team-scoped resource a permission applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[sea_orm(string_value = "C")]
    Class,
    #[sea_orm(string_value = "E")]
    Event,
    #[sea_orm(string_value = "N")]
    Notice,
    #[sea_orm(string_value = "T")]
    Team,
    #[sea_orm(string_value = "I")]
    Invite,
    #[sea_orm(string_value = "J")]
    JoinRequest,
    #[sea_orm(string_value = "P")]
    Permission,
}

impl ResourceType {
    /// Stored one-letter code.
    pub fn code(&self) -> char {
        match self {
            ResourceType::Class => 'C',
            ResourceType::Event => 'E',
            ResourceType::Notice => 'N',
            ResourceType::Team => 'T',
            ResourceType::Invite => 'I',
            ResourceType::JoinRequest => 'J',
            ResourceType::Permission => 'P',
        }
    }

    /// Parse a one-letter code, case-insensitively.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(ResourceType::Class),
            'E' => Some(ResourceType::Event),
            'N' => Some(ResourceType::Notice),
            'T' => Some(ResourceType::Team),
            'I' => Some(ResourceType::Invite),
            'J' => Some(ResourceType::JoinRequest),
            'P' => Some(ResourceType::Permission),
            _ => None,
        }
    }

    /// Snake-case name used in the textual permission form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Class => "class",
            ResourceType::Event => "event",
            ResourceType::Notice => "notice",
            ResourceType::Team => "team",
            ResourceType::Invite => "invite",
            ResourceType::JoinRequest => "join_request",
            ResourceType::Permission => "permission",
        }
    }

    /// Parse the snake-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "class" => Some(ResourceType::Class),
            "event" => Some(ResourceType::Event),
            "notice" => Some(ResourceType::Notice),
            "team" => Some(ResourceType::Team),
            "invite" => Some(ResourceType::Invite),
            "join_request" => Some(ResourceType::JoinRequest),
            "permission" => Some(ResourceType::Permission),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Lifecycle state shared by invites and join requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting a decision
    #[sea_orm(string_value = "P")]
    Pending,
    /// Accepted; a membership exists for the subject user
    #[sea_orm(string_value = "A")]
    Accepted,
    /// Declined or withdrawn
    #[sea_orm(string_value = "R")]
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool { !matches!(self, RequestStatus::Pending) }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Day of the week a class takes place, Monday first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    #[sea_orm(num_value = 0)]
    Monday,
    #[sea_orm(num_value = 1)]
    Tuesday,
    #[sea_orm(num_value = 2)]
    Wednesday,
    #[sea_orm(num_value = 3)]
    Thursday,
    #[sea_orm(num_value = 4)]
    Friday,
    #[sea_orm(num_value = 5)]
    Saturday,
    #[sea_orm(num_value = 6)]
    Sunday,
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weekday::Monday => write!(f, "Monday"),
            Weekday::Tuesday => write!(f, "Tuesday"),
            Weekday::Wednesday => write!(f, "Wednesday"),
            Weekday::Thursday => write!(f, "Thursday"),
            Weekday::Friday => write!(f, "Friday"),
            Weekday::Saturday => write!(f, "Saturday"),
            Weekday::Sunday => write!(f, "Sunday"),
        }
    }
}
