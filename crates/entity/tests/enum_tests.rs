//! Simple enum tests for entity crate
//! These cover the stored codes, which must stay stable across releases.

use entity::sea_orm_active_enums::{Action, RequestStatus, ResourceType, Weekday};
use sea_orm::{ActiveEnum, Iterable};

/// Test Action stored codes
#[test]
fn test_action_codes() {
    assert_eq!(Action::Create.to_value(), "C");
    assert_eq!(Action::Read.to_value(), "R");
    assert_eq!(Action::Update.to_value(), "U");
    assert_eq!(Action::Delete.to_value(), "D");
}

/// Test Action code parsing is the inverse of `code`
#[test]
fn test_action_from_code() {
    for action in Action::iter() {
        assert_eq!(Action::from_code(action.code()), Some(action));
    }
    assert_eq!(Action::from_code('c'), Some(Action::Create));
    assert_eq!(Action::from_code('X'), None);
}

/// Test ResourceType stored codes
#[test]
fn test_resource_type_codes() {
    assert_eq!(ResourceType::Class.to_value(), "C");
    assert_eq!(ResourceType::Event.to_value(), "E");
    assert_eq!(ResourceType::Notice.to_value(), "N");
    assert_eq!(ResourceType::Team.to_value(), "T");
    assert_eq!(ResourceType::Invite.to_value(), "I");
    assert_eq!(ResourceType::JoinRequest.to_value(), "J");
    assert_eq!(ResourceType::Permission.to_value(), "P");
}

/// Test ResourceType names
#[test]
fn test_resource_type_names() {
    assert_eq!(format!("{}", ResourceType::JoinRequest), "join_request");
    for resource in ResourceType::iter() {
        assert_eq!(ResourceType::from_name(resource.as_str()), Some(resource));
        assert_eq!(ResourceType::from_code(resource.code()), Some(resource));
    }
    assert_eq!(ResourceType::from_name("asset"), None);
}

/// Test RequestStatus values
#[test]
fn test_request_status_values() {
    assert_eq!(RequestStatus::Pending.to_value(), "P");
    assert_eq!(RequestStatus::Accepted.to_value(), "A");
    assert_eq!(RequestStatus::Rejected.to_value(), "R");
    assert_eq!(format!("{}", RequestStatus::Accepted), "accepted");
    assert!(!RequestStatus::Pending.is_terminal());
    assert!(RequestStatus::Rejected.is_terminal());
}

/// Test Weekday ordering matches the stored numbers
#[test]
fn test_weekday_values() {
    assert_eq!(Weekday::Monday.to_value(), 0);
    assert_eq!(Weekday::Sunday.to_value(), 6);
    assert!(Weekday::Monday < Weekday::Friday);
    assert_eq!(Weekday::try_from_value(&3).ok(), Some(Weekday::Thursday));
}

/// Test serde representation
#[test]
fn test_enum_serde() {
    assert_eq!(serde_json::to_string(&ResourceType::JoinRequest).unwrap(), "\"join_request\"");
    assert_eq!(serde_json::to_string(&RequestStatus::Pending).unwrap(), "\"pending\"");
}
