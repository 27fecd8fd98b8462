//! Integration tests for classes, events, notices and the console

mod common;

use auth::{Action, Permission, ResourceType};
use chrono::{Duration, NaiveTime, Utc};
use entity::sea_orm_active_enums::Weekday;
use serde_json::json;
use service::{
    console,
    dto::session::{ClassInput, EventInput, NoticeInput},
    invites,
    join_requests,
    session::{classes, events, notices},
};
use uuid::Uuid;

fn class(title: &str, day: Weekday, hour: u32) -> ClassInput {
    ClassInput {
        title:       title.to_string(),
        day,
        start_time:  NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time:    NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
        location:    Some("Room 4".to_string()),
        description: None,
    }
}

#[tokio::test]
async fn test_timetable_ordered_by_day_then_start() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let member = common::user(&state, "member@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    common::join(&state, &owner, team.id, &member).await;

    classes::create_class(&state, &owner, team.id, class("Art", Weekday::Wednesday, 9))
        .await
        .unwrap();
    classes::create_class(&state, &owner, team.id, class("Maths", Weekday::Monday, 13))
        .await
        .unwrap();
    classes::create_class(&state, &owner, team.id, class("English", Weekday::Monday, 9))
        .await
        .unwrap();

    let view = classes::timetable(&state, &member, team.id).await.unwrap();
    assert_eq!(view.days.len(), 7);
    assert_eq!(view.days[0], Weekday::Monday);
    assert_eq!(
        view.classes.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
        vec!["English", "Maths", "Art"]
    );
    assert!(view.console.is_member);
    assert_eq!(view.console.pending_invites, None);
}

#[tokio::test]
async fn test_member_cannot_write_classes() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let member = common::user(&state, "member@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    common::join(&state, &owner, team.id, &member).await;

    let err = classes::create_class(&state, &member, team.id, class("Art", Weekday::Friday, 9))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_outsider_cannot_read_timetable() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let outsider = common::user(&state, "outsider@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;

    let err = classes::timetable(&state, &outsider, team.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_cross_team_class_delete_is_bad_request() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    let other = common::team(&state, &owner, "Year 10", None).await;

    let foreign = classes::create_class(&state, &owner, other.id, class("Chemistry", Weekday::Tuesday, 10))
        .await
        .unwrap();

    let err = classes::delete_class(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let err = classes::class_detail(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    // Still there through its own team.
    let detail = classes::class_detail(&state, &owner, other.id, foreign.id)
        .await
        .unwrap();
    assert_eq!(detail.item.title, "Chemistry");

    let err = classes::delete_class(&state, &owner, team.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_cross_team_event_is_bad_request() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    let other = common::team(&state, &owner, "Year 10", None).await;
    let now = Utc::now();
    let input = |title: &str| {
        EventInput {
            title:       title.to_string(),
            description: None,
            start:       now,
            end:         now + Duration::hours(2),
        }
    };

    let foreign = events::create_event(&state, &owner, other.id, input("Open evening"))
        .await
        .unwrap();

    let err = events::update_event(&state, &owner, team.id, foreign.id, input("Hijacked"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let err = events::delete_event(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let err = events::event_detail(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let detail = events::event_detail(&state, &owner, other.id, foreign.id)
        .await
        .unwrap();
    assert_eq!(detail.item.title, "Open evening");

    let err = events::delete_event(&state, &owner, team.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_cross_team_notice_is_bad_request() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    let other = common::team(&state, &owner, "Year 10", None).await;
    let input = |title: &str| {
        NoticeInput {
            title:       title.to_string(),
            description: "Bring a coat".to_string(),
        }
    };

    let foreign = notices::create_notice(&state, &owner, other.id, input("Fire drill"))
        .await
        .unwrap();

    let err = notices::update_notice(&state, &owner, team.id, foreign.id, input("Hijacked"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let err = notices::delete_notice(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let err = notices::notice_detail(&state, &owner, team.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");

    let board = notices::notice_board(&state, &owner, other.id).await.unwrap();
    assert_eq!(board.notices.len(), 1);
    assert_eq!(board.notices[0].title, "Fire drill");

    let err = notices::notice_detail(&state, &owner, team.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_class_must_end_after_start() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;

    let mut input = class("Art", Weekday::Monday, 9);
    input.end_time = input.start_time;
    let err = classes::create_class(&state, &owner, team.id, input)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_class_update_and_delete() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;

    let created = classes::create_class(&state, &owner, team.id, class("Art", Weekday::Monday, 9))
        .await
        .unwrap();
    let updated = classes::update_class(&state, &owner, team.id, created.id, class("Drawing", Weekday::Friday, 14))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Drawing");
    assert_eq!(updated.day, Weekday::Friday);

    classes::delete_class(&state, &owner, team.id, created.id)
        .await
        .unwrap();
    let view = classes::timetable(&state, &owner, team.id).await.unwrap();
    assert!(view.classes.is_empty());
}

#[tokio::test]
async fn test_calendar_ordered_by_start() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    let now = Utc::now();

    for (title, offset) in [("Trip", 10), ("Fair", 2), ("Exam", 5)] {
        events::create_event(
            &state,
            &owner,
            team.id,
            EventInput {
                title:       title.to_string(),
                description: None,
                start:       now + Duration::days(offset),
                end:         now + Duration::days(offset) + Duration::hours(2),
            },
        )
        .await
        .unwrap();
    }

    let view = events::calendar(&state, &owner, team.id).await.unwrap();
    assert_eq!(
        view.events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
        vec!["Fair", "Exam", "Trip"]
    );
}

#[tokio::test]
async fn test_event_cannot_end_before_start() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    let now = Utc::now();

    let err = events::create_event(
        &state,
        &owner,
        team.id,
        EventInput {
            title:       "Backwards".to_string(),
            description: None,
            start:       now,
            end:         now - Duration::hours(1),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_notice_author_follows_last_writer() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let editor = common::user(&state, "editor@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    common::join(&state, &owner, team.id, &editor).await;
    service::roles::grant_direct_permissions(
        &state,
        &owner,
        team.id,
        editor.id,
        vec![Permission::new(Action::Update, ResourceType::Notice)],
    )
    .await
    .unwrap();

    let posted = notices::create_notice(
        &state,
        &owner,
        team.id,
        NoticeInput {
            title:       "Sports day".to_string(),
            description: "Bring trainers".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(posted.author_id, owner.id);

    let edited = notices::update_notice(
        &state,
        &editor,
        team.id,
        posted.id,
        NoticeInput {
            title:       "Sports day".to_string(),
            description: "Bring trainers and water".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.author_id, editor.id);
    assert_eq!(edited.created_at, posted.created_at);

    let board = notices::notice_board(&state, &editor, team.id).await.unwrap();
    assert_eq!(board.notices.len(), 1);
    assert_eq!(board.notices[0].description, "Bring trainers and water");
}

#[tokio::test]
async fn test_detail_accepts_update_without_read() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let editor = common::user(&state, "editor@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;
    common::join(&state, &owner, team.id, &editor).await;

    let role = service::roles::create_role(
        &state,
        &owner,
        team.id,
        service::dto::roles::CreateRoleRequest {
            name:        "Notice editor".to_string(),
            permissions: vec![Permission::new(Action::Update, ResourceType::Notice)],
        },
    )
    .await
    .unwrap();
    service::roles::assign_member_role(&state, &owner, team.id, editor.id, role.id)
        .await
        .unwrap();

    let posted = notices::create_notice(
        &state,
        &owner,
        team.id,
        NoticeInput {
            title:       "Lockers".to_string(),
            description: "Empty them by Friday".to_string(),
        },
    )
    .await
    .unwrap();

    let detail = notices::notice_detail(&state, &editor, team.id, posted.id)
        .await
        .unwrap();
    assert_eq!(detail.item.id, posted.id);

    let err = notices::notice_board(&state, &editor, team.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_console_counts_pending_for_admin() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let guest = common::user(&state, "guest@example.com").await;
    let applicant = common::user(&state, "applicant@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;

    invites::send_invite(&state, &owner, team.id, guest.id)
        .await
        .unwrap();
    join_requests::send_join_request(&state, &applicant, team.id)
        .await
        .unwrap();

    let view = console::console(&state, &owner, team.id).await.unwrap();
    assert!(view.is_member);
    assert_eq!(view.permissions.len(), Permission::all().len());
    assert_eq!(view.pending_invites, Some(1));
    assert_eq!(view.pending_join_requests, Some(1));

    let outsider_view = console::console(&state, &applicant, team.id).await.unwrap();
    assert!(!outsider_view.is_member);
    assert!(outsider_view.permissions.is_empty());
    assert_eq!(outsider_view.pending_invites, None);

    let err = console::console(&state, &owner, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_console_serializes_for_rendering() {
    let state = common::test_state().await;
    let owner = common::user(&state, "owner@example.com").await;
    let applicant = common::user(&state, "applicant@example.com").await;
    let team = common::team(&state, &owner, "Year 9", None).await;

    let admin_json = serde_json::to_value(console::console(&state, &owner, team.id).await.unwrap()).unwrap();
    assert_eq!(admin_json["team"]["name"], "Year 9");
    assert_eq!(admin_json["is_member"], true);
    assert_eq!(admin_json["pending_invites"], 0);
    assert!(admin_json["permissions"]
        .as_array()
        .unwrap()
        .contains(&json!({ "action": "delete", "resource_type": "join_request" })));

    let outsider_json = serde_json::to_value(console::console(&state, &applicant, team.id).await.unwrap()).unwrap();
    assert_eq!(outsider_json["is_member"], false);
    assert_eq!(outsider_json["permissions"], json!([]));
    assert!(outsider_json["pending_join_requests"].is_null());
}
