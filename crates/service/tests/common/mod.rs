//! # Common Test Utilities
//!
//! In-memory application state and fixtures for the service integration tests.

#![allow(dead_code)]

use std::sync::Once;

use entity::testing;
use service::{
    dto::teams::{CreateTeamRequest, TeamSummary},
    invites,
    teams,
    AppState,
    AuthenticatedUser,
};
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Application state over a fresh in-memory database
pub async fn test_state() -> AppState {
    init_test_env();
    AppState::new(testing::memory_db().await.expect("in-memory database"))
}

/// Insert a user and return it as the acting identity
pub async fn user(state: &AppState, email: &str) -> AuthenticatedUser {
    let model = testing::create_user(&state.db, email)
        .await
        .expect("insert user");
    AuthenticatedUser::from(&model)
}

/// Create a team through the service, making `owner` its admin
pub async fn team(state: &AppState, owner: &AuthenticatedUser, name: &str, parent: Option<Uuid>) -> TeamSummary {
    teams::create_team(
        state,
        owner,
        CreateTeamRequest {
            name:           name.to_string(),
            description:    None,
            parent_team_id: parent,
        },
    )
    .await
    .expect("create team")
}

/// Make `member` an active member of `team_id` through an accepted invite
pub async fn join(state: &AppState, admin: &AuthenticatedUser, team_id: Uuid, member: &AuthenticatedUser) {
    let invite = invites::send_invite(state, admin, team_id, member.id)
        .await
        .expect("send invite");
    invites::accept_invite(state, member, invite.id)
        .await
        .expect("accept invite");
}
