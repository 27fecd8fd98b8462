//! # Events
//!
//! One-off dated events shown on a team's calendar.

use auth::{require_permission, Action, Permission, ResourceType};
use entity::events;
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use super::{ensure_same_team, require_title};
use crate::{
    console::console_view,
    dto::session::{CalendarView, DetailView, EventInput, EventView},
    validate_request,
    AppState,
    AuthenticatedUser,
};

fn validate(input: &EventInput) -> Result<String> {
    validate_request(input)?;
    let title = require_title(&input.title)?;
    if input.end < input.start {
        return Err(AppError::validation("An event cannot end before it starts"));
    }
    Ok(title)
}

async fn find_event<C: ConnectionTrait>(conn: &C, team_id: Uuid, event_id: Uuid) -> Result<events::Model> {
    let event = events::Entity::find_by_id(event_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {} not found", event_id)))?;
    ensure_same_team("Event", event.id, event.team_id, team_id)?;
    Ok(event)
}

/// Add an event to the calendar. Requires `(Create, Event)`.
pub async fn create_event(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    input: EventInput,
) -> Result<EventView> {
    let title = validate(&input)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Create, ResourceType::Event),
    )
    .await?;

    let event = events::ActiveModel {
        id:          Set(Uuid::new_v4()),
        team_id:     Set(team_id),
        title:       Set(title),
        description: Set(input.description),
        start:       Set(input.start),
        end:         Set(input.end),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(event_id = %event.id, team_id = %team_id, start = %event.start, actor = %user.id, "Event created");
    Ok(EventView::from(event))
}

/// Replace an event's fields. Requires `(Update, Event)`.
pub async fn update_event(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    event_id: Uuid,
    input: EventInput,
) -> Result<EventView> {
    let title = validate(&input)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Event),
    )
    .await?;

    let event = find_event(&txn, team_id, event_id).await?;
    let mut active: events::ActiveModel = event.into();
    active.title = Set(title);
    active.description = Set(input.description);
    active.start = Set(input.start);
    active.end = Set(input.end);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(event_id = %event_id, team_id = %team_id, actor = %user.id, "Event updated");
    Ok(EventView::from(updated))
}

/// Remove an event. Requires `(Delete, Event)`.
pub async fn delete_event(state: &AppState, user: &AuthenticatedUser, team_id: Uuid, event_id: Uuid) -> Result<()> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Delete, ResourceType::Event),
    )
    .await?;

    let event = find_event(&txn, team_id, event_id).await?;
    events::Entity::delete_by_id(event.id).exec(&txn).await?;
    txn.commit().await?;

    info!(event_id = %event_id, team_id = %team_id, actor = %user.id, "Event deleted");
    Ok(())
}

/// The team's calendar, earliest first
#[with_permission(Permission::new(Action::Read, ResourceType::Event))]
pub async fn calendar(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<CalendarView> {
    let console = console_view(&state.db, user.id, team_id).await?;
    let rows = events::Entity::find()
        .filter(events::Column::TeamId.eq(team_id))
        .order_by_asc(events::Column::Start)
        .all(&state.db)
        .await?;

    Ok(CalendarView {
        console,
        events: rows.into_iter().map(EventView::from).collect(),
    })
}

/// A single event
#[with_permission(any =
    Permission::new(Action::Read, ResourceType::Event),
    Permission::new(Action::Update, ResourceType::Event),
    Permission::new(Action::Delete, ResourceType::Event)
)]
pub async fn event_detail(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    event_id: Uuid,
) -> Result<DetailView<EventView>> {
    let event = find_event(&state.db, team_id, event_id).await?;
    Ok(DetailView {
        console: console_view(&state.db, user.id, team_id).await?,
        item:    EventView::from(event),
    })
}
