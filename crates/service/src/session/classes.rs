//! # Classes
//!
//! Weekly recurring classes forming a team's timetable.

use auth::{require_permission, Action, Permission, ResourceType};
use entity::{classes, sea_orm_active_enums::Weekday};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    Iterable,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::{ensure_same_team, require_title};
use crate::{
    console::console_view,
    dto::session::{ClassInput, ClassView, DetailView, TimetableView},
    validate_request,
    AppState,
    AuthenticatedUser,
};

fn validate(input: &ClassInput) -> Result<String> {
    validate_request(input)?;
    let title = require_title(&input.title)?;
    if input.end_time <= input.start_time {
        return Err(AppError::validation("A class must end after it starts"));
    }
    Ok(title)
}

async fn find_class<C: ConnectionTrait>(conn: &C, team_id: Uuid, class_id: Uuid) -> Result<classes::Model> {
    let class = classes::Entity::find_by_id(class_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Class {} not found", class_id)))?;
    ensure_same_team("Class", class.id, class.team_id, team_id)?;
    Ok(class)
}

/// Add a class to the timetable. Requires `(Create, Class)`.
pub async fn create_class(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    input: ClassInput,
) -> Result<ClassView> {
    let title = validate(&input)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Create, ResourceType::Class),
    )
    .await?;

    let class = classes::ActiveModel {
        id:          Set(Uuid::new_v4()),
        team_id:     Set(team_id),
        title:       Set(title),
        day:         Set(input.day),
        start_time:  Set(input.start_time),
        end_time:    Set(input.end_time),
        location:    Set(input.location),
        description: Set(input.description),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(class_id = %class.id, team_id = %team_id, day = %class.day, actor = %user.id, "Class created");
    Ok(ClassView::from(class))
}

/// Replace a class's fields. Requires `(Update, Class)`.
pub async fn update_class(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    class_id: Uuid,
    input: ClassInput,
) -> Result<ClassView> {
    let title = validate(&input)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Class),
    )
    .await?;

    let class = find_class(&txn, team_id, class_id).await?;
    let mut active: classes::ActiveModel = class.into();
    active.title = Set(title);
    active.day = Set(input.day);
    active.start_time = Set(input.start_time);
    active.end_time = Set(input.end_time);
    active.location = Set(input.location);
    active.description = Set(input.description);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(class_id = %class_id, team_id = %team_id, actor = %user.id, "Class updated");
    Ok(ClassView::from(updated))
}

/// Remove a class. Requires `(Delete, Class)`.
pub async fn delete_class(state: &AppState, user: &AuthenticatedUser, team_id: Uuid, class_id: Uuid) -> Result<()> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Delete, ResourceType::Class),
    )
    .await?;

    let class = find_class(&txn, team_id, class_id).await?;
    classes::Entity::delete_by_id(class.id).exec(&txn).await?;
    txn.commit().await?;

    info!(class_id = %class_id, team_id = %team_id, actor = %user.id, "Class deleted");
    Ok(())
}

/// The team's weekly timetable
#[with_permission(Permission::new(Action::Read, ResourceType::Class))]
pub async fn timetable(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<TimetableView> {
    let console = console_view(&state.db, user.id, team_id).await?;
    let rows = classes::Entity::find()
        .filter(classes::Column::TeamId.eq(team_id))
        .order_by_asc(classes::Column::Day)
        .order_by_asc(classes::Column::StartTime)
        .all(&state.db)
        .await?;

    Ok(TimetableView {
        console,
        days: Weekday::iter().collect(),
        classes: rows.into_iter().map(ClassView::from).collect(),
    })
}

/// A single class
#[with_permission(any =
    Permission::new(Action::Read, ResourceType::Class),
    Permission::new(Action::Update, ResourceType::Class),
    Permission::new(Action::Delete, ResourceType::Class)
)]
pub async fn class_detail(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    class_id: Uuid,
) -> Result<DetailView<ClassView>> {
    let class = find_class(&state.db, team_id, class_id).await?;
    Ok(DetailView {
        console: console_view(&state.db, user.id, team_id).await?,
        item:    ClassView::from(class),
    })
}
