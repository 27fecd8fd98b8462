//! # Notices
//!
//! Posts on a team's notice board. The author is whoever last wrote the post.

use auth::{require_permission, Action, Permission, ResourceType};
use chrono::Utc;
use entity::notices;
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use super::{ensure_same_team, require_title};
use crate::{
    console::console_view,
    dto::session::{DetailView, NoticeBoardView, NoticeInput, NoticeView},
    validate_request,
    AppState,
    AuthenticatedUser,
};

async fn find_notice<C: ConnectionTrait>(conn: &C, team_id: Uuid, notice_id: Uuid) -> Result<notices::Model> {
    let notice = notices::Entity::find_by_id(notice_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notice {} not found", notice_id)))?;
    ensure_same_team("Notice", notice.id, notice.team_id, team_id)?;
    Ok(notice)
}

/// Post a notice. Requires `(Create, Notice)`.
pub async fn create_notice(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    input: NoticeInput,
) -> Result<NoticeView> {
    validate_request(&input)?;
    let title = require_title(&input.title)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Create, ResourceType::Notice),
    )
    .await?;

    let now = Utc::now();
    let notice = notices::ActiveModel {
        id:          Set(Uuid::new_v4()),
        team_id:     Set(team_id),
        user_id:     Set(user.id),
        title:       Set(title),
        description: Set(input.description),
        created_at:  Set(now),
        updated_at:  Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(notice_id = %notice.id, team_id = %team_id, author = %user.id, "Notice posted");
    Ok(NoticeView::from(notice))
}

/// Rewrite a notice. The acting user becomes its author. Requires `(Update, Notice)`.
pub async fn update_notice(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    notice_id: Uuid,
    input: NoticeInput,
) -> Result<NoticeView> {
    validate_request(&input)?;
    let title = require_title(&input.title)?;
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Update, ResourceType::Notice),
    )
    .await?;

    let notice = find_notice(&txn, team_id, notice_id).await?;
    let mut active: notices::ActiveModel = notice.into();
    active.user_id = Set(user.id);
    active.title = Set(title);
    active.description = Set(input.description);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(notice_id = %notice_id, team_id = %team_id, author = %user.id, "Notice updated");
    Ok(NoticeView::from(updated))
}

/// Take a notice down. Requires `(Delete, Notice)`.
pub async fn delete_notice(state: &AppState, user: &AuthenticatedUser, team_id: Uuid, notice_id: Uuid) -> Result<()> {
    let txn = state.db.begin().await?;
    require_permission(
        &txn,
        user.id,
        team_id,
        Permission::new(Action::Delete, ResourceType::Notice),
    )
    .await?;

    let notice = find_notice(&txn, team_id, notice_id).await?;
    notices::Entity::delete_by_id(notice.id).exec(&txn).await?;
    txn.commit().await?;

    info!(notice_id = %notice_id, team_id = %team_id, actor = %user.id, "Notice deleted");
    Ok(())
}

/// The team's notice board, newest first
#[with_permission(Permission::new(Action::Read, ResourceType::Notice))]
pub async fn notice_board(state: &AppState, user: &AuthenticatedUser, team_id: Uuid) -> Result<NoticeBoardView> {
    let console = console_view(&state.db, user.id, team_id).await?;
    let rows = notices::Entity::find()
        .filter(notices::Column::TeamId.eq(team_id))
        .order_by_desc(notices::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(NoticeBoardView {
        console,
        notices: rows.into_iter().map(NoticeView::from).collect(),
    })
}

/// A single notice
#[with_permission(any =
    Permission::new(Action::Read, ResourceType::Notice),
    Permission::new(Action::Update, ResourceType::Notice),
    Permission::new(Action::Delete, ResourceType::Notice)
)]
pub async fn notice_detail(
    state: &AppState,
    user: &AuthenticatedUser,
    team_id: Uuid,
    notice_id: Uuid,
) -> Result<DetailView<NoticeView>> {
    let notice = find_notice(&state.db, team_id, notice_id).await?;
    Ok(DetailView {
        console: console_view(&state.db, user.id, team_id).await?,
        item:    NoticeView::from(notice),
    })
}
