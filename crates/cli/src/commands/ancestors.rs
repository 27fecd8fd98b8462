//! # CLI Ancestors Command
//!
//! Prints a team's ancestor chain, failing on broken hierarchies.

use entity::teams;
use error::Result;
use sea_orm::ConnectionTrait;

use super::AncestorsArgs;

/// Ancestors of the team, immediate parent first and root last
pub async fn ancestors<C: ConnectionTrait>(conn: &C, args: &AncestorsArgs) -> Result<Vec<teams::Model>> {
    auth::ancestors(conn, args.team).await
}

/// One line per team, indented by depth
pub fn render(chain: &[teams::Model]) -> String {
    chain
        .iter()
        .enumerate()
        .map(|(depth, team)| format!("{}{} ({})", "  ".repeat(depth), team.name, team.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::testing;
    use sea_orm::{ActiveModelTrait, Set};
    use uuid::Uuid;

    use super::*;

    async fn team<C: ConnectionTrait>(db: &C, name: &str, parent: Option<Uuid>) -> teams::Model {
        teams::ActiveModel {
            id:             Set(Uuid::new_v4()),
            name:           Set(name.to_string()),
            description:    Set(None),
            parent_team_id: Set(parent),
            created_at:     Set(Utc::now()),
            updated_at:     Set(Utc::now()),
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_chain_rendered_parent_first() {
        let db = testing::memory_db().await.unwrap();
        let root = team(&db, "School", None).await;
        let mid = team(&db, "Science", Some(root.id)).await;
        let leaf = team(&db, "Physics", Some(mid.id)).await;

        let chain = ancestors(&db, &AncestorsArgs {
            team: leaf.id,
        })
        .await
        .unwrap();
        let rendered = render(&chain);
        assert_eq!(
            rendered,
            format!("Science ({})\n  School ({})", mid.id, root.id)
        );
    }

    #[tokio::test]
    async fn test_cycle_reported() {
        let db = testing::memory_db().await.unwrap();
        let a = team(&db, "A", None).await;
        let b = team(&db, "B", Some(a.id)).await;
        let mut active: teams::ActiveModel = a.into();
        active.parent_team_id = Set(Some(b.id));
        active.update(&db).await.unwrap();

        let err = ancestors(&db, &AncestorsArgs {
            team: b.id,
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), "CYCLE_DETECTED");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
