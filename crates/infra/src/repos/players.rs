use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::db::Db;
use crate::models::PlayerRow;

#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub name: String,
    pub team: String,
}

#[derive(Clone)]
pub struct PlayerRepo {
    db: Db,
}

impl PlayerRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, team, created_at FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn list(&self) -> Result<Vec<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, team, created_at FROM players ORDER BY team, name",
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn by_team(&self, team: &str) -> Result<Vec<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, team, created_at FROM players WHERE team = $1 ORDER BY name",
        )
        .bind(team)
        .fetch_all(&self.db)
        .await
    }

    pub async fn teams(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT team FROM players ORDER BY team")
            .fetch_all(&self.db)
            .await
    }

    pub async fn get_by_name_and_team(&self, name: &str, team: &str) -> Result<Option<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(
            "SELECT id, name, team, created_at FROM players WHERE name = $1 AND team = $2",
        )
        .bind(name)
        .bind(team)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, data: CreatePlayer) -> Result<PlayerRow> {
        sqlx::query_as::<_, PlayerRow>(
            r#"
            INSERT INTO players (name, team)
            VALUES ($1, $2)
            RETURNING id, name, team, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.team)
        .fetch_one(&self.db)
        .await
    }
}

/// Player lookup that can run inside a caller-owned transaction, used by the
/// bulk point submission to decide per-entry skips.
pub async fn get_player<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>("SELECT id, name, team, created_at FROM players WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}
