use sqlx::Result;
use uuid::Uuid;

use crate::db::Db;
use crate::models::TeamSelectionRow;

#[derive(Clone)]
pub struct TeamSelectionRepo {
    db: Db,
}

impl TeamSelectionRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn players_for(&self, tournament_id: Uuid, user_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT player_id
            FROM team_selections
            WHERE tournament_id = $1 AND user_id = $2
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Every selection edge in a tournament in one round trip; the caller
    /// groups by user.
    pub async fn for_tournament(&self, tournament_id: Uuid) -> Result<Vec<TeamSelectionRow>> {
        sqlx::query_as::<_, TeamSelectionRow>(
            r#"
            SELECT tournament_id, user_id, player_id
            FROM team_selections
            WHERE tournament_id = $1
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.db)
        .await
    }

    /// Replace the user's fantasy team for a tournament atomically.
    pub async fn replace(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
        player_ids: &[Uuid],
    ) -> Result<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM team_selections WHERE tournament_id = $1 AND user_id = $2")
            .bind(tournament_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for player_id in player_ids {
            sqlx::query(
                r#"
                INSERT INTO team_selections (tournament_id, user_id, player_id)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(tournament_id)
            .bind(user_id)
            .bind(player_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
