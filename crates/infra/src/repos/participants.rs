use sqlx::Result;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{ParticipantRow, ParticipantUserRow};

#[derive(Clone)]
pub struct ParticipantRepo {
    db: Db,
}

impl ParticipantRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get(&self, tournament_id: Uuid, user_id: Uuid) -> Result<Option<ParticipantRow>> {
        sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT tournament_id, user_id, joined_at
            FROM tournament_participants
            WHERE tournament_id = $1 AND user_id = $2
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn insert(&self, tournament_id: Uuid, user_id: Uuid) -> Result<ParticipantRow> {
        sqlx::query_as::<_, ParticipantRow>(
            r#"
            INSERT INTO tournament_participants (tournament_id, user_id)
            VALUES ($1, $2)
            RETURNING tournament_id, user_id, joined_at
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
    }

    /// Roster joined with usernames, in join order, for tournament detail
    /// responses.
    pub async fn roster_by_join_time(&self, tournament_id: Uuid) -> Result<Vec<ParticipantUserRow>> {
        sqlx::query_as::<_, ParticipantUserRow>(
            r#"
            SELECT tp.user_id, u.username, tp.joined_at
            FROM tournament_participants tp
            JOIN users u ON tp.user_id = u.id
            WHERE tp.tournament_id = $1
            ORDER BY tp.joined_at ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.db)
        .await
    }

    /// Roster ordered by user id. The leaderboard relies on this ordering as
    /// its deterministic tie-break for equal totals.
    pub async fn roster(&self, tournament_id: Uuid) -> Result<Vec<ParticipantUserRow>> {
        sqlx::query_as::<_, ParticipantUserRow>(
            r#"
            SELECT tp.user_id, u.username, tp.joined_at
            FROM tournament_participants tp
            JOIN users u ON tp.user_id = u.id
            WHERE tp.tournament_id = $1
            ORDER BY tp.user_id ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.db)
        .await
    }
}
