use chrono::NaiveDate;
use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::db::Db;
use crate::models::{MatchRow, MatchStatus};

#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub match_date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub status: MatchStatus,
}

#[derive(Clone)]
pub struct MatchRepo {
    db: Db,
}

impl MatchRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, match_date, team1, team2, venue, status, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn list(&self) -> Result<Vec<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, match_date, team1, team2, venue, status, created_at
            FROM matches
            ORDER BY match_date ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn upcoming(&self) -> Result<Vec<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, match_date, team1, team2, venue, status, created_at
            FROM matches
            WHERE match_date > NOW() AND status = 'scheduled'
            ORDER BY match_date ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn completed(&self) -> Result<Vec<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, match_date, team1, team2, venue, status, created_at
            FROM matches
            WHERE status = 'completed'
            ORDER BY match_date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    /// Matches whose date falls inside a tournament window, in date order.
    pub async fn in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, match_date, team1, team2, venue, status, created_at
            FROM matches
            WHERE match_date BETWEEN $1 AND $2
            ORDER BY match_date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
    }

    pub async fn create(&self, data: CreateMatch) -> Result<MatchRow> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (match_date, team1, team2, venue, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, match_date, team1, team2, venue, status, created_at
            "#,
        )
        .bind(data.match_date)
        .bind(data.team1)
        .bind(data.team2)
        .bind(data.venue)
        .bind(data.status)
        .fetch_one(&self.db)
        .await
    }

    pub async fn update_status(&self, id: Uuid, status: MatchStatus) -> Result<Option<MatchRow>> {
        sqlx::query_as::<_, MatchRow>(
            r#"
            UPDATE matches
            SET status = $2
            WHERE id = $1
            RETURNING id, match_date, team1, team2, venue, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await
    }
}

/// Flip a match to completed unless it already is. Executor-generic so the
/// bulk point submission can run it inside its transaction.
pub async fn mark_completed<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE matches SET status = 'completed' WHERE id = $1 AND status != 'completed'")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
