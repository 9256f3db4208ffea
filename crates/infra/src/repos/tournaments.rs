use chrono::NaiveDate;
use sqlx::Result;
use uuid::Uuid;

use crate::db::Db;
use crate::models::{TournamentOverviewRow, TournamentRow, TournamentWithCountRow};

#[derive(Debug, Clone)]
pub struct CreateTournament {
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone)]
pub struct TournamentRepo {
    db: Db,
}

impl TournamentRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TournamentRow>> {
        sqlx::query_as::<_, TournamentRow>(
            r#"
            SELECT id, name, join_code, created_by, start_date, end_date, created_at
            FROM tournaments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn get_by_code(&self, join_code: &str) -> Result<Option<TournamentRow>> {
        sqlx::query_as::<_, TournamentRow>(
            r#"
            SELECT id, name, join_code, created_by, start_date, end_date, created_at
            FROM tournaments
            WHERE join_code = $1
            "#,
        )
        .bind(join_code)
        .fetch_optional(&self.db)
        .await
    }

    /// All tournaments with creator username and roster size, newest first.
    pub async fn list(&self) -> Result<Vec<TournamentOverviewRow>> {
        sqlx::query_as::<_, TournamentOverviewRow>(
            r#"
            SELECT t.id, t.name, t.join_code, t.created_by, t.start_date, t.end_date,
                   t.created_at, u.username AS creator_username,
                   COUNT(tp.user_id) AS participant_count
            FROM tournaments t
            JOIN users u ON t.created_by = u.id
            LEFT JOIN tournament_participants tp ON t.id = tp.tournament_id
            GROUP BY t.id, u.username
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    pub async fn created_by_user(&self, user_id: Uuid) -> Result<Vec<TournamentWithCountRow>> {
        sqlx::query_as::<_, TournamentWithCountRow>(
            r#"
            SELECT t.id, t.name, t.join_code, t.created_by, t.start_date, t.end_date,
                   t.created_at, COUNT(tp.user_id) AS participant_count
            FROM tournaments t
            LEFT JOIN tournament_participants tp ON t.id = tp.tournament_id
            WHERE t.created_by = $1
            GROUP BY t.id
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Tournaments the user participates in but did not create.
    pub async fn joined_by_user(&self, user_id: Uuid) -> Result<Vec<TournamentWithCountRow>> {
        sqlx::query_as::<_, TournamentWithCountRow>(
            r#"
            SELECT t.id, t.name, t.join_code, t.created_by, t.start_date, t.end_date,
                   t.created_at, COUNT(tp2.user_id) AS participant_count
            FROM tournaments t
            JOIN tournament_participants tp ON t.id = tp.tournament_id
            LEFT JOIN tournament_participants tp2 ON t.id = tp2.tournament_id
            WHERE tp.user_id = $1 AND t.created_by != $1
            GROUP BY t.id
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
    }

    /// Tournaments whose window contains the given date. Drives the
    /// notification fan-out after point writes.
    pub async fn overlapping_date(&self, date: NaiveDate) -> Result<Vec<TournamentRow>> {
        sqlx::query_as::<_, TournamentRow>(
            r#"
            SELECT id, name, join_code, created_by, start_date, end_date, created_at
            FROM tournaments
            WHERE start_date <= $1 AND end_date >= $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await
    }

    /// Insert the tournament and auto-enroll the creator as a participant in
    /// one transaction, so a crash can never leave a tournament without its
    /// creator edge. Fails with a unique violation when the join code is
    /// already taken; the caller regenerates and retries.
    pub async fn create(&self, data: CreateTournament) -> Result<TournamentRow> {
        let mut tx = self.db.begin().await?;

        let tournament = sqlx::query_as::<_, TournamentRow>(
            r#"
            INSERT INTO tournaments (name, join_code, created_by, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, join_code, created_by, start_date, end_date, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.join_code)
        .bind(data.created_by)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO tournament_participants (tournament_id, user_id) VALUES ($1, $2)")
            .bind(tournament.id)
            .bind(data.created_by)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(tournament)
    }
}
