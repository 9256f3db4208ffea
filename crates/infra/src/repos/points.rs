use rust_decimal::Decimal;
use sqlx::{PgExecutor, Result};
use uuid::Uuid;

use crate::db::Db;
use crate::models::{PointEntryRow, PointWithMatchRow, PointWithPlayerRow};

#[derive(Clone)]
pub struct PointRepo {
    db: Db,
}

impl PointRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Whether an entry for this (match, player) pair already exists, used to
    /// pick the added/updated notification subtype.
    pub async fn exists(&self, match_id: Uuid, player_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM match_points WHERE match_id = $1 AND player_id = $2)",
        )
        .bind(match_id)
        .bind(player_id)
        .fetch_one(&self.db)
        .await
    }

    pub async fn upsert(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        points: Decimal,
        entered_by: Uuid,
    ) -> Result<PointEntryRow> {
        upsert(&self.db, match_id, player_id, points, entered_by).await
    }

    /// Entries for one match joined with player names, highest scores first.
    pub async fn by_match(&self, match_id: Uuid) -> Result<Vec<PointWithPlayerRow>> {
        sqlx::query_as::<_, PointWithPlayerRow>(
            r#"
            SELECT mp.match_id, mp.player_id, mp.points, mp.entered_by, mp.entered_at,
                   p.name AS player_name, p.team
            FROM match_points mp
            JOIN players p ON mp.player_id = p.id
            WHERE mp.match_id = $1
            ORDER BY mp.points DESC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.db)
        .await
    }

    /// Entries for one player across all matches, most recent match first.
    pub async fn by_player(&self, player_id: Uuid) -> Result<Vec<PointWithMatchRow>> {
        sqlx::query_as::<_, PointWithMatchRow>(
            r#"
            SELECT mp.match_id, mp.player_id, mp.points, mp.entered_by, mp.entered_at,
                   m.match_date, m.team1, m.team2, m.venue
            FROM match_points mp
            JOIN matches m ON mp.match_id = m.id
            WHERE mp.player_id = $1
            ORDER BY m.match_date DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.db)
        .await
    }

    /// All entries for a set of matches in one round trip. The leaderboard
    /// aggregation groups these in memory instead of querying per
    /// participant per match.
    pub async fn for_matches(&self, match_ids: &[Uuid]) -> Result<Vec<PointEntryRow>> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, PointEntryRow>(
            r#"
            SELECT match_id, player_id, points, entered_by, entered_at
            FROM match_points
            WHERE match_id = ANY($1::uuid[])
            "#,
        )
        .bind(match_ids)
        .fetch_all(&self.db)
        .await
    }
}

/// Single-statement upsert keyed on (match, player). Executor-generic so the
/// bulk submission can apply every entry inside one transaction.
pub async fn upsert<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
    player_id: Uuid,
    points: Decimal,
    entered_by: Uuid,
) -> Result<PointEntryRow> {
    sqlx::query_as::<_, PointEntryRow>(
        r#"
        INSERT INTO match_points (match_id, player_id, points, entered_by, entered_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (match_id, player_id)
        DO UPDATE SET points = EXCLUDED.points,
                      entered_by = EXCLUDED.entered_by,
                      entered_at = NOW()
        RETURNING match_id, player_id, points, entered_by, entered_at
        "#,
    )
    .bind(match_id)
    .bind(player_id)
    .bind(points)
    .bind(entered_by)
    .fetch_one(executor)
    .await
}
