use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use infra::models::{MatchRow, PlayerRow, PointEntryRow, PointWithPlayerRow};
use infra::repos::{matches, players, points, MatchRepo, PlayerRepo, PointRepo, TournamentRepo};

use crate::error::AppError;
use crate::realtime::{Event, EventSink, PlayerSummary, PointsUpdateKind};

pub struct SubmitPoints {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub points: Decimal,
    pub entered_by: Uuid,
}

/// Upsert one point entry and notify the global audience plus every
/// tournament whose window contains the match date.
pub async fn submit_points(
    db: &PgPool,
    sink: &dyn EventSink,
    params: SubmitPoints,
) -> Result<PointEntryRow, AppError> {
    let mtch = require_match(db, params.match_id).await?;

    let player = PlayerRepo::new(db.clone())
        .get(params.player_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

    let repo = PointRepo::new(db.clone());
    let existed = repo.exists(params.match_id, params.player_id).await?;
    let row = repo
        .upsert(params.match_id, params.player_id, params.points, params.entered_by)
        .await?;

    let summary = player_summary(&player);
    let subtype = if existed {
        PointsUpdateKind::PointsUpdated
    } else {
        PointsUpdateKind::PointsAdded
    };

    sink.publish_global(Event::PointsUpdate {
        subtype,
        match_id: row.match_id,
        player: summary.clone(),
        fantasy_points: row.points,
        updated_at: row.entered_at,
    });

    for tournament in overlapping_tournaments(db, &mtch).await? {
        sink.publish_tournament(
            tournament.id,
            Event::TournamentPointsUpdate {
                tournament_id: tournament.id,
                match_id: row.match_id,
                player: summary.clone(),
                fantasy_points: row.points,
                updated_at: row.entered_at,
            },
        );
    }

    Ok(row)
}

pub struct BulkEntry {
    pub player_id: Uuid,
    pub points: Decimal,
}

pub struct SubmitPointsBulk {
    pub match_id: Uuid,
    pub entries: Vec<BulkEntry>,
    pub entered_by: Uuid,
}

/// Apply a whole match's points in one transaction, then mark the match
/// completed inside the same transaction. Entries naming a nonexistent
/// player are skipped rather than failing the batch; any storage failure
/// rolls the entire batch back, status flip included.
///
/// A bulk commit signals "recompute the whole board", so tournaments get a
/// single leaderboard-update rather than per-player events.
pub async fn submit_points_bulk(
    db: &PgPool,
    sink: &dyn EventSink,
    params: SubmitPointsBulk,
) -> Result<Vec<PointWithPlayerRow>, AppError> {
    if params.entries.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide match ID and points data array".to_string(),
        ));
    }

    let mtch = require_match(db, params.match_id).await?;

    let mut tx = db.begin().await?;
    let mut results = Vec::new();

    for entry in &params.entries {
        let Some(player) = players::get_player(&mut *tx, entry.player_id).await? else {
            continue;
        };

        let row = points::upsert(
            &mut *tx,
            params.match_id,
            entry.player_id,
            entry.points,
            params.entered_by,
        )
        .await?;

        results.push(PointWithPlayerRow {
            match_id: row.match_id,
            player_id: row.player_id,
            points: row.points,
            entered_by: row.entered_by,
            entered_at: row.entered_at,
            player_name: player.name,
            team: player.team,
        });
    }

    matches::mark_completed(&mut *tx, params.match_id).await?;
    tx.commit().await?;

    let updated_at = Utc::now();
    sink.publish_global(Event::PointsBulkUpdate {
        match_id: params.match_id,
        updated_at,
    });

    for tournament in overlapping_tournaments(db, &mtch).await? {
        sink.publish_tournament(
            tournament.id,
            Event::TournamentLeaderboardUpdate {
                tournament_id: tournament.id,
                match_id: params.match_id,
                updated_at,
            },
        );
    }

    Ok(results)
}

pub async fn points_by_match(
    db: &PgPool,
    match_id: Uuid,
) -> Result<Vec<PointWithPlayerRow>, AppError> {
    require_match(db, match_id).await?;
    Ok(PointRepo::new(db.clone()).by_match(match_id).await?)
}

pub async fn points_by_player(
    db: &PgPool,
    player_id: Uuid,
) -> Result<Vec<infra::models::PointWithMatchRow>, AppError> {
    PlayerRepo::new(db.clone())
        .get(player_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;
    Ok(PointRepo::new(db.clone()).by_player(player_id).await?)
}

async fn require_match(db: &PgPool, match_id: Uuid) -> Result<MatchRow, AppError> {
    MatchRepo::new(db.clone())
        .get(match_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))
}

async fn overlapping_tournaments(
    db: &PgPool,
    mtch: &MatchRow,
) -> Result<Vec<infra::models::TournamentRow>, AppError> {
    Ok(TournamentRepo::new(db.clone())
        .overlapping_date(mtch.match_date)
        .await?)
}

fn player_summary(player: &PlayerRow) -> PlayerSummary {
    PlayerSummary {
        ipl_player_id: player.id,
        player_name: player.name.clone(),
        team: player.team.clone(),
    }
}
