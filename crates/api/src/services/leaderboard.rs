use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use infra::models::{MatchRow, MatchStatus, ParticipantUserRow, PointEntryRow};
use infra::repos::{MatchRepo, ParticipantRepo, PointRepo, TeamSelectionRepo, TournamentRepo};

use crate::error::AppError;

/// One participant's contribution from a single completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub match_id: Uuid,
    pub match_date: NaiveDate,
    pub teams: String,
    pub points: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub total_points: Decimal,
    pub match_points: Vec<MatchBreakdown>,
    pub rank: u32,
}

/// Compute the ranked leaderboard for one tournament.
///
/// Four bulk fetches (matches in window, roster, team selections, point
/// entries) feed a pure in-memory aggregation; nothing is queried per
/// participant or per match.
pub async fn tournament_leaderboard(
    db: &PgPool,
    tournament_id: Uuid,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let tournament = TournamentRepo::new(db.clone())
        .get(tournament_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

    let matches = MatchRepo::new(db.clone())
        .in_window(tournament.start_date, tournament.end_date)
        .await?;

    let roster = ParticipantRepo::new(db.clone()).roster(tournament_id).await?;

    let selections = group_selections(
        TeamSelectionRepo::new(db.clone())
            .for_tournament(tournament_id)
            .await?
            .into_iter()
            .map(|row| (row.user_id, row.player_id)),
    );

    let completed_ids: Vec<Uuid> = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Completed)
        .map(|m| m.id)
        .collect();
    let points = PointRepo::new(db.clone()).for_matches(&completed_ids).await?;

    Ok(compute(&matches, &roster, &selections, &points))
}

fn group_selections(
    edges: impl IntoIterator<Item = (Uuid, Uuid)>,
) -> HashMap<Uuid, HashSet<Uuid>> {
    let mut grouped: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for (user_id, player_id) in edges {
        grouped.entry(user_id).or_default().insert(player_id);
    }
    grouped
}

/// Pure aggregation: matches must be in date order and the roster in user-id
/// order (the deterministic tie-break for equal totals).
///
/// Only completed matches contribute; scheduled matches are ignored even if
/// points were pre-staged for them. Ranks are strictly sequential, so equal
/// totals never share a rank.
fn compute(
    matches: &[MatchRow],
    roster: &[ParticipantUserRow],
    selections: &HashMap<Uuid, HashSet<Uuid>>,
    points: &[PointEntryRow],
) -> Vec<LeaderboardEntry> {
    // match -> player -> points, grouped once for every participant.
    let mut by_match: HashMap<Uuid, HashMap<Uuid, Decimal>> = HashMap::new();
    for entry in points {
        by_match
            .entry(entry.match_id)
            .or_default()
            .insert(entry.player_id, entry.points);
    }

    let empty = HashSet::new();

    let mut entries: Vec<LeaderboardEntry> = roster
        .iter()
        .map(|participant| {
            let team = selections.get(&participant.user_id).unwrap_or(&empty);

            let mut total = Decimal::ZERO;
            let mut breakdown = Vec::new();

            for m in matches {
                if m.status != MatchStatus::Completed {
                    continue;
                }

                let match_total = by_match
                    .get(&m.id)
                    .map(|scores| {
                        team.iter()
                            .filter_map(|player_id| scores.get(player_id))
                            .copied()
                            .sum()
                    })
                    .unwrap_or(Decimal::ZERO);

                total += match_total;
                breakdown.push(MatchBreakdown {
                    match_id: m.id,
                    match_date: m.match_date,
                    teams: format!("{} vs {}", m.team1, m.team2),
                    points: match_total,
                });
            }

            LeaderboardEntry {
                user_id: participant.user_id,
                username: participant.username.clone(),
                total_points: total,
                match_points: breakdown,
                rank: 0,
            }
        })
        .collect();

    // Stable sort keeps the roster's user-id order for equal totals.
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}
