use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Completed => "completed",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "completed" => Ok(MatchStatus::Completed),
            _ => Err(format!("Unknown match status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: Uuid,
    pub match_date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub name: String,
    pub team: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PointEntryRow {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub points: Decimal,
    pub entered_by: Uuid,
    pub entered_at: DateTime<Utc>,
}

/// Point entry joined with the player it belongs to, for match-scoped reads.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PointWithPlayerRow {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub points: Decimal,
    pub entered_by: Uuid,
    pub entered_at: DateTime<Utc>,
    pub player_name: String,
    pub team: String,
}

/// Point entry joined with its match, for player-scoped reads.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PointWithMatchRow {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub points: Decimal,
    pub entered_by: Uuid,
    pub entered_at: DateTime<Utc>,
    pub match_date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub venue: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentRow {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Tournament with its creator's username and the current roster size.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentOverviewRow {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub creator_username: String,
    pub participant_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TournamentWithCountRow {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub participant_count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Membership edge joined with the member's username, for roster reads.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ParticipantUserRow {
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamSelectionRow {
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub player_id: Uuid,
}
