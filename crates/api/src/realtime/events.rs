use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::MatchRow;

/// Player identity as it appears in event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub ipl_player_id: Uuid,
    pub player_name: String,
    pub team: String,
}

/// New roster member as it appears in `tournament-update` payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchUpdateKind {
    NewMatch,
    StatusUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointsUpdateKind {
    PointsAdded,
    PointsUpdated,
}

/// Everything the realtime bus can push to a session. Global variants go to
/// every connected session, tournament variants only to sessions subscribed
/// to that tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    MatchUpdate {
        #[serde(rename = "type")]
        subtype: MatchUpdateKind,
        #[serde(rename = "match")]
        match_record: MatchRow,
    },
    PointsUpdate {
        #[serde(rename = "type")]
        subtype: PointsUpdateKind,
        match_id: Uuid,
        player: PlayerSummary,
        fantasy_points: Decimal,
        updated_at: DateTime<Utc>,
    },
    PointsBulkUpdate {
        match_id: Uuid,
        updated_at: DateTime<Utc>,
    },
    TournamentUpdate {
        tournament_id: Uuid,
        message: String,
        participant: ParticipantSummary,
    },
    TournamentPointsUpdate {
        tournament_id: Uuid,
        match_id: Uuid,
        player: PlayerSummary,
        fantasy_points: Decimal,
        updated_at: DateTime<Utc>,
    },
    TournamentLeaderboardUpdate {
        tournament_id: Uuid,
        match_id: Uuid,
        updated_at: DateTime<Utc>,
    },
}
