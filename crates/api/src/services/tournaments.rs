use chrono::NaiveDate;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use infra::models::{ParticipantRow, TournamentRow};
use infra::repos::{CreateTournament, ParticipantRepo, TournamentRepo, UserRepo};

use crate::error::AppError;
use crate::realtime::{Event, EventSink, ParticipantSummary};

const JOIN_CODE_BYTES: usize = 4;
const MAX_JOIN_CODE_ATTEMPTS: u32 = 5;

/// Human-shareable join code: random bytes rendered as uppercase hex.
pub fn generate_join_code() -> String {
    let bytes: [u8; JOIN_CODE_BYTES] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

pub struct CreateTournamentParams {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Uuid,
}

/// Create a tournament with its creator auto-enrolled. The join code is
/// unique-constrained in the store; a collision regenerates and retries.
pub async fn create_tournament(
    db: &PgPool,
    params: CreateTournamentParams,
) -> Result<TournamentRow, AppError> {
    if params.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Tournament name is required".to_string(),
        ));
    }

    if params.start_date > params.end_date {
        return Err(AppError::BadRequest(
            "Start date must not be after end date".to_string(),
        ));
    }

    let repo = TournamentRepo::new(db.clone());

    for _ in 0..MAX_JOIN_CODE_ATTEMPTS {
        let result = repo
            .create(CreateTournament {
                name: params.name.clone(),
                join_code: generate_join_code(),
                created_by: params.created_by,
                start_date: params.start_date,
                end_date: params.end_date,
            })
            .await;

        match result {
            Ok(tournament) => return Ok(tournament),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(
        "Could not allocate a unique join code".to_string(),
    ))
}

/// Join by code. Duplicate membership is a Conflict; the tournament audience
/// hears about the new participant.
pub async fn join_tournament(
    db: &PgPool,
    sink: &dyn EventSink,
    user_id: Uuid,
    join_code: &str,
) -> Result<TournamentRow, AppError> {
    let tournament = TournamentRepo::new(db.clone())
        .get_by_code(join_code)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Tournament not found with the provided code".to_string())
        })?;

    let participants = ParticipantRepo::new(db.clone());

    if participants.get(tournament.id, user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "You are already a participant in this tournament".to_string(),
        ));
    }

    let edge: ParticipantRow = participants.insert(tournament.id, user_id).await?;

    let username = UserRepo::new(db.clone())
        .get(user_id)
        .await?
        .map(|u| u.username)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    sink.publish_tournament(
        tournament.id,
        Event::TournamentUpdate {
            tournament_id: tournament.id,
            message: format!("{} has joined the tournament", username),
            participant: ParticipantSummary {
                user_id,
                username,
                joined_at: edge.joined_at,
            },
        },
    );

    Ok(tournament)
}
