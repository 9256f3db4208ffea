use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{ParticipantUserRow, TournamentRow, TournamentWithCountRow};
use infra::repos::{ParticipantRepo, TeamSelectionRepo, TournamentRepo, UserRepo};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::services::leaderboard;
use crate::services::tournaments::{self, CreateTournamentParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub tournament_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct JoinTournamentRequest {
    pub tournament_code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub player_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct JoinTournamentResponse {
    pub message: String,
    pub tournament: TournamentRow,
}

#[derive(Debug, Serialize)]
pub struct MyTournament {
    #[serde(flatten)]
    pub tournament: TournamentWithCountRow,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub tournament: TournamentRow,
    pub creator_username: String,
    pub participants: Vec<ParticipantUserRow>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(TournamentRepo::new(state.db.clone()).list().await?))
}

/// Tournaments the caller created, then tournaments they joined.
pub async fn mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let repo = TournamentRepo::new(state.db.clone());

    let mut result: Vec<MyTournament> = repo
        .created_by_user(user.id)
        .await?
        .into_iter()
        .map(|tournament| MyTournament {
            tournament,
            role: "creator",
        })
        .collect();

    result.extend(
        repo.joined_by_user(user.id)
            .await?
            .into_iter()
            .map(|tournament| MyTournament {
                tournament,
                role: "participant",
            }),
    );

    Ok(Json(result))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(tournament_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = TournamentRepo::new(state.db.clone())
        .get(tournament_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

    let creator_username = UserRepo::new(state.db.clone())
        .get(tournament.created_by)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    let participants = ParticipantRepo::new(state.db.clone())
        .roster_by_join_time(tournament_id)
        .await?;

    Ok(Json(TournamentDetail {
        tournament,
        creator_username,
        participants,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = tournaments::create_tournament(
        &state.db,
        CreateTournamentParams {
            name: body.tournament_name,
            start_date: body.start_date,
            end_date: body.end_date,
            created_by: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn join(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<JoinTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tournament = tournaments::join_tournament(
        &state.db,
        state.events.as_ref(),
        user.id,
        &body.tournament_code,
    )
    .await?;

    Ok(Json(JoinTournamentResponse {
        message: "Successfully joined tournament".to_string(),
        tournament,
    }))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(tournament_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let board = leaderboard::tournament_leaderboard(&state.db, tournament_id).await?;
    Ok(Json(board))
}

/// Replace the caller's fantasy team selection for a tournament they belong
/// to; this is the player set the leaderboard counts for them.
pub async fn update_team(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(tournament_id): Path<Uuid>,
    Json(body): Json<UpdateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    TournamentRepo::new(state.db.clone())
        .get(tournament_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;

    ParticipantRepo::new(state.db.clone())
        .get(tournament_id, user.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("You are not a participant in this tournament".to_string())
        })?;

    TeamSelectionRepo::new(state.db.clone())
        .replace(tournament_id, user.id, &body.player_ids)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Team selection updated",
        "player_ids": body.player_ids,
    })))
}
