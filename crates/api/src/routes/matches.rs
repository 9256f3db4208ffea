use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{MatchRow, MatchStatus, PointWithPlayerRow};
use infra::repos::{CreateMatch, MatchRepo, PointRepo};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::realtime::{Event, EventSink, MatchUpdateKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub match_date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatchStatusRequest {
    pub status: MatchStatus,
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub match_record: MatchRow,
    pub fantasy_points: Vec<PointWithPlayerRow>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(MatchRepo::new(state.db.clone()).list().await?))
}

pub async fn upcoming(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(MatchRepo::new(state.db.clone()).upcoming().await?))
}

pub async fn completed(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(MatchRepo::new(state.db.clone()).completed().await?))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let match_record = MatchRepo::new(state.db.clone())
        .get(match_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

    let fantasy_points = PointRepo::new(state.db.clone()).by_match(match_id).await?;

    Ok(Json(MatchDetail {
        match_record,
        fantasy_points,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let match_record = MatchRepo::new(state.db.clone())
        .create(CreateMatch {
            match_date: body.match_date,
            team1: body.team1,
            team2: body.team2,
            venue: body.venue,
            status: body.status.unwrap_or(MatchStatus::Scheduled),
        })
        .await?;

    state.events.publish_global(Event::MatchUpdate {
        subtype: MatchUpdateKind::NewMatch,
        match_record: match_record.clone(),
    });

    Ok((StatusCode::CREATED, Json(match_record)))
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(match_id): Path<Uuid>,
    Json(body): Json<UpdateMatchStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let match_record = MatchRepo::new(state.db.clone())
        .update_status(match_id, body.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

    state.events.publish_global(Event::MatchUpdate {
        subtype: MatchUpdateKind::StatusUpdate,
        match_record: match_record.clone(),
    });

    Ok(Json(match_record))
}
