use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{PlayerRow, PointWithMatchRow};
use infra::repos::{CreatePlayer, PlayerRepo, PointRepo};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub player_name: String,
    pub team: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: PlayerRow,
    pub fantasy_points_history: Vec<PointWithMatchRow>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(PlayerRepo::new(state.db.clone()).list().await?))
}

pub async fn teams(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(PlayerRepo::new(state.db.clone()).teams().await?))
}

pub async fn by_team(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(team): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(PlayerRepo::new(state.db.clone()).by_team(&team).await?))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(player_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let player = PlayerRepo::new(state.db.clone())
        .get(player_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

    let fantasy_points_history = PointRepo::new(state.db.clone()).by_player(player_id).await?;

    Ok(Json(PlayerDetail {
        player,
        fantasy_points_history,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PlayerRepo::new(state.db.clone());

    if repo
        .get_by_name_and_team(&body.player_name, &body.team)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Player already exists".to_string()));
    }

    let player = repo
        .create(CreatePlayer {
            name: body.player_name,
            team: body.team,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(player)))
}
