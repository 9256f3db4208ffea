use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::services::points::{self, BulkEntry, SubmitPoints, SubmitPointsBulk};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitPointsRequest {
    pub match_id: Uuid,
    pub ipl_player_id: Uuid,
    pub fantasy_points: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BulkPointsItem {
    pub ipl_player_id: Uuid,
    pub fantasy_points: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BulkPointsRequest {
    pub match_id: Uuid,
    #[serde(default)]
    pub points_data: Vec<BulkPointsItem>,
}

pub async fn submit(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<SubmitPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = points::submit_points(
        &state.db,
        state.events.as_ref(),
        SubmitPoints {
            match_id: body.match_id,
            player_id: body.ipl_player_id,
            points: body.fantasy_points,
            entered_by: admin.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn submit_bulk(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<BulkPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rows = points::submit_points_bulk(
        &state.db,
        state.events.as_ref(),
        SubmitPointsBulk {
            match_id: body.match_id,
            entries: body
                .points_data
                .into_iter()
                .map(|item| BulkEntry {
                    player_id: item.ipl_player_id,
                    points: item.fantasy_points,
                })
                .collect(),
            entered_by: admin.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(rows)))
}

pub async fn by_match(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(match_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rows = points::points_by_match(&state.db, match_id).await?;
    Ok(Json(rows))
}

pub async fn by_player(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(player_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rows = points::points_by_player(&state.db, player_id).await?;
    Ok(Json(rows))
}
