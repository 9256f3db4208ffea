use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::jwt::jwt_middleware;
use crate::routes::{matches, players, points, tournaments};
use crate::state::AppState;
use crate::ws::ws_handler;

/// Build the Axum router: REST surface, WebSocket subscription endpoint,
/// and a health probe.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        // Realtime subscription socket
        .route("/ws", get(ws_handler))
        // Point ingestion + reads
        .route("/points", post(points::submit))
        .route("/points/bulk", post(points::submit_bulk))
        .route("/points/match/{match_id}", get(points::by_match))
        .route("/points/player/{player_id}", get(points::by_player))
        // Matches
        .route("/matches", get(matches::list).post(matches::create))
        .route("/matches/upcoming", get(matches::upcoming))
        .route("/matches/completed", get(matches::completed))
        .route(
            "/matches/{match_id}",
            get(matches::get).put(matches::update_status),
        )
        // Players
        .route("/players", get(players::list).post(players::create))
        .route("/players/teams", get(players::teams))
        .route("/players/team/{team}", get(players::by_team))
        .route("/players/{player_id}", get(players::get))
        // Tournaments + membership
        .route(
            "/tournaments",
            get(tournaments::list).post(tournaments::create),
        )
        .route("/tournaments/mine", get(tournaments::mine))
        .route("/tournaments/join", post(tournaments::join))
        .route("/tournaments/{tournament_id}", get(tournaments::get))
        .route(
            "/tournaments/{tournament_id}/leaderboard",
            get(tournaments::get_leaderboard),
        )
        .route(
            "/tournaments/{tournament_id}/team",
            put(tournaments::update_team),
        )
        // App state (PgPool, event bus, auth services)
        .with_state(state.clone())
        // JWT middleware for authentication
        .layer(middleware::from_fn_with_state(state, jwt_middleware))
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer({
            let allowed_origins = std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string());

            let origins: Vec<HeaderValue> = allowed_origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true)
        })
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok("ok")
}
