use std::env;

use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use api::realtime::{Event, EventSink};
use api::AppState;
use infra::models::MatchStatus;

/// Connect to the test database, or `None` when `TEST_DATABASE_URL` is not
/// set so the suite can pass without a live Postgres.
pub async fn try_setup() -> Option<AppState> {
    let database_url = match env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return None;
        }
    };

    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(AppState::new(pool).expect("Failed to create AppState"))
}

/// Records everything published through it, for asserting notification
/// fan-out without a live socket.
#[derive(Default)]
pub struct RecordingSink {
    pub global: Mutex<Vec<Event>>,
    pub scoped: Mutex<Vec<(Uuid, Event)>>,
}

impl EventSink for RecordingSink {
    fn publish_global(&self, event: Event) {
        self.global.lock().push(event);
    }

    fn publish_tournament(&self, tournament_id: Uuid, event: Event) {
        self.scoped.lock().push((tournament_id, event));
    }
}

#[allow(dead_code)]
pub async fn create_test_user(state: &AppState, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, username, email, role) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(format!("test_{}", id.simple()))
        .bind(format!("{}@test.example", id.simple()))
        .bind(role)
        .execute(&state.db)
        .await
        .expect("Failed to create test user");
    id
}

#[allow(dead_code)]
pub async fn create_test_match(state: &AppState, date: NaiveDate, status: MatchStatus) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO matches (id, match_date, team1, team2, venue, status) \
         VALUES ($1, $2, 'CSK', 'MI', 'Test Stadium', $3)",
    )
    .bind(id)
    .bind(date)
    .bind(status)
    .execute(&state.db)
    .await
    .expect("Failed to create test match");
    id
}

#[allow(dead_code)]
pub async fn create_test_player(state: &AppState, team: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO players (id, name, team) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(format!("Player {}", id.simple()))
        .bind(team)
        .execute(&state.db)
        .await
        .expect("Failed to create test player");
    id
}

#[allow(dead_code)]
pub async fn create_test_tournament(
    state: &AppState,
    created_by: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Uuid {
    let tournament = api::services::tournaments::create_tournament(
        &state.db,
        api::services::tournaments::CreateTournamentParams {
            name: "Test Tournament".to_string(),
            start_date: start,
            end_date: end,
            created_by,
        },
    )
    .await
    .expect("Failed to create test tournament");
    tournament.id
}

#[allow(dead_code)]
pub async fn select_team(state: &AppState, tournament_id: Uuid, user_id: Uuid, players: &[Uuid]) {
    infra::repos::TeamSelectionRepo::new(state.db.clone())
        .replace(tournament_id, user_id, players)
        .await
        .expect("Failed to set team selection");
}

#[allow(dead_code)]
pub fn points(value: i64) -> Decimal {
    Decimal::from(value)
}

#[allow(dead_code)]
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}
