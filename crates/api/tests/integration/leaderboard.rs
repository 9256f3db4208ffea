use uuid::Uuid;

use api::error::AppError;
use api::services::leaderboard::tournament_leaderboard;
use api::services::points::{submit_points, SubmitPoints};
use infra::models::MatchStatus;

use crate::common::*;

#[tokio::test]
async fn completed_match_points_flow_through_to_the_owner() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let creator = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;

    let match_id = create_test_match(&state, day(5), MatchStatus::Completed).await;
    let player_id = create_test_player(&state, "CSK").await;
    select_team(&state, tournament_id, creator, &[player_id]).await;

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id,
            points: points(42),
            entered_by: admin,
        },
    )
    .await
    .expect("submission should succeed");

    let board = tournament_leaderboard(&state.db, tournament_id)
        .await
        .expect("leaderboard should compute");
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user_id, creator);
    assert_eq!(board[0].total_points, points(42));
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].match_points.len(), 1);
    assert_eq!(board[0].match_points[0].match_id, match_id);
    assert_eq!(board[0].match_points[0].points, points(42));
}

#[tokio::test]
async fn scheduled_matches_contribute_nothing() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let creator = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;

    let match_id = create_test_match(&state, day(5), MatchStatus::Scheduled).await;
    let player_id = create_test_player(&state, "MI").await;
    select_team(&state, tournament_id, creator, &[player_id]).await;

    // Points can be staged ahead of completion; they stay invisible here.
    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id,
            points: points(42),
            entered_by: admin,
        },
    )
    .await
    .expect("submission should succeed");

    let board = tournament_leaderboard(&state.db, tournament_id)
        .await
        .expect("leaderboard should compute");
    assert_eq!(board[0].total_points, points(0));
    assert!(board[0].match_points.is_empty());
}

#[tokio::test]
async fn matches_outside_the_tournament_window_are_ignored() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let creator = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;

    let outside_match = create_test_match(&state, day(20), MatchStatus::Completed).await;
    let player_id = create_test_player(&state, "RCB").await;
    select_team(&state, tournament_id, creator, &[player_id]).await;

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id: outside_match,
            player_id,
            points: points(99),
            entered_by: admin,
        },
    )
    .await
    .expect("submission should succeed");

    let board = tournament_leaderboard(&state.db, tournament_id)
        .await
        .expect("leaderboard should compute");
    assert_eq!(board[0].total_points, points(0));
}

#[tokio::test]
async fn ties_rank_equally_by_total_and_break_on_user_id() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let creator = create_test_user(&state, "user").await;
    let rival = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;

    let code = sqlx::query_scalar::<_, String>("SELECT join_code FROM tournaments WHERE id = $1")
        .bind(tournament_id)
        .fetch_one(&state.db)
        .await
        .expect("Failed to fetch join code");
    api::services::tournaments::join_tournament(&state.db, &sink, rival, &code)
        .await
        .expect("join should succeed");

    let match_id = create_test_match(&state, day(5), MatchStatus::Completed).await;
    let shared = create_test_player(&state, "KKR").await;
    select_team(&state, tournament_id, creator, &[shared]).await;
    select_team(&state, tournament_id, rival, &[shared]).await;

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id: shared,
            points: points(50),
            entered_by: admin,
        },
    )
    .await
    .expect("submission should succeed");

    let board = tournament_leaderboard(&state.db, tournament_id)
        .await
        .expect("leaderboard should compute");
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].total_points, points(50));
    assert_eq!(board[1].total_points, points(50));
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].rank, 2);
    assert!(
        board[0].user_id < board[1].user_id,
        "ties order by ascending user id"
    );
}

#[tokio::test]
async fn unknown_tournament_is_not_found() {
    let Some(state) = try_setup().await else { return };

    let err = tournament_leaderboard(&state.db, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
