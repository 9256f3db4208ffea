use rust_decimal::Decimal;
use uuid::Uuid;

use api::error::AppError;
use api::realtime::Event;
use api::services::points::{
    submit_points, submit_points_bulk, BulkEntry, SubmitPoints, SubmitPointsBulk,
};
use infra::models::{MatchStatus, PointEntryRow};

use crate::common::*;

async fn fetch_entries(state: &api::AppState, match_id: Uuid) -> Vec<PointEntryRow> {
    sqlx::query_as::<_, PointEntryRow>(
        "SELECT match_id, player_id, points, entered_by, entered_at \
         FROM match_points WHERE match_id = $1",
    )
    .bind(match_id)
    .fetch_all(&state.db)
    .await
    .expect("Failed to fetch point entries")
}

async fn match_status(state: &api::AppState, match_id: Uuid) -> MatchStatus {
    sqlx::query_scalar::<_, MatchStatus>("SELECT status FROM matches WHERE id = $1")
        .bind(match_id)
        .fetch_one(&state.db)
        .await
        .expect("Failed to fetch match status")
}

#[tokio::test]
async fn resubmitting_points_keeps_one_row_with_latest_value() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let second_admin = create_test_user(&state, "admin").await;
    let match_id = create_test_match(&state, day(5), MatchStatus::Completed).await;
    let player_id = create_test_player(&state, "CSK").await;

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id,
            points: points(10),
            entered_by: admin,
        },
    )
    .await
    .expect("first submission should succeed");

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id,
            points: points(25),
            entered_by: second_admin,
        },
    )
    .await
    .expect("second submission should succeed");

    let entries = fetch_entries(&state, match_id).await;
    assert_eq!(entries.len(), 1, "upsert must never duplicate rows");
    assert_eq!(entries[0].points, points(25));
    assert_eq!(entries[0].entered_by, second_admin, "latest attribution wins");
}

#[tokio::test]
async fn submitting_for_unknown_match_or_player_is_not_found() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let player_id = create_test_player(&state, "MI").await;

    let err = submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id: Uuid::new_v4(),
            player_id,
            points: points(5),
            entered_by: admin,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let match_id = create_test_match(&state, day(5), MatchStatus::Completed).await;
    let err = submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id: Uuid::new_v4(),
            points: points(5),
            entered_by: admin,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(sink.global.lock().is_empty(), "failed calls must not notify");
}

#[tokio::test]
async fn single_submission_notifies_overlapping_tournaments_only() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let creator = create_test_user(&state, "user").await;
    let match_id = create_test_match(&state, day(5), MatchStatus::Completed).await;
    let player_id = create_test_player(&state, "RCB").await;

    let overlapping = create_test_tournament(&state, creator, day(1), day(10)).await;
    let outside = create_test_tournament(&state, creator, day(20), day(25)).await;

    submit_points(
        &state.db,
        &sink,
        SubmitPoints {
            match_id,
            player_id,
            points: points(12),
            entered_by: admin,
        },
    )
    .await
    .expect("submission should succeed");

    let global = sink.global.lock();
    assert!(matches!(global[0], Event::PointsUpdate { .. }));

    let scoped = sink.scoped.lock();
    assert!(scoped.iter().any(|(id, event)| {
        *id == overlapping && matches!(event, Event::TournamentPointsUpdate { .. })
    }));
    assert!(
        scoped.iter().all(|(id, _)| *id != outside),
        "tournaments outside the window must not be notified"
    );
}

#[tokio::test]
async fn bulk_submission_skips_unknown_players_and_completes_the_match() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let match_id = create_test_match(&state, day(6), MatchStatus::Scheduled).await;
    let known = create_test_player(&state, "KKR").await;

    let rows = submit_points_bulk(
        &state.db,
        &sink,
        SubmitPointsBulk {
            match_id,
            entries: vec![
                BulkEntry {
                    player_id: known,
                    points: points(30),
                },
                BulkEntry {
                    player_id: Uuid::new_v4(), // unknown, silently skipped
                    points: points(99),
                },
            ],
            entered_by: admin,
        },
    )
    .await
    .expect("bulk submission should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].player_id, known);
    assert_eq!(match_status(&state, match_id).await, MatchStatus::Completed);
    assert!(matches!(
        sink.global.lock()[0],
        Event::PointsBulkUpdate { .. }
    ));
}

#[tokio::test]
async fn bulk_submission_with_empty_entries_is_rejected_before_any_write() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let match_id = create_test_match(&state, day(6), MatchStatus::Scheduled).await;

    let err = submit_points_bulk(
        &state.db,
        &sink,
        SubmitPointsBulk {
            match_id,
            entries: vec![],
            entered_by: admin,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(match_status(&state, match_id).await, MatchStatus::Scheduled);
}

#[tokio::test]
async fn bulk_submission_rolls_back_entirely_on_storage_failure() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let admin = create_test_user(&state, "admin").await;
    let match_id = create_test_match(&state, day(7), MatchStatus::Scheduled).await;
    let p1 = create_test_player(&state, "DC").await;
    let p2 = create_test_player(&state, "DC").await;

    // NUMERIC(7,2) cannot hold this value; the third entry faults mid-batch.
    let overflowing = Decimal::from(10_000_000i64);

    let result = submit_points_bulk(
        &state.db,
        &sink,
        SubmitPointsBulk {
            match_id,
            entries: vec![
                BulkEntry {
                    player_id: p1,
                    points: points(10),
                },
                BulkEntry {
                    player_id: p2,
                    points: points(20),
                },
                BulkEntry {
                    player_id: p1,
                    points: overflowing,
                },
            ],
            entered_by: admin,
        },
    )
    .await;

    assert!(result.is_err());
    assert!(
        fetch_entries(&state, match_id).await.is_empty(),
        "no partial writes may survive a failed batch"
    );
    assert_eq!(
        match_status(&state, match_id).await,
        MatchStatus::Scheduled,
        "status flip must roll back with the batch"
    );
    assert!(sink.global.lock().is_empty(), "no events for a failed batch");
}
