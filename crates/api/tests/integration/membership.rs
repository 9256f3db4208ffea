use uuid::Uuid;

use api::error::AppError;
use api::realtime::Event;
use api::services::tournaments::join_tournament;
use infra::repos::ParticipantRepo;

use crate::common::*;

async fn join_code_of(state: &api::AppState, tournament_id: Uuid) -> String {
    sqlx::query_scalar::<_, String>("SELECT join_code FROM tournaments WHERE id = $1")
        .bind(tournament_id)
        .fetch_one(&state.db)
        .await
        .expect("Failed to fetch join code")
}

async fn participant_count(state: &api::AppState, tournament_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tournament_participants WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_one(&state.db)
    .await
    .expect("Failed to count participants")
}

#[tokio::test]
async fn creating_a_tournament_enrolls_the_creator() {
    let Some(state) = try_setup().await else { return };

    let creator = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;

    let edge = ParticipantRepo::new(state.db.clone())
        .get(tournament_id, creator)
        .await
        .expect("participant lookup should succeed");
    assert!(edge.is_some(), "creator must be a participant from the start");
    assert_eq!(participant_count(&state, tournament_id).await, 1);
}

#[tokio::test]
async fn joining_by_code_adds_the_edge_and_notifies_the_tournament() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let creator = create_test_user(&state, "user").await;
    let joiner = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;
    let code = join_code_of(&state, tournament_id).await;

    let tournament = join_tournament(&state.db, &sink, joiner, &code)
        .await
        .expect("join should succeed");
    assert_eq!(tournament.id, tournament_id);
    assert_eq!(participant_count(&state, tournament_id).await, 2);

    let scoped = sink.scoped.lock();
    assert!(scoped.iter().any(|(id, event)| {
        *id == tournament_id
            && matches!(
                event,
                Event::TournamentUpdate { participant, .. } if participant.user_id == joiner
            )
    }));
}

#[tokio::test]
async fn joining_with_an_unknown_code_changes_nothing() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let user = create_test_user(&state, "user").await;

    let err = join_tournament(&state.db, &sink, user, "ZZZZZZZZ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(sink.scoped.lock().is_empty());
}

#[tokio::test]
async fn joining_twice_is_a_conflict_and_does_not_duplicate_the_edge() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let creator = create_test_user(&state, "user").await;
    let joiner = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;
    let code = join_code_of(&state, tournament_id).await;

    join_tournament(&state.db, &sink, joiner, &code)
        .await
        .expect("first join should succeed");

    let err = join_tournament(&state.db, &sink, joiner, &code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(participant_count(&state, tournament_id).await, 2);

    // Only the first join was announced.
    assert_eq!(sink.scoped.lock().len(), 1);
}

#[tokio::test]
async fn creator_join_by_own_code_is_a_conflict() {
    let Some(state) = try_setup().await else { return };
    let sink = RecordingSink::default();

    let creator = create_test_user(&state, "user").await;
    let tournament_id = create_test_tournament(&state, creator, day(1), day(10)).await;
    let code = join_code_of(&state, tournament_id).await;

    let err = join_tournament(&state.db, &sink, creator, &code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(participant_count(&state, tournament_id).await, 1);
}
