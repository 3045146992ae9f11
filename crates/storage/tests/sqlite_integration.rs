use chrono::Duration;
use quiz_core::model::{GameId, HighScore};
use quiz_core::time::fixed_now;
use storage::repository::{HighScoreRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_high_scores() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_scores?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let speed = GameId::from("speed-maths");
    let practice = GameId::from("practice-maths");
    assert!(repo.get_high_score(&speed).await.unwrap().is_none());

    repo.put_high_score(&speed, &HighScore::new(14, 20, fixed_now()))
        .await
        .unwrap();
    repo.put_high_score(&practice, &HighScore::new(20, 20, fixed_now()))
        .await
        .unwrap();

    let later = fixed_now() + Duration::days(2);
    repo.put_high_score(&speed, &HighScore::new(17, 20, later))
        .await
        .unwrap();

    let stored = repo.get_high_score(&speed).await.unwrap().expect("stored");
    assert_eq!(stored.score, 17);
    assert_eq!(stored.total, 20);
    assert_eq!(stored.date, later);

    let all = repo.list_high_scores().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get(&practice).unwrap().score, 20);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_wires_the_high_score_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    let game = GameId::from("speed-maths");
    storage
        .high_scores
        .put_high_score(&game, &HighScore::new(3, 4, fixed_now()))
        .await
        .unwrap();
    let all = storage.high_scores.list_high_scores().await.unwrap();
    assert_eq!(all.get(&game).unwrap().score, 3);
}
