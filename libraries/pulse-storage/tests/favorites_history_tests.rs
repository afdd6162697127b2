//! Integration tests for favorites, history and admin statistics

mod test_helpers;

use pulse_core::{types::*, PulseError};
use test_helpers::*;

#[tokio::test]
async fn test_favorite_add_is_idempotent() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let song = create_test_song(pool, user, "Fav", SongScope::Private).await;

    let first = pulse_storage::favorites::set(pool, user, song.id, true)
        .await
        .unwrap();
    let second = pulse_storage::favorites::set(pool, user, song.id, true)
        .await
        .unwrap();
    assert!(first.is_favorite && second.is_favorite);

    let favorites = pulse_storage::favorites::list(pool, user).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites[0].is_favorite);

    let listed = pulse_storage::songs::list_visible(pool, user).await.unwrap();
    assert!(listed[0].is_favorite);
}

#[tokio::test]
async fn test_favorite_remove_non_member_is_noop() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let song = create_test_song(pool, user, "Never Fav", SongScope::Private).await;

    let state = pulse_storage::favorites::set(pool, user, song.id, false)
        .await
        .unwrap();
    assert!(!state.is_favorite);
    assert!(pulse_storage::favorites::list(pool, user)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_favorite_requires_visible_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "owner").await;
    let other = create_test_user(pool, "other").await;
    let song = create_test_song(pool, owner, "Hidden", SongScope::Private).await;

    let denied = pulse_storage::favorites::set(pool, other, song.id, true).await;
    assert!(matches!(denied, Err(PulseError::PermissionDenied(_))));

    let missing = pulse_storage::favorites::set(pool, other, 4242, true).await;
    assert!(matches!(missing, Err(PulseError::NotFound { .. })));
}

#[tokio::test]
async fn test_history_appends_every_play() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "user").await;
    let a = create_test_song(pool, user, "A", SongScope::Private).await;
    let b = create_test_song(pool, user, "B", SongScope::Private).await;

    pulse_storage::history::record(pool, user, a.id).await.unwrap();
    pulse_storage::history::record(pool, user, a.id).await.unwrap();
    pulse_storage::history::record(pool, user, b.id).await.unwrap();

    let entries = pulse_storage::history::recent(pool, user, 50).await.unwrap();
    assert_eq!(entries.len(), 3);
    // Most recent first
    assert_eq!(entries[0].song_id, b.id);
    assert_eq!(entries[0].title, "B");

    let limited = pulse_storage::history::recent(pool, user, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_stats_and_top_played() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let user = create_test_user(pool, "user").await;
    let hit = create_test_song(pool, admin, "Hit", SongScope::Global).await;
    let deep_cut = create_test_song(pool, admin, "Deep Cut", SongScope::Global).await;
    create_test_song(pool, user, "Unplayed", SongScope::Private).await;

    let empty = pulse_storage::stats::global(pool).await.unwrap();
    assert_eq!(empty.total_plays, 0);
    assert_eq!(empty.top_song, None);

    for _ in 0..3 {
        pulse_storage::history::record(pool, user, hit.id).await.unwrap();
    }
    pulse_storage::history::record(pool, admin, deep_cut.id)
        .await
        .unwrap();

    let stats = pulse_storage::stats::global(pool).await.unwrap();
    assert_eq!(stats.total_songs, 3);
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_plays, 4);
    assert_eq!(stats.top_song.as_deref(), Some("Hit"));

    let top = pulse_storage::stats::top_played(pool, 10).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, hit.id);
    assert_eq!(top[0].plays, 3);
    assert_eq!(top[1].plays, 1);
}
