//! Integration tests for the songs slice
//!
//! Covers visibility (global vs. private), library ordering, admin edits and
//! reordering of the global library.

mod test_helpers;

use pulse_core::{types::*, PulseError};
use test_helpers::*;

#[tokio::test]
async fn test_visible_songs_are_global_or_owned() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;

    let global = create_test_song(pool, admin, "Library", SongScope::Global).await;
    let alice_song = create_test_song(pool, alice, "Alice Song", SongScope::Private).await;
    let bob_song = create_test_song(pool, bob, "Bob Song", SongScope::Private).await;

    let all = [&global, &alice_song, &bob_song];
    for user in [admin, alice, bob] {
        let visible = pulse_storage::songs::list_visible(pool, user).await.unwrap();
        for song in all {
            let listed = visible.iter().any(|s| s.id == song.id);
            assert_eq!(
                listed,
                song.is_global || song.user_id == user,
                "song {} for user {}",
                song.title,
                user
            );
        }
    }
}

#[tokio::test]
async fn test_global_songs_listed_before_private() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let alice = create_test_user(pool, "alice").await;

    create_test_song(pool, alice, "Mine First", SongScope::Private).await;
    create_test_song(pool, admin, "Global A", SongScope::Global).await;
    create_test_song(pool, alice, "Mine Second", SongScope::Private).await;
    create_test_song(pool, admin, "Global B", SongScope::Global).await;

    let songs = pulse_storage::songs::list_visible(pool, alice).await.unwrap();
    let flags: Vec<bool> = songs.iter().map(|s| s.is_global).collect();
    assert_eq!(flags, vec![true, true, false, false]);

    // Curated order within the global block
    assert_eq!(songs[0].title, "Global A");
    assert_eq!(songs[1].title, "Global B");
}

#[tokio::test]
async fn test_global_uploads_append_positions() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let first = create_test_song(pool, admin, "One", SongScope::Global).await;
    let second = create_test_song(pool, admin, "Two", SongScope::Global).await;
    let private = create_test_song(pool, admin, "Private", SongScope::Private).await;

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
    assert_eq!(private.position, 0);
}

#[tokio::test]
async fn test_duplicate_filename_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    create_test_song(pool, alice, "Same", SongScope::Private).await;

    let result = pulse_storage::songs::create(
        pool,
        CreateSong {
            user_id: alice,
            filename: format!("same_{alice}.mp3"),
            title: "Same".to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: None,
            duration: 1.5,
            scope: SongScope::Private,
        },
    )
    .await;

    assert!(matches!(result, Err(PulseError::Duplicate(_))));
}

#[tokio::test]
async fn test_lookup_by_filename_and_delete() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let song = create_test_song(pool, alice, "Lookup", SongScope::Private).await;

    let found = pulse_storage::songs::get_by_filename(pool, &song.filename)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, song.id);

    assert!(pulse_storage::songs::delete(pool, song.id).await.unwrap());
    assert!(!pulse_storage::songs::delete(pool, song.id).await.unwrap());
    assert!(pulse_storage::songs::get_by_filename(pool, &song.filename)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_global_metadata() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let global = create_test_song(pool, admin, "Old Title", SongScope::Global).await;
    let private = create_test_song(pool, admin, "Private", SongScope::Private).await;

    let updated =
        pulse_storage::songs::update_global_metadata(pool, global.id, "  New Title ", Some(""), None)
            .await
            .unwrap();
    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.artist, UNKNOWN_ARTIST);

    let tagged = pulse_storage::songs::update_global_metadata(
        pool,
        global.id,
        "New Title",
        Some("Band"),
        Some(" LP "),
    )
    .await
    .unwrap();
    assert_eq!(tagged.artist, "Band");
    assert_eq!(tagged.album.as_deref(), Some("LP"));

    // Blank optional fields reset like missing ones
    let cleared =
        pulse_storage::songs::update_global_metadata(pool, global.id, "New Title", Some(" "), Some(""))
            .await
            .unwrap();
    assert_eq!(cleared.artist, UNKNOWN_ARTIST);
    assert_eq!(cleared.album, None);

    let blank = pulse_storage::songs::update_global_metadata(pool, global.id, "   ", None, None).await;
    assert!(matches!(blank, Err(PulseError::InvalidInput(_))));

    let not_global =
        pulse_storage::songs::update_global_metadata(pool, private.id, "X", None, None).await;
    assert!(matches!(not_global, Err(PulseError::NotFound { .. })));
}

#[tokio::test]
async fn test_reorder_only_touches_global_rows() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let admin = create_test_admin(pool, "admin").await;
    let a = create_test_song(pool, admin, "A", SongScope::Global).await;
    let b = create_test_song(pool, admin, "B", SongScope::Global).await;
    let c = create_test_song(pool, admin, "C", SongScope::Global).await;
    let private = create_test_song(pool, admin, "P", SongScope::Private).await;

    let updated = pulse_storage::songs::reorder_global(pool, &[c.id, private.id, a.id, b.id])
        .await
        .unwrap();
    assert_eq!(updated, 3);

    let library = pulse_storage::songs::list_global(pool).await.unwrap();
    let titles: Vec<&str> = library.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);

    let untouched = pulse_storage::songs::get_by_id(pool, private.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.position, 0);
}
