use chrono::Utc;
use treehole_core::feed::{FeedStore, Tab};
use treehole_core::post::Mood;

fn seeded() -> FeedStore {
    FeedStore::seeded(Utc::now())
}

#[test]
fn test_like_toggles_round_trip_and_flip() {
    let mut store = seeded();
    let fresh = seeded();
    let ids: Vec<String> = store.posts().iter().map(|p| p.id.clone()).collect();

    for _ in 0..4 {
        for id in &ids {
            store.toggle_like(id);
        }
    }
    for (after, before) in store.posts().iter().zip(fresh.posts()) {
        assert_eq!(after.likes, before.likes);
        assert_eq!(after.is_liked, before.is_liked);
    }

    for id in &ids {
        store.toggle_like(id);
    }
    for (after, before) in store.posts().iter().zip(fresh.posts()) {
        assert_eq!(after.is_liked, !before.is_liked);
        let expected = if before.is_liked {
            before.likes - 1
        } else {
            before.likes + 1
        };
        assert_eq!(after.likes, expected);
    }
}

#[test]
fn test_saved_view_tracks_save_toggles() {
    let mut store = seeded();

    store.toggle_save("1");
    store.toggle_save("2");

    let saved: Vec<&str> = store
        .filtered_view(Tab::Saved)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(saved, vec!["1"]);

    let home: Vec<&str> = store
        .filtered_view(Tab::Home)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(home, vec!["1", "2", "3"]);
}

#[test]
fn test_new_posts_always_prefixed() {
    let mut store = seeded();

    for (i, mood) in [Mood::Happy, Mood::Angry, Mood::Grateful].into_iter().enumerate() {
        let pending = store.begin_post(&format!("entry {i}"), mood).unwrap();
        store.finalize_post(pending, "echo");
        assert_eq!(store.posts()[0].content, format!("entry {i}"));
        assert_eq!(store.posts()[0].mood, mood);
    }

    assert_eq!(store.len(), 6);
    assert!(
        store
            .posts()
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );

    let mut ids: Vec<&str> = store.posts().iter().map(|p| p.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_rejected_input_does_not_touch_feed() {
    let mut store = seeded();
    let before = store.posts().to_vec();

    assert!(store.begin_post("", Mood::Neutral).is_err());
    assert!(store.add_comment("2", "   ").is_err());
    assert!(store.add_comment("nope", "hello").is_err());

    assert_eq!(store.posts(), before.as_slice());
    assert!(!store.is_submitting());
}
