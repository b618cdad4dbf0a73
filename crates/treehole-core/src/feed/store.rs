use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::seed::seed_posts;
use super::tab::Tab;
use crate::error::{Result, TreeholeError};
use crate::post::{Comment, DEFAULT_AUTHOR_ALIAS, Mood, Post};

/// A post submission that has been validated but is still waiting for its echo.
///
/// Returned by [`FeedStore::begin_post`] and consumed by
/// [`FeedStore::finalize_post`]. If the submission is dropped instead, its id
/// must be released with [`FeedStore::abandon_post`].
#[derive(Debug)]
#[must_use = "a pending post must be finalized or abandoned"]
pub struct PendingPost {
    id: String,
    content: String,
    mood: Mood,
}

impl PendingPost {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }
}

/// The single source of truth for the post collection.
///
/// `FeedStore` is a plain owned collection: every operation is a synchronous
/// state transition and there is no change notification, so callers re-read
/// the view after mutating. Posts are kept newest first.
#[derive(Debug, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
    /// Ids of submissions that are waiting for their echo.
    pending: HashSet<String>,
}

impl FeedStore {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a feed from existing posts, sorted newest first.
    pub fn with_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            posts,
            pending: HashSet::new(),
        }
    }

    /// Creates a feed holding the mock posts, timestamped relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::with_posts(seed_posts(now))
    }

    /// All posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn get_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }

    /// Flips the like flag of a post and adjusts its counter by one.
    ///
    /// Unknown ids are ignored and return `None`.
    pub fn toggle_like(&mut self, post_id: &str) -> Option<&Post> {
        let post = self.get_mut(post_id)?;
        post.toggle_like();
        tracing::debug!(post_id, is_liked = post.is_liked, likes = post.likes, "Toggled like");
        Some(&*post)
    }

    /// Flips the saved flag of a post. No other field changes.
    ///
    /// Unknown ids are ignored and return `None`.
    pub fn toggle_save(&mut self, post_id: &str) -> Option<&Post> {
        let post = self.get_mut(post_id)?;
        post.toggle_save();
        tracing::debug!(post_id, is_saved = post.is_saved, "Toggled save");
        Some(&*post)
    }

    /// Appends a comment written by the local user.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `text` is empty or whitespace-only
    /// - `NotFound` if no post has `post_id`
    ///
    /// The post is left untouched in both cases.
    pub fn add_comment(&mut self, post_id: &str, text: &str) -> Result<&Comment> {
        self.add_comment_as(post_id, text, DEFAULT_AUTHOR_ALIAS)
    }

    /// Appends a comment under the given alias.
    pub fn add_comment_as(
        &mut self,
        post_id: &str,
        text: &str,
        author_alias: &str,
    ) -> Result<&Comment> {
        if text.trim().is_empty() {
            return Err(TreeholeError::invalid_input("comment text must not be blank"));
        }

        let post = self
            .get_mut(post_id)
            .ok_or_else(|| TreeholeError::not_found("post", post_id))?;
        post.comments.push(Comment::new(text, author_alias));
        tracing::debug!(post_id, comments = post.comments.len(), "Added comment");

        // Just pushed, so the sequence is non-empty
        post.comments
            .last()
            .ok_or_else(|| TreeholeError::internal("comment vanished after push"))
    }

    /// Validates a new post and records it as pending.
    ///
    /// Nothing is inserted into the feed yet; the returned handle carries the
    /// id the post will have once [`finalize_post`](Self::finalize_post) runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `content` is empty after trimming. The store
    /// is not modified in that case.
    pub fn begin_post(&mut self, content: &str, mood: Mood) -> Result<PendingPost> {
        if content.trim().is_empty() {
            return Err(TreeholeError::invalid_input("post content must not be blank"));
        }

        let id = Uuid::new_v4().to_string();
        self.pending.insert(id.clone());
        tracing::debug!(post_id = %id, %mood, pending = self.pending.len(), "Began post");

        Ok(PendingPost {
            id,
            content: content.to_string(),
            mood,
        })
    }

    /// Inserts a pending post at the head of the feed with its echo attached.
    ///
    /// The creation timestamp is taken now, clamped so it never precedes the
    /// current head; this keeps the feed reverse-chronological even when the
    /// clock steps backwards.
    pub fn finalize_post(&mut self, pending: PendingPost, echo_reply: impl Into<String>) -> &Post {
        self.pending.remove(&pending.id);

        let now = Utc::now();
        let created_at = match self.posts.first() {
            Some(head) if head.created_at > now => head.created_at,
            _ => now,
        };

        let post = Post::new(pending.id, pending.content, pending.mood, created_at)
            .with_echo_reply(echo_reply);
        tracing::info!(post_id = %post.id, mood = %post.mood, "Post added to feed");

        self.posts.insert(0, post);
        &self.posts[0]
    }

    /// Releases a pending submission without inserting anything.
    ///
    /// Returns `false` if `post_id` was not pending (already finalized or
    /// never begun).
    pub fn abandon_post(&mut self, post_id: &str) -> bool {
        let removed = self.pending.remove(post_id);
        if removed {
            tracing::debug!(post_id, "Abandoned pending post");
        }
        removed
    }

    /// True while any submission is waiting for its echo.
    pub fn is_submitting(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Projects the feed for a tab, preserving feed order.
    pub fn filtered_view(&self, tab: Tab) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| !tab.shows_saved_only() || p.is_saved)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded() -> FeedStore {
        FeedStore::seeded(Utc::now())
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = FeedStore::new();
        assert!(store.is_empty());
        assert!(!store.is_submitting());
        assert!(store.filtered_view(Tab::Home).is_empty());
    }

    #[test]
    fn test_with_posts_sorts_newest_first() {
        let now = Utc::now();
        let old = Post::new("old", "a", Mood::Neutral, now - Duration::days(2));
        let new = Post::new("new", "b", Mood::Neutral, now);
        let store = FeedStore::with_posts(vec![old, new]);

        assert_eq!(store.posts()[0].id, "new");
        assert_eq!(store.posts()[1].id, "old");
    }

    #[test]
    fn test_toggle_like_twice_restores_count() {
        let mut store = seeded();
        let before = store.get("1").unwrap().likes;

        let liked = store.toggle_like("1").unwrap();
        assert!(liked.is_liked);
        assert_eq!(liked.likes, before + 1);

        let unliked = store.toggle_like("1").unwrap();
        assert!(!unliked.is_liked);
        assert_eq!(unliked.likes, before);
    }

    #[test]
    fn test_unlike_seeded_liked_post() {
        let mut store = seeded();
        let post = store.toggle_like("2").unwrap();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 127);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut store = seeded();
        let snapshot = store.posts().to_vec();

        assert!(store.toggle_like("missing").is_none());
        assert!(store.toggle_save("missing").is_none());
        assert_eq!(store.posts(), snapshot.as_slice());
    }

    #[test]
    fn test_toggle_save_twice_only_touches_flag() {
        let mut store = seeded();
        let original = store.get("3").unwrap().clone();

        let saved = store.toggle_save("3").unwrap().clone();
        assert!(saved.is_saved);
        assert_eq!(
            Post {
                is_saved: original.is_saved,
                ..saved
            },
            original
        );

        store.toggle_save("3");
        assert_eq!(store.get("3").unwrap(), &original);
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let mut store = seeded();

        let first = store.add_comment("1", "hang in there").unwrap().id.clone();
        let second = store.add_comment_as("1", "same here", "路过的猫").unwrap().id.clone();

        let comments = &store.get("1").unwrap().comments;
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].id, "c1");
        assert_eq!(comments[1].id, first);
        assert_eq!(comments[1].author_alias, DEFAULT_AUTHOR_ALIAS);
        assert_eq!(comments[2].id, second);
        assert_eq!(comments[2].author_alias, "路过的猫");
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let mut store = seeded();

        for text in ["", "   ", "\n\t"] {
            let err = store.add_comment("3", text).unwrap_err();
            assert!(err.is_invalid_input());
        }
        assert!(store.get("3").unwrap().comments.is_empty());
    }

    #[test]
    fn test_comment_on_unknown_post() {
        let mut store = seeded();
        let err = store.add_comment("missing", "hello").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_blank_post_leaves_feed_unchanged() {
        let mut store = seeded();
        let snapshot = store.posts().to_vec();

        let err = store.begin_post("  \n ", Mood::Sad).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!store.is_submitting());
        assert_eq!(store.posts(), snapshot.as_slice());
    }

    #[test]
    fn test_begin_then_finalize_prepends_post() {
        let mut store = seeded();

        let pending = store.begin_post("X", Mood::Happy).unwrap();
        let id = pending.id().to_string();
        assert!(store.is_submitting());
        assert_eq!(store.len(), 3);

        let post = store.finalize_post(pending, "a gentle echo");
        assert_eq!(post.id, id);
        assert_eq!(post.content, "X");
        assert_eq!(post.mood, Mood::Happy);
        assert_eq!(post.likes, 0);
        assert!(!post.is_liked);
        assert!(!post.is_saved);
        assert!(post.comments.is_empty());
        assert_eq!(post.echo_reply.as_deref(), Some("a gentle echo"));

        assert!(!store.is_submitting());
        assert_eq!(store.len(), 4);
        assert_eq!(store.posts()[0].id, id);
    }

    #[test]
    fn test_finalized_post_never_precedes_head() {
        let future = Utc::now() + Duration::hours(1);
        let mut store =
            FeedStore::with_posts(vec![Post::new("f", "from the future", Mood::Neutral, future)]);

        let pending = store.begin_post("now", Mood::Neutral).unwrap();
        let post = store.finalize_post(pending, "echo");
        assert!(post.created_at >= future);
    }

    #[test]
    fn test_abandon_clears_pending() {
        let mut store = seeded();
        let pending = store.begin_post("never mind", Mood::Angry).unwrap();
        assert_eq!(store.pending_count(), 1);

        assert!(store.abandon_post(pending.id()));
        assert!(!store.is_submitting());
        assert_eq!(store.len(), 3);
        assert!(!store.abandon_post(pending.id()));
    }

    #[test]
    fn test_concurrent_pending_posts_insert_in_resolution_order() {
        let mut store = FeedStore::new();
        let first = store.begin_post("first", Mood::Sad).unwrap();
        let second = store.begin_post("second", Mood::Happy).unwrap();
        assert_eq!(store.pending_count(), 2);

        store.finalize_post(second, "echo 2");
        assert!(store.is_submitting());
        store.finalize_post(first, "echo 1");

        let contents: Vec<&str> = store.posts().iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(!store.is_submitting());
    }

    #[test]
    fn test_saved_view_is_ordered_subset() {
        let mut store = seeded();
        store.toggle_save("3");

        let saved: Vec<&str> = store
            .filtered_view(Tab::Saved)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(saved, vec!["2", "3"]);

        assert_eq!(store.filtered_view(Tab::Home).len(), 3);
        assert_eq!(store.filtered_view(Tab::Profile).len(), 3);
    }
}
