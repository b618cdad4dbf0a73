//! Post domain model.
//!
//! Posts and comments are plain data. All mutation goes through
//! [`FeedStore`](crate::feed::FeedStore), which upholds the feed invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mood::Mood;

/// Alias recorded on comments written by the local user.
pub const DEFAULT_AUTHOR_ALIAS: &str = "我";

/// A single reply under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Free-text label, not bound to any identity.
    pub author_alias: String,
}

impl Comment {
    /// Creates a comment with a fresh id, stamped now.
    pub fn new(content: impl Into<String>, author_alias: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            created_at: Utc::now(),
            author_alias: author_alias.into(),
        }
    }
}

/// A mood-tagged journal entry in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique within the feed; stable for the post's lifetime.
    pub id: String,
    pub content: String,
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub is_liked: bool,
    pub is_saved: bool,
    /// Append-only; insertion order is display order.
    pub comments: Vec<Comment>,
    /// The gentle reply from the tree hole, once resolved.
    pub echo_reply: Option<String>,
}

impl Post {
    /// Creates a fresh post with no reactions.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        mood: Mood,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            mood,
            created_at,
            likes: 0,
            is_liked: false,
            is_saved: false,
            comments: Vec::new(),
            echo_reply: None,
        }
    }

    pub fn with_echo_reply(mut self, echo_reply: impl Into<String>) -> Self {
        self.echo_reply = Some(echo_reply.into());
        self
    }

    /// Background styling token for this post's card.
    pub fn background_token(&self) -> String {
        self.mood.card_background_token()
    }

    /// Flips the like flag, keeping `likes` in step with it.
    pub(crate) fn toggle_like(&mut self) {
        if self.is_liked {
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.likes = self.likes.saturating_add(1);
        }
        self.is_liked = !self.is_liked;
    }

    pub(crate) fn toggle_save(&mut self) {
        self.is_saved = !self.is_saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_has_no_reactions() {
        let post = Post::new("p1", "hello", Mood::Happy, Utc::now());
        assert_eq!(post.likes, 0);
        assert!(!post.is_liked);
        assert!(!post.is_saved);
        assert!(post.comments.is_empty());
        assert!(post.echo_reply.is_none());
        assert_eq!(post.background_token(), "bg-yellow-50/50");
    }

    #[test]
    fn test_toggle_like_tracks_counter() {
        let mut post = Post::new("p1", "hello", Mood::Sad, Utc::now());
        post.likes = 7;

        post.toggle_like();
        assert!(post.is_liked);
        assert_eq!(post.likes, 8);

        post.toggle_like();
        assert!(!post.is_liked);
        assert_eq!(post.likes, 7);
    }

    #[test]
    fn test_unlike_never_goes_negative() {
        // A liked post with an inconsistent zero counter must not underflow.
        let mut post = Post::new("p1", "hello", Mood::Sad, Utc::now());
        post.is_liked = true;

        post.toggle_like();
        assert_eq!(post.likes, 0);
        assert!(!post.is_liked);
    }

    #[test]
    fn test_comment_ids_are_unique() {
        let a = Comment::new("one", DEFAULT_AUTHOR_ALIAS);
        let b = Comment::new("two", DEFAULT_AUTHOR_ALIAS);
        assert_ne!(a.id, b.id);
        assert_eq!(a.author_alias, "我");
    }
}
