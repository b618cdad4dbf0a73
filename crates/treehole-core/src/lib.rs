pub mod echo;
pub mod error;
pub mod feed;
pub mod post;

// Re-export common error type
pub use error::TreeholeError;

pub use echo::{Echo, EchoBackend, EchoSource, PlaceholderReason};
pub use feed::{FeedStore, PendingPost, Tab};
pub use post::{Comment, Mood, Post};
