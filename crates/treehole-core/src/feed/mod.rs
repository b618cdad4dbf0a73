//! Feed domain module.
//!
//! This module owns the in-memory post collection and the views over it.
//!
//! # Module Structure
//!
//! - `store`: The `FeedStore` state container and pending submissions
//! - `tab`: Navigation tabs selecting a view (`Tab`)
//! - `seed`: The mock posts the feed starts with
//!
//! # Usage
//!
//! ```ignore
//! use treehole_core::feed::{FeedStore, PendingPost, Tab};
//! ```

pub mod seed;
mod store;
mod tab;

// Re-export public API
pub use store::{FeedStore, PendingPost};
pub use tab::Tab;
