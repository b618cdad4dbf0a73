//! Post domain module.
//!
//! This module contains the journal entry models and the fixed mood palette.
//!
//! # Module Structure
//!
//! - `model`: Core post domain models (`Post`, `Comment`)
//! - `mood`: Mood tags and their presentation metadata (`Mood`)
//!
//! # Usage
//!
//! ```ignore
//! use treehole_core::post::{Comment, Mood, Post};
//! ```

mod model;
mod mood;

// Re-export public API
pub use model::{Comment, DEFAULT_AUTHOR_ALIAS, Post};
pub use mood::Mood;
