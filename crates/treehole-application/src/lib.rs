//! Application services for Tree Hole.
//!
//! - [`EchoGenerator`]: turns a post into a gentle echo, never failing
//! - [`TreeHole`]: the shared feed plus the asynchronous post authoring flow

pub mod echo_generator;
pub mod tree_hole;

pub use echo_generator::EchoGenerator;
pub use tree_hole::{PendingPostHandle, TreeHole};
