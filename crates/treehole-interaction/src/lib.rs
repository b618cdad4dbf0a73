//! External service integrations for Tree Hole.
//!
//! Provides the Gemini REST implementation of [`treehole_core::EchoBackend`]
//! and the credential lookup that decides whether it can be used at all.

pub mod config;
pub mod gemini_echo_backend;

pub use config::{EchoConfig, GeminiConfig};
pub use gemini_echo_backend::GeminiEchoBackend;
