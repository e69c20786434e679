//! End-to-end browser tests for Rocket.Chat chatops bots
//!
//! Each suite binary drives a real browser through a shared harness:
//! the `scenarios` modules script the conversations, `chat` wraps the
//! Rocket.Chat UI, `api` covers the REST side and `browser` owns the
//! WebDriver session and the processes behind it.

pub mod api;
pub mod browser;
pub mod chat;
pub mod common;
pub mod harness;
pub mod scenarios;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::Harness;
