//! Rocket.Chat REST API v1

pub mod client;
pub mod types;

pub use client::ApiClient;
