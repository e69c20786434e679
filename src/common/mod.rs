//! Common utilities shared by every suite binary

pub mod config;
pub mod error;
pub mod logging;

pub use config::{BrowserConfig, TestConfig, TestUser, XvfbConfig};
pub use error::{ensure, Error, Result};
