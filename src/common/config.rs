//! Suite configuration
//!
//! Everything comes from the command line and a few well-known environment
//! variables; there is no configuration file.

use std::path::Path;
use std::time::Duration;

/// Marker file present inside the CI containers
const DOCKER_MARKER: &str = "/.docker";

/// Full configuration for one suite run
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Root URL of the Rocket.Chat instance, e.g. `http://127.0.0.1:8006`
    pub server_url: String,

    /// Admin account used for login and the REST API
    pub admin_username: String,
    pub admin_password: String,

    /// Rooms that must survive cleanup, next to `general` and the
    /// server-declared defaults
    pub expected_rooms: Vec<String>,

    /// Account name of the bot under test
    pub bot_name: String,

    /// How many pugs an unsized `pug bomb` delivers
    pub pugs_limit: usize,

    /// Disposable account the suites create and remove
    pub test_user: TestUser,

    /// Browser session settings
    pub browser: BrowserConfig,
}

impl TestConfig {
    pub fn new(server_url: String, admin_username: String, admin_password: String) -> Self {
        Self {
            server_url,
            admin_username,
            admin_password,
            expected_rooms: Vec::new(),
            bot_name: env_string("BOT_NAME", default_bot_name),
            pugs_limit: env_usize("PUGS_LIMIT", default_pugs_limit()),
            test_user: TestUser::default(),
            browser: BrowserConfig::default(),
        }
    }

    /// Parse the `--rooms` argument (comma-separated channel names)
    pub fn set_expected_rooms(&mut self, rooms: &str) {
        self.expected_rooms = rooms
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
}

/// The throwaway account used by suites that need a second, unprivileged user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            username: "noname".to_string(),
            full_name: "No Name".to_string(),
            email: "noname@nodomain.com".to_string(),
            password: "pass".to_string(),
        }
    }
}

/// Browser session settings
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Connect to this WebDriver server instead of spawning chromedriver
    pub webdriver_url: Option<String>,

    /// Port a spawned chromedriver listens on
    pub chromedriver_port: u16,

    /// Browser window size
    pub window_width: u32,
    pub window_height: u32,

    pub page_load_timeout: Duration,

    /// Implicit element-lookup timeout applied to the whole session
    pub implicit_wait: Duration,

    pub headless: bool,

    pub xvfb: XvfbConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: None,
            chromedriver_port: default_chromedriver_port(),
            window_width: 1920,
            window_height: 1080,
            page_load_timeout: Duration::from_secs(30),
            implicit_wait: Duration::from_secs(30),
            headless: false,
            xvfb: XvfbConfig::from_env(),
        }
    }
}

/// Virtual display settings for headless hosts
#[derive(Debug, Clone)]
pub struct XvfbConfig {
    pub enabled: bool,
    pub display: u32,
    pub width: u32,
    pub height: u32,
}

impl XvfbConfig {
    /// Enabled automatically inside the CI containers, where no real
    /// display exists; geometry comes from `XVFB_WIDTH`/`XVFB_HEIGHT`.
    pub fn from_env() -> Self {
        Self {
            enabled: Path::new(DOCKER_MARKER).exists(),
            display: 99,
            width: env_u32("XVFB_WIDTH", 1920),
            height: env_u32("XVFB_HEIGHT", 1080),
        }
    }
}

fn default_bot_name() -> String {
    "meeseeks".to_string()
}

fn default_pugs_limit() -> usize {
    5
}

fn default_chromedriver_port() -> u16 {
    4444
}

fn env_string(name: &str, default: fn() -> String) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_rooms_parsing() {
        let mut config = TestConfig::new(
            "http://127.0.0.1:8006".to_string(),
            "admin".to_string(),
            "secret".to_string(),
        );
        config.set_expected_rooms("hr, leave-coordination,,news ");
        assert_eq!(config.expected_rooms, ["hr", "leave-coordination", "news"]);
    }

    #[test]
    fn test_env_numbers_fall_back_on_garbage() {
        std::env::set_var("CHATOPS_E2E_TEST_WIDTH", "not-a-number");
        assert_eq!(env_u32("CHATOPS_E2E_TEST_WIDTH", 800), 800);
        std::env::remove_var("CHATOPS_E2E_TEST_WIDTH");
        assert_eq!(env_u32("CHATOPS_E2E_TEST_WIDTH", 800), 800);
    }

    #[test]
    fn test_default_test_user() {
        let user = TestUser::default();
        assert_eq!(user.username, "noname");
        assert_eq!(user.email, "noname@nodomain.com");
    }
}
