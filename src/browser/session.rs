//! Browser session lifecycle
//!
//! Finds or spawns chromedriver, connects over WebDriver, applies the
//! timeouts and window geometry, and navigates to the chat server. Spawned
//! processes are killed when the session goes away.

use std::net::TcpStream;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use thirtyfour::prelude::*;
use tracing::{debug, info};

use crate::common::{BrowserConfig, Error, Result};

use super::xvfb::XvfbGuard;

const READY_ATTEMPTS: u32 = 50;
const READY_DELAY: Duration = Duration::from_millis(100);

/// Owns a spawned chromedriver process
struct ChromedriverGuard {
    process: Option<Child>,
    port: u16,
}

impl ChromedriverGuard {
    /// Spawn chromedriver unless something already listens on the port
    fn start(port: u16, display: Option<&str>) -> Result<Self> {
        if Self::is_listening(port) {
            debug!("a WebDriver server already listens on port {}", port);
            return Ok(Self {
                process: None,
                port,
            });
        }

        let path = which::which("chromedriver").map_err(|_| Error::ChromedriverNotFound)?;
        info!("starting {} on port {}", path.display(), port);

        let mut command = Command::new(path);
        command
            .arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(display) = display {
            command.env("DISPLAY", display);
        }
        let process = command.spawn()?;

        let guard = Self {
            process: Some(process),
            port,
        };
        guard.wait_for_ready()?;
        Ok(guard)
    }

    fn is_listening(port: u16) -> bool {
        TcpStream::connect(("127.0.0.1", port)).is_ok()
    }

    fn wait_for_ready(&self) -> Result<()> {
        for _ in 0..READY_ATTEMPTS {
            if Self::is_listening(self.port) {
                return Ok(());
            }
            std::thread::sleep(READY_DELAY);
        }
        Err(Error::ChromedriverSpawnTimeout(self.port))
    }
}

impl Drop for ChromedriverGuard {
    fn drop(&mut self) {
        if let Some(ref mut process) = self.process {
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}

/// A connected browser pointed at the chat server
pub struct BrowserSession {
    driver: WebDriver,
    // Held for their Drop impls; chromedriver must die before Xvfb
    _chromedriver: Option<ChromedriverGuard>,
    _xvfb: Option<XvfbGuard>,
}

impl BrowserSession {
    /// Open a browser against `server_url`, spawning the driver stack as needed
    pub async fn open(config: &BrowserConfig, server_url: &str) -> Result<Self> {
        let xvfb = if config.xvfb.enabled {
            println!("Using Xvfb");
            Some(XvfbGuard::start(&config.xvfb)?)
        } else {
            None
        };

        let (webdriver_url, chromedriver) = match &config.webdriver_url {
            Some(url) => (url.clone(), None),
            None => {
                let guard = ChromedriverGuard::start(
                    config.chromedriver_port,
                    xvfb.as_ref().map(XvfbGuard::display),
                )?;
                (
                    format!("http://localhost:{}", config.chromedriver_port),
                    Some(guard),
                )
            }
        };

        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-gpu")?;
        if config.headless {
            caps.add_arg("--headless")?;
        }

        let driver = WebDriver::new(webdriver_url.as_str(), caps).await?;
        driver.set_implicit_wait_timeout(config.implicit_wait).await?;
        driver.set_page_load_timeout(config.page_load_timeout).await?;
        driver
            .set_window_rect(0, 0, config.window_width.into(), config.window_height.into())
            .await?;
        driver.goto(server_url).await?;

        Ok(Self {
            driver,
            _chromedriver: chromedriver,
            _xvfb: xvfb,
        })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Quit the WebDriver session, then stop the spawned processes
    pub async fn close(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
