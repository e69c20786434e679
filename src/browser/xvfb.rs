//! Virtual display guard for hosts without a real one

use std::process::{Child, Command, Stdio};

use tracing::info;

use crate::common::{Error, Result, XvfbConfig};

/// Owns a spawned Xvfb server and the DISPLAY it provides
pub struct XvfbGuard {
    process: Child,
    display: String,
}

impl XvfbGuard {
    /// Spawn `Xvfb :N -screen 0 WxHx24`
    pub fn start(config: &XvfbConfig) -> Result<Self> {
        let path = which::which("Xvfb").map_err(|_| Error::XvfbNotFound)?;
        let display_name = format!(":{}", config.display);
        info!(
            "starting Xvfb on {} at {}x{}",
            display_name, config.width, config.height
        );

        let process = Command::new(path)
            .arg(&display_name)
            .args(["-screen", "0"])
            .arg(format!("{}x{}x24", config.width, config.height))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Self {
            process,
            display: display_name,
        })
    }

    /// The DISPLAY value the browser stack must inherit
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl Drop for XvfbGuard {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
