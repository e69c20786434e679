//! Driving the Rocket.Chat web application
//!
//! `ChatContext` bundles the live browser session with the REST client so a
//! scheduled case can click through the UI and verify the outcome out of
//! band. The UI flows live in [`ui`], the admin-panel flows in [`admin`].

pub mod admin;
pub mod ui;

use thirtyfour::prelude::*;

use crate::api::ApiClient;
use crate::browser::BrowserSession;
use crate::common::{Error, Result, TestConfig};

/// Shared context for every suite that talks to a provisioned server
pub struct ChatContext {
    session: BrowserSession,
    api: ApiClient,
    config: TestConfig,
    test_user_id: Option<String>,
}

impl ChatContext {
    pub fn new(session: BrowserSession, api: ApiClient, config: TestConfig) -> Self {
        Self {
            session,
            api,
            config,
            test_user_id: None,
        }
    }

    pub fn driver(&self) -> &WebDriver {
        self.session.driver()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn bot_name(&self) -> &str {
        &self.config.bot_name
    }

    pub fn test_username(&self) -> &str {
        &self.config.test_user.username
    }

    /// Register the disposable test account and remember its id
    pub async fn create_test_user(&mut self) -> Result<()> {
        let user = self.api.register_user(&self.config.test_user).await?;
        self.test_user_id = Some(user.id);
        Ok(())
    }

    /// Delete the test account, looking its id up if registration was
    /// skipped or happened through the UI
    pub async fn remove_test_user(&mut self) -> Result<()> {
        let user_id = match self.test_user_id.take() {
            Some(id) => id,
            None => self
                .api
                .find_user_id(&self.config.test_user.username)
                .await?
                .ok_or_else(|| {
                    Error::assertion(format!(
                        "user '{}' is not registered",
                        self.config.test_user.username
                    ))
                })?,
        };
        self.api.delete_user(&user_id).await?;
        Ok(())
    }

    /// Quit the browser session; the spawned processes stop with it
    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }
}
