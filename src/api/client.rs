//! Rocket.Chat REST API client
//!
//! The suites use the API for out-of-band setup, verification and cleanup,
//! so the browser only ever exercises what a person would actually see.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::common::{Error, Result, TestUser};

use super::types::{
    ChannelsListResponse, GroupsListResponse, LoginResponse, RegisterResponse, RoomInfo,
    RoomsGetResponse, UserInfo, UsersListResponse,
};

/// Authenticated client for one Rocket.Chat installation
pub struct ApiClient {
    http: Client,
    base_url: String,
    user_id: String,
    auth_token: String,
}

impl ApiClient {
    /// Log in and keep the token pair for every subsequent call
    pub async fn connect(server_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = server_url.trim_end_matches('/').to_string();
        let http = Client::new();

        let response = http
            .post(format!("{}/api/v1/login", base_url))
            .json(&json!({ "user": username, "password": password }))
            .send()
            .await?;
        let body: Value = response.json().await?;

        let login: LoginResponse =
            serde_json::from_value(body.clone()).map_err(|_| Error::ApiLoginFailed {
                username: username.to_string(),
                message: error_message(&body),
            })?;
        if login.status != "success" {
            return Err(Error::ApiLoginFailed {
                username: username.to_string(),
                message: error_message(&body),
            });
        }

        debug!("API login succeeded for '{}'", username);
        Ok(Self {
            http,
            base_url,
            user_id: login.data.user_id,
            auth_token: login.data.auth_token,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &str) -> Result<Value> {
        let response = self
            .http
            .get(self.url(endpoint))
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .send()
            .await?;
        let http_ok = response.status().is_success();
        check_envelope(endpoint, http_ok, response.json().await?)
    }

    async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value> {
        let response = self
            .http
            .post(self.url(endpoint))
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .json(payload)
            .send()
            .await?;
        let http_ok = response.status().is_success();
        check_envelope(endpoint, http_ok, response.json().await?)
    }

    // === Users ===

    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let body = self.get("users.list").await?;
        let parsed: UsersListResponse = serde_json::from_value(body)?;
        Ok(parsed.users)
    }

    /// Register the disposable account the suites log in with
    pub async fn register_user(&self, user: &TestUser) -> Result<UserInfo> {
        let body = self
            .post(
                "users.register",
                &json!({
                    "username": user.username,
                    "name": user.full_name,
                    "email": user.email,
                    "pass": user.password,
                }),
            )
            .await?;
        let parsed: RegisterResponse = serde_json::from_value(body)?;
        Ok(parsed.user)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.post("users.delete", &json!({ "userId": user_id }))
            .await?;
        Ok(())
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(self
            .list_users()
            .await?
            .iter()
            .any(|user| user.username.as_deref() == Some(username)))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self
            .list_users()
            .await?
            .iter()
            .any(|user| user.emails.iter().any(|entry| entry.address == email)))
    }

    pub async fn find_user_id(&self, username: &str) -> Result<Option<String>> {
        Ok(self
            .list_users()
            .await?
            .into_iter()
            .find(|user| user.username.as_deref() == Some(username))
            .map(|user| user.id))
    }

    /// Remove every account carrying the plain `user` role
    ///
    /// Admin and bot accounts carry other roles and survive.
    pub async fn delete_extra_users(&self) -> Result<()> {
        for user in self.list_users().await? {
            if user.roles.iter().any(|role| role == "user") {
                debug!("removing extra user {:?}", user.username);
                self.delete_user(&user.id).await?;
            }
        }
        Ok(())
    }

    // === Rooms ===

    pub async fn list_channels(&self) -> Result<Vec<RoomInfo>> {
        let body = self.get("channels.list").await?;
        let parsed: ChannelsListResponse = serde_json::from_value(body)?;
        Ok(parsed.channels)
    }

    pub async fn list_groups(&self) -> Result<Vec<RoomInfo>> {
        let body = self.get("groups.listAll").await?;
        let parsed: GroupsListResponse = serde_json::from_value(body)?;
        Ok(parsed.groups)
    }

    /// Create a private group with the given members invited
    pub async fn create_group(&self, name: &str, members: &[&str]) -> Result<()> {
        self.post("groups.create", &json!({ "name": name, "members": members }))
            .await?;
        Ok(())
    }

    pub async fn delete_channel(&self, name: &str) -> Result<()> {
        self.post("channels.delete", &json!({ "roomName": name }))
            .await?;
        Ok(())
    }

    pub async fn delete_group(&self, name: &str) -> Result<()> {
        self.post("groups.delete", &json!({ "roomName": name }))
            .await?;
        Ok(())
    }

    /// Whether a room whose name contains `name` shows up in `rooms.get`
    pub async fn room_exists(&self, name: &str) -> Result<bool> {
        let body = self.get("rooms.get").await?;
        let parsed: RoomsGetResponse = serde_json::from_value(body)?;
        Ok(parsed
            .update
            .iter()
            .any(|room| room.name.as_deref().is_some_and(|n| n.contains(name))))
    }

    /// Remove private groups and channels outside the protected set
    ///
    /// `general` and the other server defaults survive through their
    /// `default` flag; the flag is ignored for groups.
    pub async fn delete_extra_rooms(&self, keep: &[String]) -> Result<()> {
        for group in self.list_groups().await? {
            if survives_cleanup(&group, keep, false) {
                continue;
            }
            if let Some(name) = &group.name {
                debug!("removing extra group '{}'", name);
                self.delete_group(name).await?;
            }
        }
        for channel in self.list_channels().await? {
            if survives_cleanup(&channel, keep, true) {
                continue;
            }
            if let Some(name) = &channel.name {
                debug!("removing extra channel '{}'", name);
                self.delete_channel(name).await?;
            }
        }
        Ok(())
    }
}

fn survives_cleanup(room: &RoomInfo, keep: &[String], spare_defaults: bool) -> bool {
    let Some(name) = room.name.as_deref() else {
        return true;
    };
    (spare_defaults && room.is_default) || keep.iter().any(|kept| kept == name)
}

/// Reject bodies the server itself flags as failed
fn check_envelope(endpoint: &str, http_ok: bool, body: Value) -> Result<Value> {
    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(http_ok);
    if http_ok && success {
        Ok(body)
    } else {
        Err(Error::api_request_failed(endpoint, &error_message(&body)))
    }
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_success() {
        let body = json!({ "success": true, "users": [] });
        assert!(check_envelope("users.list", true, body).is_ok());
    }

    #[test]
    fn test_envelope_rejects_server_side_failure() {
        let body = json!({ "success": false, "error": "User not found" });
        let err = check_envelope("users.delete", true, body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "API request 'users.delete' failed: User not found"
        );
    }

    #[test]
    fn test_envelope_rejects_http_failure_without_success_field() {
        let body = json!({ "message": "Unauthorized" });
        let err = check_envelope("rooms.get", false, body).unwrap_err();
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_cleanup_spares_kept_and_default_rooms() {
        let keep = vec!["leave-coordination".to_string()];
        let general = RoomInfo {
            id: "GENERAL".to_string(),
            name: Some("general".to_string()),
            is_default: true,
        };
        let listed = RoomInfo {
            id: "r1".to_string(),
            name: Some("leave-coordination".to_string()),
            is_default: false,
        };
        let extra = RoomInfo {
            id: "r2".to_string(),
            name: Some("test-channel".to_string()),
            is_default: false,
        };

        assert!(survives_cleanup(&general, &keep, true));
        assert!(survives_cleanup(&listed, &keep, true));
        assert!(!survives_cleanup(&extra, &keep, true));

        // the default flag only shields channels
        assert!(!survives_cleanup(&general, &keep, false));
        assert!(survives_cleanup(&listed, &keep, false));
    }
}
