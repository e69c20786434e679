//! REST API payloads

use serde::Deserialize;

/// Body of `POST /api/v1/login`
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub data: LoginData,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

/// One account as returned by `users.list` and `users.register`
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub emails: Vec<EmailInfo>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailInfo {
    pub address: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct UsersListResponse {
    pub users: Vec<UserInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub user: UserInfo,
}

/// One room as returned by `channels.list`, `groups.listAll` and `rooms.get`
#[derive(Debug, Deserialize)]
pub struct RoomInfo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Set on rooms the server auto-joins everyone into
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsListResponse {
    pub channels: Vec<RoomInfo>,
}

#[derive(Debug, Deserialize)]
pub struct GroupsListResponse {
    pub groups: Vec<RoomInfo>,
}

/// `rooms.get` reports the changed-rooms window under `update`
#[derive(Debug, Deserialize)]
pub struct RoomsGetResponse {
    #[serde(default)]
    pub update: Vec<RoomInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_shape() {
        let body = r#"{
            "status": "success",
            "data": {
                "userId": "aobEdbYhXfu5hkeqG",
                "authToken": "9HqLlyZOugoStsXCUfD_0YdwnNnunAJF8V47U3QHXSq"
            }
        }"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.data.user_id, "aobEdbYhXfu5hkeqG");
    }

    #[test]
    fn test_users_list_tolerates_sparse_accounts() {
        // Bot and system accounts come back without emails or username
        let body = r#"{
            "users": [
                {"_id": "a1", "username": "admin", "roles": ["admin"],
                 "emails": [{"address": "admin@example.com", "verified": true}]},
                {"_id": "b2", "roles": ["bot"]}
            ],
            "count": 2,
            "success": true
        }"#;
        let parsed: UsersListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.users.len(), 2);
        assert_eq!(parsed.users[0].emails[0].address, "admin@example.com");
        assert!(parsed.users[1].username.is_none());
        assert!(parsed.users[1].emails.is_empty());
    }

    #[test]
    fn test_rooms_get_reads_the_update_window() {
        let body = r#"{
            "update": [
                {"_id": "GENERAL", "name": "general", "default": true},
                {"_id": "r2", "name": "leave-coordination"},
                {"_id": "dm1"}
            ],
            "remove": [],
            "success": true
        }"#;
        let parsed: RoomsGetResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.update.len(), 3);
        assert!(parsed.update[0].is_default);
        assert_eq!(parsed.update[1].name.as_deref(), Some("leave-coordination"));
        assert!(parsed.update[2].name.is_none());
    }
}
