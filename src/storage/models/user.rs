use serde::{Deserialize, Serialize};

/// A registered account. The password field holds the stored credential
/// (a bcrypt hash) and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}
