use serde::Serialize;

use crate::domain::user::UserWithProfile;

pub const TOKEN_TYPE: &str = "Bearer";

/// Issued on registration and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserWithProfile,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}
