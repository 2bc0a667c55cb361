//! Password hashing, token issuing and the bearer-token extractor.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pbkdf2::pbkdf2_hmac;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::User;
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const REFRESH_TOKEN_LEN: usize = 32;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const WEAK_PASSWORD_MESSAGE: &str = "Password must be at least 8 characters long and contain uppercase, lowercase, number and special character";

/// Hashes a password with PBKDF2-HMAC-SHA256 and a fresh salt. Returns `(hash_hex, salt_hex)`.
pub fn hash_password(password: &str) -> ServiceResult<(String, String)> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt).map_err(|e| {
        log::error!("Failed to generate password salt: {e}");
        ServiceError::Internal
    })?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    Ok((hex::encode(hash), hex::encode(salt)))
}

/// Checks `password` against stored hex-encoded hash and salt.
pub fn verify_password(password: &str, hash_hex: &str, salt_hex: &str) -> bool {
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    // constant time
    hash.len() == expected.len()
        && hash
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// At least eight characters with an upper-case letter, a lower-case letter,
/// a digit and a special character.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

pub fn ensure_strong_password(password: &str) -> ServiceResult<()> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(ServiceError::Validation(WEAK_PASSWORD_MESSAGE.to_string()))
    }
}

/// Opaque refresh token handed to the client. Only its hash is stored.
pub fn generate_refresh_token() -> ServiceResult<String> {
    let mut bytes = [0u8; REFRESH_TOKEN_LEN];
    getrandom::getrandom(&mut bytes).map_err(|e| {
        log::error!("Failed to generate refresh token: {e}");
        ServiceError::Internal
    })?;
    Ok(hex::encode(bytes))
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// `now + ttl`, or an internal error when the lifetime is out of range.
pub fn expiry_after(now: DateTime<Utc>, ttl: Option<Duration>) -> ServiceResult<DateTime<Utc>> {
    ttl.and_then(|ttl| now.checked_add_signed(ttl)).ok_or_else(|| {
        log::error!("Token lifetime is out of range");
        ServiceError::Internal
    })
}

/// Signs an HS256 access token for `user` valid for `ttl_minutes` from `now`.
pub fn issue_access_token(
    user: &User,
    secret: &str,
    ttl_minutes: i64,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    let issued_at = now.timestamp().max(0) as usize;
    let expires_at = expiry_after(now, Duration::try_minutes(ttl_minutes))?
        .timestamp()
        .max(0) as usize;
    let claims = AuthenticatedUser::for_user(user, issued_at, expires_at);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign access token: {e}");
        ServiceError::Internal
    })
}

pub fn decode_access_token(token: &str, secret: &str) -> ServiceResult<AuthenticatedUser> {
    decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| ServiceError::Unauthorized(format!("Invalid or expired token: {e}")))
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({ "error": message })),
    )
    .into()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("Server configuration is not registered as app data");
        return Err(InternalError::from_response(
            "missing configuration",
            HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" })),
        )
        .into());
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Access token required"))?;

    decode_access_token(token, &config.secret).map_err(|e| {
        log::warn!("Rejected access token for {}: {e}", req.path());
        unauthorized("Invalid or expired token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
