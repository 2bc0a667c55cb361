//! Authentication claims and stored refresh tokens.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{HubId, RefreshTokenId, TypeConstraintError, UserEmail, UserId};
use crate::domain::user::{User, UserRole};

/// Claims carried by an access token and extracted for every authenticated request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// User id as a string, per JWT convention.
    pub sub: String,
    pub hub_id: i32,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Builds claims for `user` valid from `issued_at` until `expires_at` (unix seconds).
    pub fn for_user(user: &User, issued_at: usize, expires_at: usize) -> Self {
        Self {
            sub: user.id.to_string(),
            hub_id: user.hub_id.get(),
            email: user.email.as_str().to_string(),
            role: user.role,
            iat: issued_at,
            exp: expires_at,
        }
    }

    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let raw = self
            .sub
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue("subject is not a user id".into()))?;
        UserId::new(raw)
    }

    pub fn hub_id(&self) -> Result<HubId, TypeConstraintError> {
        HubId::new(self.hub_id)
    }

    pub fn email(&self) -> Result<UserEmail, TypeConstraintError> {
        UserEmail::new(self.email.as_str())
    }

    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub revoked: bool,
    pub created_at: NaiveDateTime,
}

impl RefreshToken {
    /// A token is usable while it is neither revoked nor past its expiry.
    pub fn is_usable(&self, now: NaiveDateTime) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[derive(Clone, Debug)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
}
