//! Diesel models for users, profiles and refresh tokens.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::auth::{NewRefreshToken as DomainNewRefreshToken, RefreshToken as DomainRefreshToken};
use crate::domain::types::{
    HubId, PersonName, PhoneNumber, ProfileId, RefreshTokenId, TypeConstraintError, UserEmail,
    UserId,
};
use crate::domain::user::{
    NewProfile as DomainNewProfile, NewUser as DomainNewUser, Profile as DomainProfile,
    User as DomainUser, UserCredentials, UserRole,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub password_salt: &'a str,
    pub role: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(belongs_to(User, foreign_key = user_id))]
/// Diesel model for [`crate::domain::user::Profile`].
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub skills: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile<'a> {
    pub user_id: i32,
    pub phone: Option<&'a str>,
    pub avatar: Option<&'a str>,
    pub skills: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::refresh_tokens)]
pub struct RefreshToken {
    pub id: i32,
    pub user_id: i32,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub revoked: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::refresh_tokens)]
pub struct NewRefreshToken<'a> {
    pub user_id: i32,
    pub token_hash: &'a str,
    pub expires_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::try_from(user.id)?,
            hub_id: HubId::try_from(user.hub_id)?,
            email: UserEmail::new(user.email)?,
            role: user.role.parse::<UserRole>()?,
            first_name: PersonName::new(user.first_name)?,
            last_name: PersonName::new(user.last_name)?,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl TryFrom<User> for UserCredentials {
    type Error = TypeConstraintError;

    fn try_from(mut user: User) -> Result<Self, Self::Error> {
        let password_hash = std::mem::take(&mut user.password_hash);
        let password_salt = std::mem::take(&mut user.password_salt);
        Ok(Self {
            user: DomainUser::try_from(user)?,
            password_hash,
            password_salt,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            hub_id: user.hub_id.get(),
            email: user.email.as_str(),
            password_hash: &user.password_hash,
            password_salt: &user.password_salt,
            role: user.role.as_str(),
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
        }
    }
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        let skills: Vec<String> = serde_json::from_str(&profile.skills)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("skills: {e}")))?;
        Ok(Self {
            id: ProfileId::try_from(profile.id)?,
            user_id: UserId::try_from(profile.user_id)?,
            phone: profile.phone.map(PhoneNumber::new).transpose()?,
            avatar: profile.avatar,
            skills,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}

impl<'a> NewProfile<'a> {
    pub fn from_domain(user_id: UserId, profile: &'a DomainNewProfile) -> Self {
        Self {
            user_id: user_id.get(),
            phone: profile.phone.as_ref().map(PhoneNumber::as_str),
            avatar: profile.avatar.as_deref(),
            skills: serde_json::Value::from(profile.skills.clone()).to_string(),
        }
    }
}

impl TryFrom<RefreshToken> for DomainRefreshToken {
    type Error = TypeConstraintError;

    fn try_from(token: RefreshToken) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RefreshTokenId::try_from(token.id)?,
            user_id: UserId::try_from(token.user_id)?,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            revoked: token.revoked,
            created_at: token.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewRefreshToken> for NewRefreshToken<'a> {
    fn from(token: &'a DomainNewRefreshToken) -> Self {
        Self {
            user_id: token.user_id.get(),
            token_hash: &token.token_hash,
            expires_at: token.expires_at,
        }
    }
}
