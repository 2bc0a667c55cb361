use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{HubId, PersonName, UserEmail};
use crate::domain::user::UserRole;
use crate::forms::{FormError, parse_optional};

#[derive(Debug, Deserialize, Validate)]
/// Self-registration request.
pub struct RegisterForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub role: Option<String>,
    pub hub_id: i32,
}

pub struct RegisterPayload {
    pub hub_id: HubId,
    pub email: UserEmail,
    pub password: String,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Requested role; `None` means the default.
    pub role: Option<UserRole>,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            hub_id: HubId::new(form.hub_id)?,
            email: UserEmail::new(form.email)?,
            password: form.password,
            first_name: PersonName::new(form.first_name)?,
            last_name: PersonName::new(form.last_name)?,
            role: parse_optional(form.role.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenForm {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}
