//! Users of the platform: recruiters, hiring managers, admins and candidates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    HubId, PersonName, PhoneNumber, ProfileId, UserEmail, UserId, text_enum,
};

text_enum! {
    /// Access level of a user account.
    UserRole {
        Candidate => "CANDIDATE",
        HrEmployee => "HR_EMPLOYEE",
        HiringManager => "HIRING_MANAGER",
        RecruitmentAdmin => "RECRUITMENT_ADMIN",
    }
}

/// Roles allowed to manage jobs, candidates, applications and forms.
pub const HR_ROLES: &[UserRole] = &[UserRole::HrEmployee, UserRole::RecruitmentAdmin];

/// Roles taking part in interviews and candidate evaluation.
pub const HIRING_TEAM_ROLES: &[UserRole] = &[
    UserRole::HiringManager,
    UserRole::HrEmployee,
    UserRole::RecruitmentAdmin,
];

/// Roles with access to the admin section.
pub const ADMIN_ROLES: &[UserRole] = &[UserRole::RecruitmentAdmin];

/// Roles a visitor may pick when self-registering. Staff accounts are
/// created by a RECRUITMENT_ADMIN of the hub.
pub const SELF_REGISTRATION_ROLES: &[UserRole] = &[UserRole::Candidate];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub hub_id: HubId,
    pub email: UserEmail,
    pub role: UserRole,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub is_active: bool,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Display name used in interview and note summaries.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User record together with the stored password material.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
    pub password_salt: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub hub_id: HubId,
    pub email: UserEmail,
    pub password_hash: String,
    pub password_salt: String,
    pub role: UserRole,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

impl NewUser {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        email: UserEmail,
        (password_hash, password_salt): (String, String),
        role: UserRole,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            hub_id,
            email,
            password_hash,
            password_salt,
            role,
            first_name,
            last_name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub phone: Option<PhoneNumber>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Profile data created alongside a user.
#[derive(Clone, Debug, Default)]
pub struct NewProfile {
    pub phone: Option<PhoneNumber>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
}

/// User as exposed by the API, with the profile when one exists.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_round_trip_through_str() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("SUPERUSER".parse::<UserRole>().is_err());
    }

    #[test]
    fn role_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&UserRole::RecruitmentAdmin).unwrap();
        assert_eq!(json, "\"RECRUITMENT_ADMIN\"");
        let role: UserRole = serde_json::from_str("\"HIRING_MANAGER\"").unwrap();
        assert_eq!(role, UserRole::HiringManager);
    }
}
