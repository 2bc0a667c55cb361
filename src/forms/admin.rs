use serde::Deserialize;
use validator::Validate;

use crate::domain::notification::NotificationType;
use crate::domain::types::{CandidateId, HubId, PersonName, PhoneNumber, UserEmail, UserId};
use crate::domain::user::{NewProfile, UserRole};
use crate::forms::{
    DEFAULT_PAGE_SIZE, FormError, non_blank, non_blank_owned, page_of, parse_date, parse_optional,
};
use crate::repository::{AuditLogListQuery, NotificationListQuery, UserListQuery};

pub const AUDIT_LOG_PAGE_SIZE: usize = 50;
pub const NOTIFICATION_PAGE_SIZE: usize = 20;

/// Query string of `GET /api/admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl UserListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<UserListQuery, FormError> {
        let mut query =
            UserListQuery::new(hub_id).paginate(page_of(self.page, self.limit, DEFAULT_PAGE_SIZE));
        if let Some(role) = parse_optional::<UserRole>(self.role.as_deref())? {
            query = query.role(role);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

pub struct CreateUserPayload {
    pub email: UserEmail,
    pub password: String,
    pub role: UserRole,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub profile: NewProfile,
}

impl TryFrom<CreateUserForm> for CreateUserPayload {
    type Error = FormError;

    fn try_from(form: CreateUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: UserEmail::new(form.email)?,
            password: form.password,
            role: form.role.trim().parse()?,
            first_name: PersonName::new(form.first_name)?,
            last_name: PersonName::new(form.last_name)?,
            profile: NewProfile {
                phone: non_blank_owned(form.phone)
                    .map(PhoneNumber::new)
                    .transpose()?,
                avatar: non_blank_owned(form.avatar),
                skills: Vec::new(),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleForm {
    pub role: String,
}

impl TryFrom<UpdateRoleForm> for UserRole {
    type Error = FormError;

    fn try_from(form: UpdateRoleForm) -> Result<Self, Self::Error> {
        Ok(form.role.trim().parse()?)
    }
}

/// Query string of `GET /api/admin/audit-logs`.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub resource: Option<String>,
    pub user_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl AuditLogParams {
    pub fn into_query(self, hub_id: HubId) -> Result<AuditLogListQuery, FormError> {
        let mut query = AuditLogListQuery::new(hub_id)
            .paginate(page_of(self.page, self.limit, AUDIT_LOG_PAGE_SIZE));
        if let Some(resource) = non_blank(self.resource.as_deref()) {
            query = query.resource(resource);
        }
        if let Some(user_id) = self.user_id {
            query = query.user(UserId::new(user_id)?);
        }
        let start = non_blank(self.start_date.as_deref())
            .map(parse_date)
            .transpose()?;
        let end = non_blank(self.end_date.as_deref())
            .map(parse_date)
            .transpose()?;
        Ok(query.between(start, end))
    }
}

/// Query string of `GET /api/admin/notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationParams {
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub read: Option<bool>,
    pub user_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl NotificationParams {
    /// Builds the query. An unrecognized `type` is dropped rather than rejected.
    pub fn into_query(self, hub_id: HubId) -> Result<NotificationListQuery, FormError> {
        let mut query = NotificationListQuery::new(hub_id)
            .paginate(page_of(self.page, self.limit, NOTIFICATION_PAGE_SIZE));
        if let Some(notification_type) = non_blank(self.notification_type.as_deref())
            .and_then(|raw| raw.parse::<NotificationType>().ok())
        {
            query = query.notification_type(notification_type);
        }
        if let Some(read) = self.read {
            query = query.read(read);
        }
        if let Some(user_id) = self.user_id {
            query = query.user(UserId::new(user_id)?);
        }
        if let Some(candidate_id) = self.candidate_id {
            query = query.candidate(CandidateId::new(candidate_id)?);
        }
        Ok(query)
    }
}
