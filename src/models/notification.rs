//! Diesel models for notifications.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    NewNotification as DomainNewNotification, Notification as DomainNotification,
    NotificationType,
};
use crate::domain::types::{CandidateId, HubId, NotificationId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct Notification {
    pub id: i32,
    pub hub_id: i32,
    pub user_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification<'a> {
    pub hub_id: i32,
    pub user_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub notification_type: &'static str,
    pub title: &'a str,
    pub message: &'a str,
}

impl TryFrom<Notification> for DomainNotification {
    type Error = TypeConstraintError;

    fn try_from(notification: Notification) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NotificationId::try_from(notification.id)?,
            hub_id: HubId::try_from(notification.hub_id)?,
            user_id: notification.user_id.map(UserId::try_from).transpose()?,
            candidate_id: notification
                .candidate_id
                .map(CandidateId::try_from)
                .transpose()?,
            notification_type: notification.notification_type.parse::<NotificationType>()?,
            title: notification.title,
            message: notification.message,
            read: notification.read,
            created_at: notification.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewNotification> for NewNotification<'a> {
    fn from(notification: &'a DomainNewNotification) -> Self {
        Self {
            hub_id: notification.hub_id.get(),
            user_id: notification.user_id.map(UserId::get),
            candidate_id: notification.candidate_id.map(CandidateId::get),
            notification_type: notification.notification_type.as_str(),
            title: &notification.title,
            message: &notification.message,
        }
    }
}
