//! Notifications recorded for users and candidates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CandidateId, HubId, NotificationId, UserId, text_enum};

text_enum! {
    /// Event a notification reports.
    NotificationType {
        ApplicationReceived => "APPLICATION_RECEIVED",
        InterviewScheduled => "INTERVIEW_SCHEDULED",
        InterviewCancelled => "INTERVIEW_CANCELLED",
        StatusChanged => "STATUS_CHANGED",
        System => "SYSTEM",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub hub_id: HubId,
    pub user_id: Option<UserId>,
    pub candidate_id: Option<CandidateId>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    pub hub_id: HubId,
    pub user_id: Option<UserId>,
    pub candidate_id: Option<CandidateId>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
}

impl NewNotification {
    pub fn for_user(
        hub_id: HubId,
        user_id: UserId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            user_id: Some(user_id),
            candidate_id: None,
            notification_type,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn for_candidate(
        hub_id: HubId,
        candidate_id: CandidateId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            user_id: None,
            candidate_id: Some(candidate_id),
            notification_type,
            title: title.into(),
            message: message.into(),
        }
    }
}
