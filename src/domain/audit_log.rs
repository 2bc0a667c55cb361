//! Append-only record of administrative actions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{AuditLogId, HubId, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub hub_id: HubId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i32>,
    pub details: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewAuditLog {
    pub hub_id: HubId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i32>,
    pub details: Value,
}

impl NewAuditLog {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        user_id: UserId,
        action: &str,
        resource: &str,
        resource_id: Option<i32>,
        details: Value,
    ) -> Self {
        Self {
            hub_id,
            user_id: Some(user_id),
            action: action.to_string(),
            resource: resource.to_string(),
            resource_id,
            details,
        }
    }
}
