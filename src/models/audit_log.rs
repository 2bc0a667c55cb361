//! Diesel models for audit logs.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::audit_log::{AuditLog as DomainAuditLog, NewAuditLog as DomainNewAuditLog};
use crate::domain::types::{AuditLogId, HubId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct AuditLog {
    pub id: i32,
    pub hub_id: i32,
    pub user_id: Option<i32>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i32>,
    pub details: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct NewAuditLog<'a> {
    pub hub_id: i32,
    pub user_id: Option<i32>,
    pub action: &'a str,
    pub resource: &'a str,
    pub resource_id: Option<i32>,
    pub details: String,
}

impl TryFrom<AuditLog> for DomainAuditLog {
    type Error = TypeConstraintError;

    fn try_from(log: AuditLog) -> Result<Self, Self::Error> {
        // Details are informational; unreadable JSON is kept as a plain string.
        let details =
            serde_json::from_str(&log.details).unwrap_or(Value::String(log.details.clone()));
        Ok(Self {
            id: AuditLogId::try_from(log.id)?,
            hub_id: HubId::try_from(log.hub_id)?,
            user_id: log.user_id.map(UserId::try_from).transpose()?,
            action: log.action,
            resource: log.resource,
            resource_id: log.resource_id,
            details,
            created_at: log.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAuditLog> for NewAuditLog<'a> {
    fn from(log: &'a DomainNewAuditLog) -> Self {
        Self {
            hub_id: log.hub_id.get(),
            user_id: log.user_id.map(UserId::get),
            action: &log.action,
            resource: &log.resource,
            resource_id: log.resource_id,
            details: log.details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn audit_details_are_stored_as_json_text() {
        let log = DomainNewAuditLog::new(
            HubId::new(1).unwrap(),
            UserId::new(2).unwrap(),
            "CREATE",
            "job",
            Some(7),
            json!({"title": "Engineer"}),
        );
        let row: NewAuditLog = (&log).into();
        assert_eq!(row.details, r#"{"title":"Engineer"}"#);

        let stored = AuditLog {
            id: 1,
            hub_id: 1,
            user_id: Some(2),
            action: "CREATE".into(),
            resource: "job".into(),
            resource_id: Some(7),
            details: row.details,
            created_at: Utc::now().naive_utc(),
        };
        let domain = DomainAuditLog::try_from(stored).unwrap();
        assert_eq!(domain.details["title"], "Engineer");
    }
}
