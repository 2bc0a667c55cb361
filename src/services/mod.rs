//! Business logic behind every API endpoint.
//!
//! Services are plain functions generic over the repository traits they need,
//! so they can run against [`crate::repository::DieselRepository`] in
//! production and against mocks in tests.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod errors;
pub mod forms;
pub mod interviews;
pub mod jobs;
pub mod notes;
#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod test_support;

pub use errors::{ServiceError, ServiceResult, ensure_role};

use crate::domain::audit_log::NewAuditLog;
use crate::domain::notification::NewNotification;
use crate::repository::{AuditLogWriter, NotificationWriter};

/// Appends an audit entry. A failed write is logged and does not fail the request.
pub(crate) fn record_audit<R>(repo: &R, entry: NewAuditLog)
where
    R: AuditLogWriter + ?Sized,
{
    if let Err(err) = repo.create_audit_log(&entry) {
        log::error!(
            "Failed to record audit entry {} {}: {err}",
            entry.action,
            entry.resource
        );
    }
}

/// Stores notifications. A failed write is logged and does not fail the request.
pub(crate) fn notify<R>(repo: &R, notifications: &[NewNotification])
where
    R: NotificationWriter + ?Sized,
{
    if notifications.is_empty() {
        return;
    }
    if let Err(err) = repo.create_notifications(notifications) {
        log::error!("Failed to record notifications: {err}");
    }
}
