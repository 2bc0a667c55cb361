//! Repository implementation for notifications.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        notification::{NewNotification, Notification},
        types::{HubId, NotificationId},
    },
    models::notification::{
        NewNotification as DbNewNotification, Notification as DbNotification,
    },
    repository::{
        DieselRepository, NotificationListQuery, NotificationReader, NotificationWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::notifications,
};

fn filtered_notifications(
    query: &NotificationListQuery,
) -> notifications::BoxedQuery<'static, Sqlite> {
    let mut items = notifications::table
        .filter(notifications::hub_id.eq(query.hub_id.get()))
        .into_boxed();
    if let Some(notification_type) = query.notification_type {
        items = items.filter(notifications::notification_type.eq(notification_type.as_str()));
    }
    if let Some(read) = query.read {
        items = items.filter(notifications::read.eq(read));
    }
    if let Some(user_id) = query.user_id {
        items = items.filter(notifications::user_id.eq(user_id.get()));
    }
    if let Some(candidate_id) = query.candidate_id {
        items = items.filter(notifications::candidate_id.eq(candidate_id.get()));
    }
    items
}

impl NotificationReader for DieselRepository {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<(usize, Vec<Notification>)> {
        let mut conn = self.conn()?;

        let total = filtered_notifications(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_notifications(&query)
            .order((notifications::created_at.desc(), notifications::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let notifications = items
            .load::<DbNotification>(&mut conn)?
            .into_iter()
            .map(|n| Notification::try_from(n).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, notifications))
    }
}

impl NotificationWriter for DieselRepository {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize> {
        if notifications.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn()?;
        let rows = notifications
            .iter()
            .map(DbNewNotification::from)
            .collect::<Vec<_>>();
        let inserted = diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)?;
        Ok(inserted)
    }

    fn mark_notification_read(
        &self,
        id: NotificationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Notification>> {
        let mut conn = self.conn()?;
        let db_notification = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.get()))
                .filter(notifications::hub_id.eq(hub_id.get())),
        )
        .set(notifications::read.eq(true))
        .get_result::<DbNotification>(&mut conn)
        .optional()?;

        db_notification
            .map(Notification::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}
