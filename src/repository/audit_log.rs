//! Repository implementation for audit logs.

use chrono::{Days, NaiveTime};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::audit_log::{AuditLog, NewAuditLog},
    models::audit_log::{AuditLog as DbAuditLog, NewAuditLog as DbNewAuditLog},
    repository::{
        AuditLogListQuery, AuditLogReader, AuditLogWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::audit_logs,
};

fn filtered_audit_logs(query: &AuditLogListQuery) -> audit_logs::BoxedQuery<'static, Sqlite> {
    let mut items = audit_logs::table
        .filter(audit_logs::hub_id.eq(query.hub_id.get()))
        .into_boxed();
    if let Some(resource) = query.resource.as_deref() {
        items = items.filter(audit_logs::resource.eq(resource.to_string()));
    }
    if let Some(user_id) = query.user_id {
        items = items.filter(audit_logs::user_id.eq(user_id.get()));
    }
    if let Some(start) = query.start_date {
        items = items.filter(audit_logs::created_at.ge(start.and_time(NaiveTime::MIN)));
    }
    if let Some(end) = query
        .end_date
        .and_then(|end| end.checked_add_days(Days::new(1)))
    {
        items = items.filter(audit_logs::created_at.lt(end.and_time(NaiveTime::MIN)));
    }
    items
}

impl AuditLogReader for DieselRepository {
    fn list_audit_logs(
        &self,
        query: AuditLogListQuery,
    ) -> RepositoryResult<(usize, Vec<AuditLog>)> {
        let mut conn = self.conn()?;

        let total = filtered_audit_logs(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_audit_logs(&query)
            .order((audit_logs::created_at.desc(), audit_logs::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let logs = items
            .load::<DbAuditLog>(&mut conn)?
            .into_iter()
            .map(|l| AuditLog::try_from(l).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, logs))
    }
}

impl AuditLogWriter for DieselRepository {
    fn create_audit_log(&self, log: &NewAuditLog) -> RepositoryResult<AuditLog> {
        let mut conn = self.conn()?;
        let db_log = diesel::insert_into(audit_logs::table)
            .values(&DbNewAuditLog::from(log))
            .get_result::<DbAuditLog>(&mut conn)?;

        Ok(AuditLog::try_from(db_log)?)
    }
}
