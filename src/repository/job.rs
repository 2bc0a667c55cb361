//! Repository implementation for job postings.

use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        job::{Job, JobStatus, NewJob, UpdateJob},
        types::{HubId, JobId},
    },
    models::job::{Job as DbJob, NewJob as DbNewJob, UpdateJob as DbUpdateJob},
    repository::{
        DieselRepository, JobListQuery, JobReader, JobWriter, LIKE_ESCAPE, contains_pattern,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{applications, jobs},
};

fn filtered_jobs(query: &JobListQuery) -> jobs::BoxedQuery<'static, Sqlite> {
    let mut items = jobs::table
        .filter(jobs::hub_id.eq(query.hub_id.get()))
        .into_boxed();
    if let Some(status) = query.status {
        items = items.filter(jobs::status.eq(status.as_str()));
    }
    if let Some(department) = query.department.as_deref().filter(|d| !d.trim().is_empty()) {
        items = items.filter(
            jobs::department
                .like(contains_pattern(department.trim()))
                .escape(LIKE_ESCAPE),
        );
    }
    if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
        items = items.filter(
            jobs::location
                .like(contains_pattern(location.trim()))
                .escape(LIKE_ESCAPE),
        );
    }
    items
}

impl JobReader for DieselRepository {
    fn get_job_by_id(&self, id: JobId, hub_id: HubId) -> RepositoryResult<Option<Job>> {
        let mut conn = self.conn()?;
        let db_job = jobs::table
            .filter(jobs::id.eq(id.get()))
            .filter(jobs::hub_id.eq(hub_id.get()))
            .first::<DbJob>(&mut conn)
            .optional()?;

        db_job.map(Job::try_from).transpose().map_err(RepositoryError::from)
    }

    fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<(Job, i64)>)> {
        let mut conn = self.conn()?;

        let total = filtered_jobs(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_jobs(&query).order((jobs::created_at.desc(), jobs::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }
        let db_jobs = items.load::<DbJob>(&mut conn)?;

        let job_ids: Vec<i32> = db_jobs.iter().map(|j| j.id).collect();
        let counts: HashMap<i32, i64> = applications::table
            .filter(applications::job_id.eq_any(job_ids))
            .group_by(applications::job_id)
            .select((applications::job_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let jobs = db_jobs
            .into_iter()
            .map(|db_job| {
                let count = counts.get(&db_job.id).copied().unwrap_or(0);
                Ok((Job::try_from(db_job)?, count))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, jobs))
    }

    fn count_jobs_by_status(&self, hub_id: HubId) -> RepositoryResult<Vec<(JobStatus, i64)>> {
        let mut conn = self.conn()?;
        jobs::table
            .filter(jobs::hub_id.eq(hub_id.get()))
            .group_by(jobs::status)
            .select((jobs::status, count_star()))
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(status, count)| Ok((status.parse::<JobStatus>()?, count)))
            .collect()
    }
}

impl JobWriter for DieselRepository {
    fn create_job(&self, job: &NewJob) -> RepositoryResult<Job> {
        let mut conn = self.conn()?;
        let db_job = diesel::insert_into(jobs::table)
            .values(&DbNewJob::from(job))
            .get_result::<DbJob>(&mut conn)?;

        Ok(Job::try_from(db_job)?)
    }

    fn update_job(&self, id: JobId, hub_id: HubId, updates: &UpdateJob) -> RepositoryResult<Job> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateJob::from(updates);
        let db_job = diesel::update(
            jobs::table
                .filter(jobs::id.eq(id.get()))
                .filter(jobs::hub_id.eq(hub_id.get())),
        )
        .set((&db_updates, jobs::updated_at.eq(Utc::now().naive_utc())))
        .get_result::<DbJob>(&mut conn)?;

        Ok(Job::try_from(db_job)?)
    }

    fn delete_job(&self, id: JobId, hub_id: HubId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            jobs::table
                .filter(jobs::id.eq(id.get()))
                .filter(jobs::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;
        Ok(deleted)
    }
}
