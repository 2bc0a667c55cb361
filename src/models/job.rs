//! Diesel models for job postings.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::job::{
    Job as DomainJob, JobStatus, NewJob as DomainNewJob, UpdateJob as DomainUpdateJob,
};
use crate::domain::types::{DepartmentName, HubId, JobId, JobTitle, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::jobs)]
/// Diesel model for [`crate::domain::job::Job`].
pub struct Job {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub description: String,
    pub department: String,
    pub location: Option<String>,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::jobs)]
pub struct NewJob<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub department: &'a str,
    pub location: Option<&'a str>,
    pub status: &'a str,
    pub published_at: Option<NaiveDateTime>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::jobs)]
pub struct UpdateJob<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub department: Option<&'a str>,
    pub location: Option<&'a str>,
    pub status: Option<&'a str>,
    pub published_at: Option<NaiveDateTime>,
}

impl TryFrom<Job> for DomainJob {
    type Error = TypeConstraintError;

    fn try_from(job: Job) -> Result<Self, Self::Error> {
        Ok(Self {
            id: JobId::try_from(job.id)?,
            hub_id: HubId::try_from(job.hub_id)?,
            title: JobTitle::new(job.title)?,
            description: job.description,
            department: DepartmentName::new(job.department)?,
            location: job.location,
            status: job.status.parse::<JobStatus>()?,
            published_at: job.published_at,
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewJob> for NewJob<'a> {
    fn from(job: &'a DomainNewJob) -> Self {
        Self {
            hub_id: job.hub_id.get(),
            title: job.title.as_str(),
            description: &job.description,
            department: job.department.as_str(),
            location: job.location.as_deref(),
            status: job.status.as_str(),
            published_at: job.published_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateJob> for UpdateJob<'a> {
    fn from(job: &'a DomainUpdateJob) -> Self {
        Self {
            title: job.title.as_ref().map(JobTitle::as_str),
            description: job.description.as_deref(),
            department: job.department.as_ref().map(DepartmentName::as_str),
            location: job.location.as_deref(),
            status: job.status.map(JobStatus::as_str),
            published_at: job.published_at,
        }
    }
}
