//! Job postings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DepartmentName, HubId, JobId, JobTitle, text_enum};

text_enum! {
    /// Publication state of a job posting.
    JobStatus {
        Draft => "DRAFT",
        Published => "PUBLISHED",
        Closed => "CLOSED",
        Archived => "ARCHIVED",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub hub_id: HubId,
    pub title: JobTitle,
    pub description: String,
    pub department: DepartmentName,
    pub location: Option<String>,
    pub status: JobStatus,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Job {
    pub fn is_published(&self) -> bool {
        self.status == JobStatus::Published
    }
}

#[derive(Clone, Debug)]
pub struct NewJob {
    pub hub_id: HubId,
    pub title: JobTitle,
    pub description: String,
    pub department: DepartmentName,
    pub location: Option<String>,
    pub status: JobStatus,
    pub published_at: Option<NaiveDateTime>,
}

impl NewJob {
    /// Builds a job; creating it as published stamps `published_at` with `now`.
    #[must_use]
    pub fn new(
        hub_id: HubId,
        title: JobTitle,
        description: String,
        department: DepartmentName,
        location: Option<String>,
        status: Option<JobStatus>,
        now: NaiveDateTime,
    ) -> Self {
        let status = status.unwrap_or(JobStatus::Draft);
        let published_at = (status == JobStatus::Published).then_some(now);
        Self {
            hub_id,
            title,
            description,
            department,
            location,
            status,
            published_at,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateJob {
    pub title: Option<JobTitle>,
    pub description: Option<String>,
    pub department: Option<DepartmentName>,
    pub location: Option<String>,
    pub status: Option<JobStatus>,
    pub published_at: Option<NaiveDateTime>,
}

impl UpdateJob {
    pub fn publish(now: NaiveDateTime) -> Self {
        Self {
            status: Some(JobStatus::Published),
            published_at: Some(now),
            ..Self::default()
        }
    }

    pub fn close() -> Self {
        Self {
            status: Some(JobStatus::Closed),
            ..Self::default()
        }
    }
}
