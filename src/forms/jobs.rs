use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::job::{JobStatus, NewJob, UpdateJob};
use crate::domain::types::{DepartmentName, HubId, JobTitle};
use crate::forms::{DEFAULT_PAGE_SIZE, FormError, non_blank, non_blank_owned, page_of, parse_optional};
use crate::repository::JobListQuery;

/// Query string of `GET /api/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    pub status: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl JobListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<JobListQuery, FormError> {
        let mut query =
            JobListQuery::new(hub_id).paginate(page_of(self.page, self.limit, DEFAULT_PAGE_SIZE));
        if let Some(status) = parse_optional::<JobStatus>(self.status.as_deref())? {
            query = query.status(status);
        }
        if let Some(department) = non_blank(self.department.as_deref()) {
            query = query.department(department);
        }
        if let Some(location) = non_blank(self.location.as_deref()) {
            query = query.location(location);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobForm {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl CreateJobForm {
    pub fn into_domain(self, hub_id: HubId, now: NaiveDateTime) -> Result<NewJob, FormError> {
        self.validate()?;
        Ok(NewJob::new(
            hub_id,
            JobTitle::new(self.title)?,
            self.description.trim().to_string(),
            DepartmentName::new(self.department)?,
            non_blank_owned(self.location),
            parse_optional(self.status.as_deref())?,
            now,
        ))
    }
}

/// Partial job update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateJobForm {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<UpdateJobForm> for UpdateJob {
    type Error = FormError;

    fn try_from(form: UpdateJobForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateJob {
            title: form.title.map(JobTitle::new).transpose()?,
            description: non_blank_owned(form.description),
            department: form.department.map(DepartmentName::new).transpose()?,
            location: form.location.map(|l| l.trim().to_string()),
            status: parse_optional(form.status.as_deref())?,
            published_at: None,
        })
    }
}
