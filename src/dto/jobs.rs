use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::application::Application;
use crate::domain::candidate::Candidate;
use crate::domain::form::Form;
use crate::domain::job::Job;

#[derive(Debug, Serialize)]
pub struct JobListItem {
    #[serde(flatten)]
    pub job: Job,
    pub application_count: i64,
}

#[derive(Debug, Serialize)]
pub struct JobApplication {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Candidate,
}

/// A job with its applications (hidden from candidates) and attached form.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<JobApplication>>,
    pub form: Option<Form>,
}

#[derive(Debug, Serialize)]
pub struct JobStats {
    pub total: i64,
    pub by_status: BTreeMap<&'static str, i64>,
    pub total_applications: i64,
}
