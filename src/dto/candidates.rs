use serde::Serialize;

use crate::domain::application::Application;
use crate::domain::candidate::{Candidate, Cv};
use crate::domain::job::{Job, JobStatus};
use crate::domain::note::Note;
use crate::domain::types::{CvId, JobId};
use crate::dto::interviews::InterviewWithParticipants;
use crate::dto::notes::NoteView;

pub fn cv_download_url(id: CvId) -> String {
    format!("/api/candidates/cv/{id}/download")
}

#[derive(Debug, Clone, Serialize)]
pub struct CvView {
    #[serde(flatten)]
    pub cv: Cv,
    pub download_url: String,
}

impl From<Cv> for CvView {
    fn from(cv: Cv) -> Self {
        Self {
            download_url: cv_download_url(cv.id),
            cv,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: Option<String>,
    pub status: JobStatus,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.as_str().to_string(),
            department: job.department.as_str().to_string(),
            location: job.location.clone(),
            status: job.status,
        }
    }
}

/// One of a candidate's applications with what happened on it so far.
#[derive(Debug, Serialize)]
pub struct CandidateApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobSummary,
    pub interviews: Vec<InterviewWithParticipants>,
    pub notes: Vec<Note>,
}

/// What a candidate sees about themselves.
#[derive(Debug, Serialize)]
pub struct CandidateProfile {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub applications: Vec<CandidateApplication>,
    pub cvs: Vec<CvView>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListItem {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub application_count: usize,
    pub job_titles: Vec<String>,
    pub latest_cv: Option<CvView>,
}

/// What HR sees about a candidate, all notes included.
#[derive(Debug, Serialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub applications: Vec<CandidateApplication>,
    pub cvs: Vec<CvView>,
    pub notes: Vec<NoteView>,
}
