use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::application::Application;
use crate::domain::candidate::Candidate;
use crate::domain::form::FormResponse;
use crate::domain::job::Job;
use crate::dto::CandidateSummary;
use crate::dto::candidates::JobSummary;
use crate::dto::interviews::InterviewWithParticipants;
use crate::dto::notes::NoteView;

#[derive(Debug, Serialize)]
pub struct ApplicationListItem {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Option<CandidateSummary>,
    pub job: Option<JobSummary>,
}

/// An application with everything recorded about it.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Candidate,
    pub job: Job,
    pub form_response: Option<FormResponse>,
    pub notes: Vec<NoteView>,
    pub interviews: Vec<InterviewWithParticipants>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub by_status: BTreeMap<&'static str, i64>,
    pub by_stage: BTreeMap<&'static str, i64>,
}
