//! Applications link a candidate to a job and track hiring progress.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ApplicationId, CandidateId, JobId, text_enum};

text_enum! {
    /// Outcome-oriented state of an application.
    ApplicationStatus {
        Applied => "APPLIED",
        Screening => "SCREENING",
        Interview => "INTERVIEW",
        Offer => "OFFER",
        Hired => "HIRED",
        Rejected => "REJECTED",
    }
}

text_enum! {
    /// Pipeline step the application currently sits in.
    ApplicationStage {
        Applied => "APPLIED",
        HrReview => "HR_REVIEW",
        HmReview => "HM_REVIEW",
        Interview => "INTERVIEW",
        Offer => "OFFER",
        Onboarding => "ONBOARDING",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub stage: ApplicationStage,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewApplication {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub stage: ApplicationStage,
}

impl NewApplication {
    #[must_use]
    pub fn new(
        candidate_id: CandidateId,
        job_id: JobId,
        status: Option<ApplicationStatus>,
        stage: Option<ApplicationStage>,
    ) -> Self {
        Self {
            candidate_id,
            job_id,
            status: status.unwrap_or(ApplicationStatus::Applied),
            stage: stage.unwrap_or(ApplicationStage::Applied),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateApplication {
    pub status: Option<ApplicationStatus>,
    pub stage: Option<ApplicationStage>,
}

impl UpdateApplication {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.stage.is_none()
    }
}
