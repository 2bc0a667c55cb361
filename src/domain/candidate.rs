//! Candidates tracked by a hub and the CVs they upload.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CandidateEmail, CandidateId, CvId, HubId, PersonName, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub hub_id: HubId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: CandidateEmail,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug)]
pub struct NewCandidate {
    pub hub_id: HubId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: CandidateEmail,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
}

impl NewCandidate {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        first_name: PersonName,
        last_name: PersonName,
        email: CandidateEmail,
        phone: Option<PhoneNumber>,
        source: Option<String>,
    ) -> Self {
        Self {
            hub_id,
            first_name,
            last_name,
            email,
            phone,
            source: source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateCandidate {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub phone: Option<PhoneNumber>,
    pub source: Option<String>,
}

/// Uploaded CV metadata. The file itself lives in file storage under `file_key`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Cv {
    pub id: CvId,
    pub candidate_id: CandidateId,
    pub filename: String,
    pub file_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewCv {
    pub candidate_id: CandidateId,
    pub filename: String,
    pub file_key: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// Mime types accepted for CV uploads.
pub const ALLOWED_CV_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub fn is_allowed_cv_mime_type(mime_type: &str) -> bool {
    ALLOWED_CV_MIME_TYPES.contains(&mime_type)
}
