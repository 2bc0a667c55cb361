//! Response bodies produced by the services and serialized by the routes.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod forms;
pub mod interviews;
pub mod jobs;
pub mod notes;

use serde::Serialize;

use crate::domain::candidate::Candidate;
use crate::domain::types::{CandidateId, UserId};
use crate::domain::user::{User, UserRole};

/// Compact user reference embedded in notes and interviews.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.full_name(),
            email: user.email.as_str().to_string(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&Candidate> for CandidateSummary {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.full_name(),
            email: candidate.email.as_str().to_string(),
            phone: candidate.phone.as_ref().map(|p| p.as_str().to_string()),
        }
    }
}
