//! Diesel models for candidates and their CVs.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::candidate::{
    Candidate as DomainCandidate, Cv as DomainCv, NewCandidate as DomainNewCandidate,
    NewCv as DomainNewCv, UpdateCandidate as DomainUpdateCandidate,
};
use crate::domain::types::{
    CandidateEmail, CandidateId, CvId, HubId, PersonName, PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::candidates)]
/// Diesel model for [`crate::domain::candidate::Candidate`].
pub struct Candidate {
    pub id: i32,
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::candidates)]
/// Insertable form of [`Candidate`].
pub struct NewCandidate<'a> {
    pub hub_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub source: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::candidates)]
/// Data used when updating a [`Candidate`] record. `None` fields are skipped.
pub struct UpdateCandidate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub source: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::cvs)]
#[diesel(belongs_to(Candidate, foreign_key = candidate_id))]
pub struct Cv {
    pub id: i32,
    pub candidate_id: i32,
    pub filename: String,
    pub file_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cvs)]
pub struct NewCv<'a> {
    pub candidate_id: i32,
    pub filename: &'a str,
    pub file_key: &'a str,
    pub file_size: i64,
    pub mime_type: &'a str,
}

impl TryFrom<Candidate> for DomainCandidate {
    type Error = TypeConstraintError;

    fn try_from(candidate: Candidate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CandidateId::try_from(candidate.id)?,
            hub_id: HubId::try_from(candidate.hub_id)?,
            first_name: PersonName::new(candidate.first_name)?,
            last_name: PersonName::new(candidate.last_name)?,
            email: CandidateEmail::new(candidate.email)?,
            phone: candidate.phone.map(PhoneNumber::new).transpose()?,
            source: candidate.source,
            created_at: candidate.created_at,
            updated_at: candidate.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCandidate> for NewCandidate<'a> {
    fn from(candidate: &'a DomainNewCandidate) -> Self {
        Self {
            hub_id: candidate.hub_id.get(),
            first_name: candidate.first_name.as_str(),
            last_name: candidate.last_name.as_str(),
            email: candidate.email.as_str(),
            phone: candidate.phone.as_ref().map(PhoneNumber::as_str),
            source: candidate.source.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateCandidate> for UpdateCandidate<'a> {
    fn from(update: &'a DomainUpdateCandidate) -> Self {
        Self {
            first_name: update.first_name.as_ref().map(PersonName::as_str),
            last_name: update.last_name.as_ref().map(PersonName::as_str),
            phone: update.phone.as_ref().map(PhoneNumber::as_str),
            source: update.source.as_deref(),
        }
    }
}

impl TryFrom<Cv> for DomainCv {
    type Error = TypeConstraintError;

    fn try_from(cv: Cv) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CvId::try_from(cv.id)?,
            candidate_id: CandidateId::try_from(cv.candidate_id)?,
            filename: cv.filename,
            file_key: cv.file_key,
            file_size: cv.file_size,
            mime_type: cv.mime_type,
            created_at: cv.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCv> for NewCv<'a> {
    fn from(cv: &'a DomainNewCv) -> Self {
        Self {
            candidate_id: cv.candidate_id.get(),
            filename: &cv.filename,
            file_key: &cv.file_key,
            file_size: cv.file_size,
            mime_type: &cv.mime_type,
        }
    }
}
