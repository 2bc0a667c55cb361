//! Diesel models for interviews and their participants.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::interview::{
    Attendee, Interview as DomainInterview, InterviewParticipant as DomainParticipant,
    InterviewResponse, InterviewStatus, NewInterview as DomainNewInterview,
    NewParticipant as DomainNewParticipant, ParticipantRole, UpdateInterview as DomainUpdateInterview,
};
use crate::domain::types::{
    ApplicationId, CandidateId, InterviewId, InterviewTitle, ParticipantId, TypeConstraintError,
    UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::interviews)]
/// Diesel model for [`crate::domain::interview::Interview`].
pub struct Interview {
    pub id: i32,
    pub application_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::interviews)]
pub struct NewInterview<'a> {
    pub application_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<&'a str>,
    pub status: &'static str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::interviews)]
pub struct UpdateInterview<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub location: Option<&'a str>,
    pub status: Option<&'static str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::interview_participants)]
#[diesel(belongs_to(Interview, foreign_key = interview_id))]
pub struct InterviewParticipant {
    pub id: i32,
    pub interview_id: i32,
    pub user_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub role: String,
    pub response: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::interview_participants)]
pub struct NewInterviewParticipant {
    pub interview_id: i32,
    pub user_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub role: &'static str,
}

impl TryFrom<Interview> for DomainInterview {
    type Error = TypeConstraintError;

    fn try_from(interview: Interview) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InterviewId::try_from(interview.id)?,
            application_id: ApplicationId::try_from(interview.application_id)?,
            title: InterviewTitle::new(interview.title)?,
            description: interview.description,
            start_time: interview.start_time,
            end_time: interview.end_time,
            location: interview.location,
            status: interview.status.parse::<InterviewStatus>()?,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewInterview> for NewInterview<'a> {
    fn from(interview: &'a DomainNewInterview) -> Self {
        Self {
            application_id: interview.application_id.get(),
            title: interview.title.as_str(),
            description: interview.description.as_deref(),
            start_time: interview.start_time,
            end_time: interview.end_time,
            location: interview.location.as_deref(),
            status: InterviewStatus::Scheduled.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateInterview> for UpdateInterview<'a> {
    fn from(update: &'a DomainUpdateInterview) -> Self {
        Self {
            title: update.title.as_ref().map(InterviewTitle::as_str),
            description: update.description.as_deref(),
            start_time: update.start_time,
            end_time: update.end_time,
            location: update.location.as_deref(),
            status: update.status.map(InterviewStatus::as_str),
        }
    }
}

impl TryFrom<InterviewParticipant> for DomainParticipant {
    type Error = TypeConstraintError;

    fn try_from(participant: InterviewParticipant) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ParticipantId::try_from(participant.id)?,
            interview_id: InterviewId::try_from(participant.interview_id)?,
            user_id: participant.user_id.map(UserId::try_from).transpose()?,
            candidate_id: participant
                .candidate_id
                .map(CandidateId::try_from)
                .transpose()?,
            role: participant.role.parse::<ParticipantRole>()?,
            response: participant.response.parse::<InterviewResponse>()?,
        })
    }
}

impl NewInterviewParticipant {
    pub fn from_domain(interview_id: i32, participant: &DomainNewParticipant) -> Self {
        let (user_id, candidate_id) = match participant.attendee {
            Attendee::User(user_id) => (Some(user_id.get()), None),
            Attendee::Candidate(candidate_id) => (None, Some(candidate_id.get())),
        };
        Self {
            interview_id,
            user_id,
            candidate_id,
            role: participant.role.as_str(),
        }
    }
}
