use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::interview::{InterviewResponse, UpdateInterview};
use crate::domain::types::{ApplicationId, CandidateId, HubId, InterviewTitle, UserId};
use crate::forms::{FormError, non_blank, non_blank_owned, parse_date, parse_datetime, parse_optional};
use crate::repository::InterviewListQuery;

/// Query string of `GET /api/interviews`.
#[derive(Debug, Default, Deserialize)]
pub struct InterviewListParams {
    /// Day (`YYYY-MM-DD`, UTC) the interviews start on.
    pub date: Option<String>,
    pub status: Option<String>,
    pub interviewer_id: Option<i32>,
    pub candidate_id: Option<i32>,
}

impl InterviewListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<InterviewListQuery, FormError> {
        let mut query = InterviewListQuery::new(hub_id);
        if let Some(date) = non_blank(self.date.as_deref()) {
            query = query.on(parse_date(date)?);
        }
        if let Some(status) = parse_optional(self.status.as_deref())? {
            query = query.status(status);
        }
        if let Some(user_id) = self.interviewer_id {
            query = query.interviewer(UserId::new(user_id)?);
        }
        if let Some(candidate_id) = self.candidate_id {
            query = query.candidate(CandidateId::new(candidate_id)?);
        }
        Ok(query)
    }
}

/// Body of `POST /api/interviews`.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleInterviewForm {
    pub application_id: Option<i32>,
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Interviewer user ids.
    #[serde(default)]
    pub participant_ids: Vec<i32>,
    #[serde(default)]
    pub observer_ids: Vec<i32>,
}

pub struct SchedulePayload {
    pub application_id: ApplicationId,
    pub title: InterviewTitle,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub interviewers: Vec<UserId>,
    pub observers: Vec<UserId>,
}

impl SchedulePayload {
    /// Every staff member invited, interviewers first, without repeats.
    pub fn staff(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = Vec::new();
        for id in self.interviewers.iter().chain(&self.observers) {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

fn user_ids(raw: Vec<i32>) -> Result<Vec<UserId>, FormError> {
    Ok(raw
        .into_iter()
        .map(UserId::new)
        .collect::<Result<Vec<_>, _>>()?)
}

impl TryFrom<ScheduleInterviewForm> for SchedulePayload {
    type Error = FormError;

    fn try_from(form: ScheduleInterviewForm) -> Result<Self, Self::Error> {
        let application_id = form
            .application_id
            .ok_or(FormError::Missing("application_id"))?;
        let title = non_blank_owned(form.title).ok_or(FormError::Missing("title"))?;
        let start_time =
            non_blank(form.start_time.as_deref()).ok_or(FormError::Missing("start_time"))?;
        let end_time = non_blank(form.end_time.as_deref()).ok_or(FormError::Missing("end_time"))?;

        Ok(Self {
            application_id: ApplicationId::new(application_id)?,
            title: InterviewTitle::new(title)?,
            start_time: parse_datetime(start_time)?,
            end_time: parse_datetime(end_time)?,
            description: non_blank_owned(form.description),
            location: non_blank_owned(form.location),
            interviewers: user_ids(form.participant_ids)?,
            observers: user_ids(form.observer_ids)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInterviewForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<UpdateInterviewForm> for UpdateInterview {
    type Error = FormError;

    fn try_from(form: UpdateInterviewForm) -> Result<Self, Self::Error> {
        Ok(UpdateInterview {
            title: non_blank_owned(form.title)
                .map(InterviewTitle::new)
                .transpose()?,
            description: form.description,
            start_time: non_blank(form.start_time.as_deref())
                .map(parse_datetime)
                .transpose()?,
            end_time: non_blank(form.end_time.as_deref())
                .map(parse_datetime)
                .transpose()?,
            location: form.location,
            status: parse_optional(form.status.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelInterviewForm {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RespondForm {
    pub response: String,
}

impl TryFrom<RespondForm> for InterviewResponse {
    type Error = FormError;

    fn try_from(form: RespondForm) -> Result<Self, Self::Error> {
        match parse_optional::<InterviewResponse>(Some(&form.response))? {
            Some(InterviewResponse::Pending) | None => Err(FormError::Missing(
                "response (ACCEPTED, DECLINED or TENTATIVE)",
            )),
            Some(response) => Ok(response),
        }
    }
}
