//! Diesel models for custom forms and submitted responses.
//!
//! Field definitions and answers are stored as JSON text.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::{Map, Value};

use crate::domain::form::{
    Form as DomainForm, FormField, FormResponse as DomainFormResponse, NewForm as DomainNewForm,
    NewFormResponse as DomainNewFormResponse, UpdateForm as DomainUpdateForm,
};
use crate::domain::types::{
    ApplicationId, CandidateId, FormId, FormResponseId, FormTitle, HubId, JobId,
    TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::forms)]
/// Diesel model for [`crate::domain::form::Form`].
pub struct Form {
    pub id: i32,
    pub hub_id: i32,
    pub job_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub fields: String,
    pub is_active: bool,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::forms)]
pub struct NewForm<'a> {
    pub hub_id: i32,
    pub job_id: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub fields: String,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::forms)]
pub struct UpdateForm<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub fields: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::form_responses)]
#[diesel(belongs_to(Form, foreign_key = form_id))]
pub struct FormResponse {
    pub id: i32,
    pub form_id: i32,
    pub application_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub answers: String,
    pub submitted_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::form_responses)]
pub struct NewFormResponse {
    pub form_id: i32,
    pub application_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub answers: String,
}

fn fields_to_json(fields: &[FormField]) -> String {
    serde_json::to_string(fields).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Form> for DomainForm {
    type Error = TypeConstraintError;

    fn try_from(form: Form) -> Result<Self, Self::Error> {
        let fields: Vec<FormField> = serde_json::from_str(&form.fields)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("form fields: {e}")))?;
        Ok(Self {
            id: FormId::try_from(form.id)?,
            hub_id: HubId::try_from(form.hub_id)?,
            job_id: form.job_id.map(JobId::try_from).transpose()?,
            title: FormTitle::new(form.title)?,
            description: form.description,
            fields,
            is_active: form.is_active,
            created_by: UserId::try_from(form.created_by)?,
            created_at: form.created_at,
            updated_at: form.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewForm> for NewForm<'a> {
    fn from(form: &'a DomainNewForm) -> Self {
        Self {
            hub_id: form.hub_id.get(),
            job_id: form.job_id.map(JobId::get),
            title: form.title.as_str(),
            description: form.description.as_deref(),
            fields: fields_to_json(&form.fields),
            created_by: form.created_by.get(),
        }
    }
}

impl<'a> From<&'a DomainUpdateForm> for UpdateForm<'a> {
    fn from(form: &'a DomainUpdateForm) -> Self {
        Self {
            title: form.title.as_ref().map(FormTitle::as_str),
            description: form.description.as_deref(),
            fields: form.fields.as_deref().map(fields_to_json),
            is_active: form.is_active,
        }
    }
}

impl TryFrom<FormResponse> for DomainFormResponse {
    type Error = TypeConstraintError;

    fn try_from(response: FormResponse) -> Result<Self, Self::Error> {
        let answers: Map<String, Value> = serde_json::from_str(&response.answers)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("form answers: {e}")))?;
        Ok(Self {
            id: FormResponseId::try_from(response.id)?,
            form_id: FormId::try_from(response.form_id)?,
            application_id: response
                .application_id
                .map(ApplicationId::try_from)
                .transpose()?,
            candidate_id: response.candidate_id.map(CandidateId::try_from).transpose()?,
            answers,
            submitted_at: response.submitted_at,
        })
    }
}

impl From<&DomainNewFormResponse> for NewFormResponse {
    fn from(response: &DomainNewFormResponse) -> Self {
        Self {
            form_id: response.form_id.get(),
            application_id: response.application_id.map(ApplicationId::get),
            candidate_id: response.candidate_id.map(CandidateId::get),
            answers: Value::Object(response.answers.clone()).to_string(),
        }
    }
}
