use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::form::{FormField, NewForm, UpdateForm, validate_fields};
use crate::domain::types::{ApplicationId, CandidateId, FormTitle, HubId, JobId, UserId};
use crate::forms::{DEFAULT_PAGE_SIZE, FormError, non_blank_owned, page_of};
use crate::repository::FormListQuery;

/// Query string of `GET /api/forms`.
#[derive(Debug, Default, Deserialize)]
pub struct FormListParams {
    pub job_id: Option<i32>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl FormListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<FormListQuery, FormError> {
        let mut query =
            FormListQuery::new(hub_id).paginate(page_of(self.page, self.limit, DEFAULT_PAGE_SIZE));
        if let Some(job_id) = self.job_id {
            query = query.job(JobId::new(job_id)?);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFormForm {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub job_id: Option<i32>,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl CreateFormForm {
    pub fn into_domain(self, hub_id: HubId, created_by: UserId) -> Result<NewForm, FormError> {
        self.validate()?;
        Ok(NewForm::try_new(
            hub_id,
            self.job_id.map(JobId::new).transpose()?,
            FormTitle::new(self.title)?,
            non_blank_owned(self.description),
            self.fields,
            created_by,
        )?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFormForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FormField>>,
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateFormForm> for UpdateForm {
    type Error = FormError;

    fn try_from(form: UpdateFormForm) -> Result<Self, Self::Error> {
        if let Some(fields) = &form.fields {
            validate_fields(fields)?;
        }
        Ok(UpdateForm {
            title: non_blank_owned(form.title).map(FormTitle::new).transpose()?,
            description: form.description,
            fields: form.fields,
            is_active: form.is_active,
        })
    }
}

/// Body of `POST /api/forms/{id}/responses`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponseForm {
    #[serde(default)]
    pub answers: Map<String, Value>,
    pub application_id: Option<i32>,
    pub candidate_id: Option<i32>,
}

impl SubmitResponseForm {
    pub fn application_id(&self) -> Result<Option<ApplicationId>, FormError> {
        Ok(self.application_id.map(ApplicationId::new).transpose()?)
    }

    pub fn candidate_id(&self) -> Result<Option<CandidateId>, FormError> {
        Ok(self.candidate_id.map(CandidateId::new).transpose()?)
    }
}
