use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::candidate::{NewCandidate, UpdateCandidate};
use crate::domain::types::{CandidateEmail, HubId, JobId, PersonName, PhoneNumber};
use crate::forms::{FormError, non_blank, non_blank_owned, page_of, parse_optional};
use crate::repository::CandidateListQuery;

pub const CANDIDATE_PAGE_SIZE: usize = 20;

/// Query string of `GET /api/candidates`.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub stage: Option<String>,
    pub job_id: Option<i32>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl CandidateListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<CandidateListQuery, FormError> {
        let mut query = CandidateListQuery::new(hub_id)
            .paginate(page_of(self.page, self.limit, CANDIDATE_PAGE_SIZE));
        if let Some(search) = non_blank(self.search.as_deref()) {
            query = query.search(search);
        }
        if let Some(status) = parse_optional(self.status.as_deref())? {
            query = query.status(status);
        }
        if let Some(stage) = parse_optional(self.stage.as_deref())? {
            query = query.stage(stage);
        }
        if let Some(job_id) = self.job_id {
            query = query.job(JobId::new(job_id)?);
        }
        Ok(query)
    }
}

fn parse_phone(phone: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    Ok(non_blank_owned(phone).map(PhoneNumber::new).transpose()?)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCandidateForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
}

impl CreateCandidateForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewCandidate, FormError> {
        self.validate()?;
        Ok(NewCandidate::new(
            hub_id,
            PersonName::new(self.first_name)?,
            PersonName::new(self.last_name)?,
            CandidateEmail::new(self.email)?,
            parse_phone(self.phone)?,
            self.source,
        ))
    }
}

/// Partial self-service update of a candidate record.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
}

impl TryFrom<UpdateProfileForm> for UpdateCandidate {
    type Error = FormError;

    fn try_from(form: UpdateProfileForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateCandidate {
            first_name: form.first_name.map(PersonName::new).transpose()?,
            last_name: form.last_name.map(PersonName::new).transpose()?,
            phone: parse_phone(form.phone)?,
            source: non_blank_owned(form.source),
        })
    }
}

/// Multipart body of `POST /api/candidates/cv`.
#[derive(MultipartForm)]
pub struct UploadCvForm {
    pub cv: Option<TempFile>,
}

/// A CV file read into memory.
#[derive(Debug, Clone, Default)]
pub struct CvUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadCvForm {
    /// Reads the uploaded file. A missing `cv` field yields an empty upload.
    pub fn into_upload(self) -> std::io::Result<CvUpload> {
        let Some(cv) = self.cv else {
            return Ok(CvUpload::default());
        };
        let mut file = cv.file.reopen()?;
        let mut bytes = Vec::with_capacity(cv.size);
        file.read_to_end(&mut bytes)?;
        Ok(CvUpload {
            filename: cv
                .file_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "cv".to_string()),
            mime_type: cv
                .content_type
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_default(),
            bytes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplyForm {
    pub job_id: i32,
    /// Answers to the job's application form, keyed by field id.
    #[serde(default)]
    pub form_response: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::ApplicationStatus;

    #[test]
    fn list_params_default_to_twenty_per_page() {
        let query = CandidateListParams {
            search: Some(" jane ".into()),
            status: Some("SCREENING".into()),
            ..CandidateListParams::default()
        }
        .into_query(HubId::new(1).unwrap())
        .unwrap();
        assert_eq!(query.pagination.unwrap().per_page, 20);
        assert_eq!(query.search.as_deref(), Some("jane"));
        assert_eq!(query.status, Some(ApplicationStatus::Screening));
        assert!(query.filters_applications());
    }

    #[test]
    fn list_params_reject_unknown_stage() {
        let result = CandidateListParams {
            stage: Some("SOMEWHERE".into()),
            ..CandidateListParams::default()
        }
        .into_query(HubId::new(1).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn create_form_validates_email_and_phone() {
        let form = CreateCandidateForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "JANE@example.com".into(),
            phone: Some("+1 (415) 555-2671".into()),
            source: Some("LinkedIn".into()),
        };
        let candidate = form.into_domain(HubId::new(1).unwrap()).unwrap();
        assert_eq!(candidate.email.as_str(), "jane@example.com");
        assert_eq!(candidate.phone.unwrap().as_str(), "+14155552671");

        let form = CreateCandidateForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "not-an-email".into(),
            phone: None,
            source: None,
        };
        assert!(form.into_domain(HubId::new(1).unwrap()).is_err());
    }

    #[test]
    fn update_form_ignores_blank_phone() {
        let update = UpdateCandidate::try_from(UpdateProfileForm {
            phone: Some("   ".into()),
            ..UpdateProfileForm::default()
        })
        .unwrap();
        assert!(update.phone.is_none());
        assert!(update.first_name.is_none());
    }
}
