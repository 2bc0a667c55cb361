use serde::Deserialize;

use crate::domain::application::{ApplicationStage, NewApplication, UpdateApplication};
use crate::domain::types::{CandidateId, HubId, JobId};
use crate::forms::{DEFAULT_PAGE_SIZE, FormError, page_of, parse_optional};
use crate::repository::ApplicationListQuery;

/// Query string of `GET /api/applications`.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    pub status: Option<String>,
    pub stage: Option<String>,
    pub job_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ApplicationListParams {
    pub fn into_query(self, hub_id: HubId) -> Result<ApplicationListQuery, FormError> {
        let mut query = ApplicationListQuery::new(hub_id)
            .paginate(page_of(self.page, self.limit, DEFAULT_PAGE_SIZE));
        if let Some(status) = parse_optional(self.status.as_deref())? {
            query = query.status(status);
        }
        if let Some(stage) = parse_optional(self.stage.as_deref())? {
            query = query.stage(stage);
        }
        if let Some(job_id) = self.job_id {
            query = query.job(JobId::new(job_id)?);
        }
        if let Some(candidate_id) = self.candidate_id {
            query = query.candidate(CandidateId::new(candidate_id)?);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationForm {
    pub candidate_id: i32,
    pub job_id: i32,
    pub status: Option<String>,
    pub stage: Option<String>,
}

impl TryFrom<CreateApplicationForm> for NewApplication {
    type Error = FormError;

    fn try_from(form: CreateApplicationForm) -> Result<Self, Self::Error> {
        Ok(NewApplication::new(
            CandidateId::new(form.candidate_id)?,
            JobId::new(form.job_id)?,
            parse_optional(form.status.as_deref())?,
            parse_optional(form.stage.as_deref())?,
        ))
    }
}

/// Body of `PATCH /api/applications/{id}/status`. At least one field is required.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusForm {
    pub status: Option<String>,
    pub stage: Option<String>,
}

impl TryFrom<UpdateStatusForm> for UpdateApplication {
    type Error = FormError;

    fn try_from(form: UpdateStatusForm) -> Result<Self, Self::Error> {
        let updates = UpdateApplication {
            status: parse_optional(form.status.as_deref())?,
            stage: parse_optional(form.stage.as_deref())?,
        };
        if updates.is_empty() {
            return Err(FormError::Missing("status or stage"));
        }
        Ok(updates)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStageForm {
    pub stage: String,
}

impl TryFrom<UpdateStageForm> for UpdateApplication {
    type Error = FormError;

    fn try_from(form: UpdateStageForm) -> Result<Self, Self::Error> {
        let stage = parse_optional::<ApplicationStage>(Some(&form.stage))?
            .ok_or(FormError::Missing("stage"))?;
        Ok(UpdateApplication {
            status: None,
            stage: Some(stage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::ApplicationStatus;

    #[test]
    fn list_params_parse_filters() {
        let query = ApplicationListParams {
            status: Some("SCREENING".into()),
            candidate_id: Some(4),
            ..ApplicationListParams::default()
        }
        .into_query(HubId::new(1).unwrap())
        .unwrap();
        assert_eq!(query.status, Some(ApplicationStatus::Screening));
        assert_eq!(query.candidate_id.map(CandidateId::get), Some(4));
        assert_eq!(query.pagination.unwrap().per_page, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn status_update_needs_a_field() {
        let result = UpdateApplication::try_from(UpdateStatusForm::default());
        assert!(matches!(result, Err(FormError::Missing(_))));

        let updates = UpdateApplication::try_from(UpdateStatusForm {
            status: Some("OFFER".into()),
            stage: None,
        })
        .unwrap();
        assert_eq!(updates.status, Some(ApplicationStatus::Offer));
    }

    #[test]
    fn stage_update_rejects_blank_and_unknown_values() {
        assert!(UpdateApplication::try_from(UpdateStageForm { stage: " ".into() }).is_err());
        assert!(UpdateApplication::try_from(UpdateStageForm { stage: "DONE".into() }).is_err());
        let updates =
            UpdateApplication::try_from(UpdateStageForm { stage: "HR_REVIEW".into() }).unwrap();
        assert_eq!(updates.stage, Some(ApplicationStage::HrReview));
    }
}
