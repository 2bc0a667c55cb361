//! Diesel models for applications.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::application::{
    Application as DomainApplication, ApplicationStage, ApplicationStatus,
    NewApplication as DomainNewApplication, UpdateApplication as DomainUpdateApplication,
};
use crate::domain::types::{ApplicationId, CandidateId, JobId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::applications)]
/// Diesel model for [`crate::domain::application::Application`].
pub struct Application {
    pub id: i32,
    pub candidate_id: i32,
    pub job_id: i32,
    pub status: String,
    pub stage: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::applications)]
pub struct NewApplication {
    pub candidate_id: i32,
    pub job_id: i32,
    pub status: &'static str,
    pub stage: &'static str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::applications)]
pub struct UpdateApplication {
    pub status: Option<&'static str>,
    pub stage: Option<&'static str>,
}

impl TryFrom<Application> for DomainApplication {
    type Error = TypeConstraintError;

    fn try_from(application: Application) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ApplicationId::try_from(application.id)?,
            candidate_id: CandidateId::try_from(application.candidate_id)?,
            job_id: JobId::try_from(application.job_id)?,
            status: application.status.parse::<ApplicationStatus>()?,
            stage: application.stage.parse::<ApplicationStage>()?,
            created_at: application.created_at,
            updated_at: application.updated_at,
        })
    }
}

impl From<&DomainNewApplication> for NewApplication {
    fn from(application: &DomainNewApplication) -> Self {
        Self {
            candidate_id: application.candidate_id.get(),
            job_id: application.job_id.get(),
            status: application.status.as_str(),
            stage: application.stage.as_str(),
        }
    }
}

impl From<&DomainUpdateApplication> for UpdateApplication {
    fn from(update: &DomainUpdateApplication) -> Self {
        Self {
            status: update.status.map(ApplicationStatus::as_str),
            stage: update.stage.map(ApplicationStage::as_str),
        }
    }
}
