//! Repository implementation for applications.
//!
//! Applications carry no hub of their own; they belong to the hub of their job.

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        application::{
            Application, ApplicationStage, ApplicationStatus, NewApplication, UpdateApplication,
        },
        candidate::Candidate,
        form::NewFormResponse,
        job::Job,
        types::{ApplicationId, CandidateId, HubId, JobId},
    },
    models::{
        application::{
            Application as DbApplication, NewApplication as DbNewApplication,
            UpdateApplication as DbUpdateApplication,
        },
        candidate::Candidate as DbCandidate,
        form::NewFormResponse as DbNewFormResponse,
        job::Job as DbJob,
    },
    repository::{
        ApplicationListQuery, ApplicationReader, ApplicationWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{applications, candidates, form_responses, jobs},
};

fn filtered_applications(
    query: &ApplicationListQuery,
) -> applications::BoxedQuery<'static, Sqlite> {
    let hub_jobs = jobs::table
        .filter(jobs::hub_id.eq(query.hub_id.get()))
        .select(jobs::id);
    let mut items = applications::table
        .filter(applications::job_id.eq_any(hub_jobs))
        .into_boxed();
    if let Some(status) = query.status {
        items = items.filter(applications::status.eq(status.as_str()));
    }
    if let Some(stage) = query.stage {
        items = items.filter(applications::stage.eq(stage.as_str()));
    }
    if let Some(job_id) = query.job_id {
        items = items.filter(applications::job_id.eq(job_id.get()));
    }
    if let Some(candidate_id) = query.candidate_id {
        items = items.filter(applications::candidate_id.eq(candidate_id.get()));
    }
    items
}

impl ApplicationReader for DieselRepository {
    fn get_application_by_id(
        &self,
        id: ApplicationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Application>> {
        let mut conn = self.conn()?;
        let db_application = applications::table
            .inner_join(jobs::table)
            .filter(applications::id.eq(id.get()))
            .filter(jobs::hub_id.eq(hub_id.get()))
            .select(applications::all_columns)
            .first::<DbApplication>(&mut conn)
            .optional()?;

        db_application
            .map(Application::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn find_application(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> RepositoryResult<Option<Application>> {
        let mut conn = self.conn()?;
        let db_application = applications::table
            .filter(applications::candidate_id.eq(candidate_id.get()))
            .filter(applications::job_id.eq(job_id.get()))
            .first::<DbApplication>(&mut conn)
            .optional()?;

        db_application
            .map(Application::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<Application>)> {
        let mut conn = self.conn()?;

        let total = filtered_applications(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_applications(&query)
            .order((applications::created_at.desc(), applications::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let applications = items
            .load::<DbApplication>(&mut conn)?
            .into_iter()
            .map(|a| Application::try_from(a).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, applications))
    }

    fn list_candidate_applications(
        &self,
        candidate_id: CandidateId,
    ) -> RepositoryResult<Vec<(Application, Job)>> {
        let mut conn = self.conn()?;
        applications::table
            .inner_join(jobs::table)
            .filter(applications::candidate_id.eq(candidate_id.get()))
            .order((applications::created_at.desc(), applications::id.desc()))
            .select((applications::all_columns, jobs::all_columns))
            .load::<(DbApplication, DbJob)>(&mut conn)?
            .into_iter()
            .map(|(application, job)| Ok((Application::try_from(application)?, Job::try_from(job)?)))
            .collect()
    }

    fn list_job_applications(
        &self,
        job_id: JobId,
    ) -> RepositoryResult<Vec<(Application, Candidate)>> {
        let mut conn = self.conn()?;
        applications::table
            .inner_join(candidates::table)
            .filter(applications::job_id.eq(job_id.get()))
            .order((applications::created_at.desc(), applications::id.desc()))
            .select((applications::all_columns, candidates::all_columns))
            .load::<(DbApplication, DbCandidate)>(&mut conn)?
            .into_iter()
            .map(|(application, candidate)| {
                Ok((
                    Application::try_from(application)?,
                    Candidate::try_from(candidate)?,
                ))
            })
            .collect()
    }

    fn count_applications_by_status(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ApplicationStatus, i64)>> {
        let mut conn = self.conn()?;
        applications::table
            .inner_join(jobs::table)
            .filter(jobs::hub_id.eq(hub_id.get()))
            .group_by(applications::status)
            .select((applications::status, count_star()))
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(status, count)| Ok((status.parse::<ApplicationStatus>()?, count)))
            .collect()
    }

    fn count_applications_by_stage(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ApplicationStage, i64)>> {
        let mut conn = self.conn()?;
        applications::table
            .inner_join(jobs::table)
            .filter(jobs::hub_id.eq(hub_id.get()))
            .group_by(applications::stage)
            .select((applications::stage, count_star()))
            .load::<(String, i64)>(&mut conn)?
            .into_iter()
            .map(|(stage, count)| Ok((stage.parse::<ApplicationStage>()?, count)))
            .collect()
    }
}

impl ApplicationWriter for DieselRepository {
    fn create_application(
        &self,
        application: &NewApplication,
        response: Option<NewFormResponse>,
    ) -> RepositoryResult<Application> {
        let mut conn = self.conn()?;

        conn.transaction::<Application, RepositoryError, _>(|conn| {
            let db_application = diesel::insert_into(applications::table)
                .values(&DbNewApplication::from(application))
                .get_result::<DbApplication>(conn)?;

            if let Some(response) = &response {
                let mut db_response = DbNewFormResponse::from(response);
                db_response.application_id = Some(db_application.id);
                diesel::insert_into(form_responses::table)
                    .values(&db_response)
                    .execute(conn)?;
            }

            Ok(Application::try_from(db_application)?)
        })
    }

    fn update_application(
        &self,
        id: ApplicationId,
        updates: &UpdateApplication,
    ) -> RepositoryResult<Application> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateApplication::from(updates);
        let db_application = diesel::update(applications::table.find(id.get()))
            .set((
                &db_updates,
                applications::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbApplication>(&mut conn)?;

        Ok(Application::try_from(db_application)?)
    }

    fn delete_application(&self, id: ApplicationId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(applications::table.find(id.get())).execute(&mut conn)?;
        Ok(deleted)
    }
}
