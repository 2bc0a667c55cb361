//! Application pipeline management for HR.

use std::collections::BTreeMap;

use crate::domain::application::{
    Application, ApplicationStage, ApplicationStatus, NewApplication, UpdateApplication,
};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::notification::{NewNotification, NotificationType};
use crate::domain::types::{ApplicationId, HubId};
use crate::domain::user::HR_ROLES;
use crate::dto::CandidateSummary;
use crate::dto::applications::{ApplicationDetail, ApplicationListItem, ApplicationStats};
use crate::dto::candidates::JobSummary;
use crate::dto::notes::NoteView;
use crate::forms::applications::{
    ApplicationListParams, CreateApplicationForm, UpdateStageForm, UpdateStatusForm,
};
use crate::pagination::Paginated;
use crate::repository::{
    ApplicationReader, ApplicationWriter, CandidateReader, FormReader, InterviewReader, JobReader,
    NoteListQuery, NoteReader, NotificationWriter, UserReader,
};
use crate::services::candidates::interviews_with_participants;
use crate::services::notes::note_authors;
use crate::services::{ServiceError, ServiceResult, ensure_role, notify};

fn load_application<R>(repo: &R, id: i32, hub_id: HubId) -> ServiceResult<Application>
where
    R: ApplicationReader + ?Sized,
{
    repo.get_application_by_id(ApplicationId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_applications<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ApplicationListParams,
) -> ServiceResult<Paginated<ApplicationListItem>>
where
    R: ApplicationReader + CandidateReader + JobReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let query = params.into_query(hub_id)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, applications) = repo.list_applications(query).map_err(|err| {
        log::error!("Failed to list applications: {err}");
        err
    })?;

    let items = applications
        .into_iter()
        .map(|application| {
            let candidate = repo.get_candidate_by_id(application.candidate_id, hub_id)?;
            let job = repo.get_job_by_id(application.job_id, hub_id)?;
            Ok(ApplicationListItem {
                candidate: candidate.as_ref().map(CandidateSummary::from),
                job: job.as_ref().map(JobSummary::from),
                application,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(items, total, pagination))
}

/// An application with its candidate, job, form answers, notes and interviews.
pub fn get_application<R>(
    repo: &R,
    user: &AuthenticatedUser,
    application_id: i32,
) -> ServiceResult<ApplicationDetail>
where
    R: ApplicationReader
        + CandidateReader
        + JobReader
        + FormReader
        + NoteReader
        + InterviewReader
        + UserReader
        + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let application = load_application(repo, application_id, hub_id)?;

    let candidate = repo
        .get_candidate_by_id(application.candidate_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let job = repo
        .get_job_by_id(application.job_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let form_response = repo.get_application_form_response(application.id)?;

    let notes =
        repo.list_notes(NoteListQuery::new(candidate.id).application(application.id))?;
    let authors = note_authors(repo, &notes, hub_id)?;
    let interviews = interviews_with_participants(repo, &application)?;

    Ok(ApplicationDetail {
        application,
        candidate,
        job,
        form_response,
        notes: NoteView::with_authors(notes, &authors),
        interviews,
    })
}

/// Creates an application on behalf of a candidate. The pair must be new.
pub fn create_application<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateApplicationForm,
) -> ServiceResult<Application>
where
    R: ApplicationReader + ApplicationWriter + CandidateReader + JobReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let new_application = NewApplication::try_from(form)?;

    repo.get_candidate_by_id(new_application.candidate_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    repo.get_job_by_id(new_application.job_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if repo
        .find_application(new_application.candidate_id, new_application.job_id)?
        .is_some()
    {
        return Err(ServiceError::Conflict(
            "Application already exists for this candidate and job".to_string(),
        ));
    }

    let application = repo
        .create_application(&new_application, None)
        .map_err(|err| {
            log::error!("Failed to create application: {err}");
            err
        })?;
    Ok(application)
}

/// Moves an application and tells the candidate about it.
pub fn update_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    application_id: i32,
    form: UpdateStatusForm,
) -> ServiceResult<Application>
where
    R: ApplicationReader + ApplicationWriter + JobReader + NotificationWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let updates = UpdateApplication::try_from(form)?;
    let current = load_application(repo, application_id, hub_id)?;

    let updated = repo
        .update_application(current.id, &updates)
        .map_err(|err| {
            log::error!("Failed to update application {}: {err}", current.id);
            err
        })?;

    let job_title = repo
        .get_job_by_id(updated.job_id, hub_id)?
        .map(|job| job.title.into_inner())
        .unwrap_or_else(|| "a position".to_string());
    notify(
        repo,
        &[NewNotification::for_candidate(
            hub_id,
            updated.candidate_id,
            NotificationType::StatusChanged,
            "Application status updated",
            format!(
                "Your application for {job_title} is now {} ({})",
                updated.status, updated.stage
            ),
        )],
    );

    Ok(updated)
}

pub fn update_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    application_id: i32,
    form: UpdateStageForm,
) -> ServiceResult<Application>
where
    R: ApplicationReader + ApplicationWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let updates = UpdateApplication::try_from(form)?;
    let current = load_application(repo, application_id, user.hub_id()?)?;

    let updated = repo
        .update_application(current.id, &updates)
        .map_err(|err| {
            log::error!("Failed to update application {}: {err}", current.id);
            err
        })?;
    Ok(updated)
}

pub fn delete_application<R>(
    repo: &R,
    user: &AuthenticatedUser,
    application_id: i32,
) -> ServiceResult<()>
where
    R: ApplicationReader + ApplicationWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let current = load_application(repo, application_id, user.hub_id()?)?;

    let deleted = repo.delete_application(current.id).map_err(|err| {
        log::error!("Failed to delete application {}: {err}", current.id);
        err
    })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }
    Ok(())
}

/// Application counts per status and per stage, zero-filled.
pub fn application_stats<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ApplicationStats>
where
    R: ApplicationReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;

    let mut by_status: BTreeMap<&'static str, i64> = ApplicationStatus::ALL
        .iter()
        .map(|status| (status.as_str(), 0))
        .collect();
    for (status, count) in repo.count_applications_by_status(hub_id)? {
        by_status.insert(status.as_str(), count);
    }

    let mut by_stage: BTreeMap<&'static str, i64> = ApplicationStage::ALL
        .iter()
        .map(|stage| (stage.as_str(), 0))
        .collect();
    for (stage, count) in repo.count_applications_by_stage(hub_id)? {
        by_stage.insert(stage.as_str(), count);
    }

    Ok(ApplicationStats {
        total: by_status.values().sum(),
        by_status,
        by_stage,
    })
}
