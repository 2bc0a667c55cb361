//! Job postings: listing, detail, lifecycle and statistics.

use chrono::Utc;
use serde_json::json;

use crate::domain::audit_log::NewAuditLog;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::job::{JobStatus, UpdateJob};
use crate::domain::types::JobId;
use crate::domain::user::{HR_ROLES, UserRole};
use crate::dto::jobs::{JobApplication, JobDetail, JobListItem, JobStats};
use crate::forms::jobs::{CreateJobForm, JobListParams, UpdateJobForm};
use crate::pagination::Paginated;
use crate::repository::{
    ApplicationReader, AuditLogWriter, FormReader, JobReader, JobWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_role, record_audit};

/// Lists jobs of the user's hub, newest first. Candidates only see published jobs.
pub fn list_jobs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: JobListParams,
) -> ServiceResult<Paginated<JobListItem>>
where
    R: JobReader + ?Sized,
{
    let hub_id = user.hub_id()?;
    let mut query = params.into_query(hub_id)?;
    if user.role == UserRole::Candidate {
        query = query.status(JobStatus::Published);
    }
    let pagination = query.pagination.unwrap_or_default();

    let (total, jobs) = repo.list_jobs(query).map_err(|err| {
        log::error!("Failed to list jobs: {err}");
        err
    })?;

    let items = jobs
        .into_iter()
        .map(|(job, application_count)| JobListItem {
            job,
            application_count,
        })
        .collect();

    Ok(Paginated::new(items, total, pagination))
}

/// Loads a job with its applications and form.
pub fn get_job<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<JobDetail>
where
    R: JobReader + ApplicationReader + FormReader + ?Sized,
{
    let hub_id = user.hub_id()?;
    let job = repo
        .get_job_by_id(JobId::new(job_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let is_candidate = user.role == UserRole::Candidate;
    if is_candidate && !job.is_published() {
        return Err(ServiceError::NotFound);
    }

    let applications = if is_candidate {
        None
    } else {
        Some(
            repo.list_job_applications(job.id)?
                .into_iter()
                .map(|(application, candidate)| JobApplication {
                    application,
                    candidate,
                })
                .collect(),
        )
    };

    let form = repo
        .get_form_by_job(job.id)?
        .filter(|form| form.is_active || !is_candidate);

    Ok(JobDetail {
        job,
        applications,
        form,
    })
}

/// Creates a job posting in the user's hub.
pub fn create_job<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateJobForm,
) -> ServiceResult<JobListItem>
where
    R: JobWriter + AuditLogWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;

    let new_job = form.into_domain(hub_id, Utc::now().naive_utc())?;
    let job = repo.create_job(&new_job).map_err(|err| {
        log::error!("Failed to create job: {err}");
        err
    })?;

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            user.user_id()?,
            "CREATE",
            "job",
            Some(job.id.get()),
            json!({ "title": job.title.as_str(), "status": job.status }),
        ),
    );

    Ok(JobListItem {
        job,
        application_count: 0,
    })
}

/// Applies a partial update. Moving a job to PUBLISHED stamps `published_at`.
pub fn update_job<R>(
    repo: &R,
    user: &AuthenticatedUser,
    job_id: i32,
    form: UpdateJobForm,
) -> ServiceResult<JobListItem>
where
    R: JobReader + JobWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let job_id = JobId::new(job_id)?;

    let current = repo
        .get_job_by_id(job_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let mut updates = UpdateJob::try_from(form)?;
    if updates.status == Some(JobStatus::Published) && !current.is_published() {
        updates.published_at = Some(Utc::now().naive_utc());
    }

    let job = repo.update_job(job_id, hub_id, &updates).map_err(|err| {
        log::error!("Failed to update job {job_id}: {err}");
        err
    })?;

    Ok(JobListItem {
        job,
        application_count: 0,
    })
}

fn change_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    job_id: i32,
    updates: UpdateJob,
) -> ServiceResult<JobListItem>
where
    R: JobReader + JobWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let job_id = JobId::new(job_id)?;

    repo.get_job_by_id(job_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let job = repo.update_job(job_id, hub_id, &updates)?;
    Ok(JobListItem {
        job,
        application_count: 0,
    })
}

pub fn publish_job<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<JobListItem>
where
    R: JobReader + JobWriter + ?Sized,
{
    change_status(repo, user, job_id, UpdateJob::publish(Utc::now().naive_utc()))
}

pub fn close_job<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<JobListItem>
where
    R: JobReader + JobWriter + ?Sized,
{
    change_status(repo, user, job_id, UpdateJob::close())
}

/// Deletes a job together with its applications.
pub fn delete_job<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<()>
where
    R: JobWriter + AuditLogWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let job_id = JobId::new(job_id)?;

    let deleted = repo.delete_job(job_id, hub_id).map_err(|err| {
        log::error!("Failed to delete job {job_id}: {err}");
        err
    })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            user.user_id()?,
            "DELETE",
            "job",
            Some(job_id.get()),
            json!({}),
        ),
    );

    Ok(())
}

/// Job counts per status and the number of applications in the hub.
pub fn job_stats<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<JobStats>
where
    R: JobReader + ApplicationReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;

    let mut by_status = JobStatus::ALL
        .iter()
        .map(|status| (status.as_str(), 0))
        .collect::<std::collections::BTreeMap<_, _>>();
    for (status, count) in repo.count_jobs_by_status(hub_id)? {
        by_status.insert(status.as_str(), count);
    }

    let total_applications = repo
        .count_applications_by_status(hub_id)?
        .into_iter()
        .map(|(_, count)| count)
        .sum();

    Ok(JobStats {
        total: by_status.values().sum(),
        by_status,
        total_applications,
    })
}
