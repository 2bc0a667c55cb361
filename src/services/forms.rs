//! Custom application forms and the responses submitted to them.

use serde_json::json;

use crate::domain::audit_log::NewAuditLog;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::form::{Form, FormResponse, NewFormResponse, UpdateForm, validate_answers};
use crate::domain::types::{FormId, HubId};
use crate::domain::user::{HR_ROLES, UserRole};
use crate::dto::forms::FormListItem;
use crate::forms::custom_forms::{CreateFormForm, FormListParams, SubmitResponseForm, UpdateFormForm};
use crate::forms::{DEFAULT_PAGE_SIZE, PageQuery};
use crate::pagination::Paginated;
use crate::repository::{
    ApplicationReader, AuditLogWriter, CandidateReader, FormReader, FormWriter, JobReader,
};
use crate::services::candidates::own_candidate;
use crate::services::{ServiceError, ServiceResult, ensure_role, record_audit};

fn load_form<R>(repo: &R, id: i32, hub_id: HubId) -> ServiceResult<Form>
where
    R: FormReader + ?Sized,
{
    repo.get_form_by_id(FormId::new(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Active forms of the hub with their job title and response count.
pub fn list_forms<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: FormListParams,
) -> ServiceResult<Paginated<FormListItem>>
where
    R: FormReader + ?Sized,
{
    let query = params.into_query(user.hub_id()?)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, forms) = repo.list_forms(query).map_err(|err| {
        log::error!("Failed to list forms: {err}");
        err
    })?;

    let items = forms
        .into_iter()
        .map(|(form, job_title, response_count)| FormListItem {
            form,
            job_title,
            response_count,
        })
        .collect();
    Ok(Paginated::new(items, total, pagination))
}

/// A form of the hub. Candidates only see active forms.
pub fn get_form<R>(repo: &R, user: &AuthenticatedUser, form_id: i32) -> ServiceResult<Form>
where
    R: FormReader + ?Sized,
{
    let form = load_form(repo, form_id, user.hub_id()?)?;
    if user.role == UserRole::Candidate && !form.is_active {
        return Err(ServiceError::NotFound);
    }
    Ok(form)
}

/// Creates a form. A job carries at most one form.
pub fn create_form<R>(repo: &R, user: &AuthenticatedUser, form: CreateFormForm) -> ServiceResult<Form>
where
    R: FormReader + FormWriter + JobReader + AuditLogWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;
    let user_id = user.user_id()?;
    let new_form = form.into_domain(hub_id, user_id)?;

    if let Some(job_id) = new_form.job_id {
        repo.get_job_by_id(job_id, hub_id)?
            .ok_or(ServiceError::NotFound)?;
        if repo.get_form_by_job(job_id)?.is_some() {
            return Err(ServiceError::Conflict(
                "This job already has a form".to_string(),
            ));
        }
    }

    let created = repo.create_form(&new_form).map_err(|err| {
        log::error!("Failed to create form: {err}");
        err
    })?;

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            user_id,
            "CREATE",
            "form",
            Some(created.id.get()),
            json!({ "title": created.title.as_str(), "fields": created.fields.len() }),
        ),
    );

    Ok(created)
}

pub fn update_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form_id: i32,
    form: UpdateFormForm,
) -> ServiceResult<Form>
where
    R: FormReader + FormWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let updates = UpdateForm::try_from(form)?;
    let current = load_form(repo, form_id, user.hub_id()?)?;

    let updated = repo.update_form(current.id, &updates).map_err(|err| {
        log::error!("Failed to update form {}: {err}", current.id);
        err
    })?;
    Ok(updated)
}

/// Deactivates a form. Its responses stay available.
pub fn delete_form<R>(repo: &R, user: &AuthenticatedUser, form_id: i32) -> ServiceResult<()>
where
    R: FormReader + FormWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let current = load_form(repo, form_id, user.hub_id()?)?;

    repo.update_form(current.id, &UpdateForm::deactivate())
        .map_err(|err| {
            log::error!("Failed to deactivate form {}: {err}", current.id);
            err
        })?;
    Ok(())
}

/// Stores answers to an active form after checking them against its fields.
///
/// Candidates always answer for their own record; staff may attach the
/// response to any application or candidate of the hub.
pub fn submit_response<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form_id: i32,
    submission: SubmitResponseForm,
) -> ServiceResult<FormResponse>
where
    R: FormReader + FormWriter + CandidateReader + ApplicationReader + ?Sized,
{
    let hub_id = user.hub_id()?;
    let form = load_form(repo, form_id, hub_id)?;
    if !form.is_active {
        return Err(ServiceError::Validation("Form is not active".to_string()));
    }
    validate_answers(&form.fields, &submission.answers)?;

    let application = match submission.application_id()? {
        Some(id) => Some(
            repo.get_application_by_id(id, hub_id)?
                .ok_or(ServiceError::NotFound)?,
        ),
        None => None,
    };

    let candidate_id = if user.role == UserRole::Candidate {
        let own = own_candidate(repo, user)?;
        if application
            .as_ref()
            .is_some_and(|application| application.candidate_id != own.id)
        {
            return Err(ServiceError::Forbidden);
        }
        Some(own.id)
    } else {
        match submission.candidate_id()? {
            Some(id) => Some(
                repo.get_candidate_by_id(id, hub_id)?
                    .ok_or(ServiceError::NotFound)?
                    .id,
            ),
            None => application.as_ref().map(|application| application.candidate_id),
        }
    };

    let response = NewFormResponse {
        form_id: form.id,
        application_id: application.map(|application| application.id),
        candidate_id,
        answers: submission.answers,
    };

    let created = repo.create_form_response(&response).map_err(|err| {
        log::error!("Failed to store response to form {}: {err}", form.id);
        err
    })?;
    Ok(created)
}

/// Responses to a form, newest first.
pub fn list_responses<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form_id: i32,
    page: PageQuery,
) -> ServiceResult<Paginated<FormResponse>>
where
    R: FormReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let form = load_form(repo, form_id, user.hub_id()?)?;
    let pagination = page.pagination(DEFAULT_PAGE_SIZE);

    let (total, responses) = repo
        .list_form_responses(form.id, pagination)
        .map_err(|err| {
            log::error!("Failed to list responses of form {}: {err}", form.id);
            err
        })?;
    Ok(Paginated::new(responses, total, pagination))
}
