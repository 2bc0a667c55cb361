//! Candidate self-service and candidate management for HR.

use std::path::PathBuf;

use crate::domain::application::{Application, NewApplication};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::candidate::{Candidate, Cv, NewCv, UpdateCandidate, is_allowed_cv_mime_type};
use crate::domain::form::{NewFormResponse, validate_answers};
use crate::domain::note::{Note, NoteType};
use crate::domain::notification::{NewNotification, NotificationType};
use crate::domain::types::{CandidateEmail, CandidateId, CvId, JobId};
use crate::domain::user::{HR_ROLES, UserRole};
use crate::dto::candidates::{
    CandidateApplication, CandidateDetail, CandidateListItem, CandidateProfile, CvView, JobSummary,
};
use crate::dto::interviews::InterviewWithParticipants;
use crate::dto::notes::NoteView;
use crate::forms::candidates::{
    ApplyForm, CandidateListParams, CreateCandidateForm, CvUpload, UpdateProfileForm,
};
use crate::pagination::Paginated;
use crate::repository::{
    ApplicationReader, ApplicationWriter, CandidateReader, CandidateWriter, FormReader,
    InterviewReader, JobReader, NoteListQuery, NoteReader, NotificationWriter, UserReader,
};
use crate::services::notes::note_authors;
use crate::services::{ServiceError, ServiceResult, ensure_role, notify};
use crate::storage::FileStorage;

const CV_TYPE_MESSAGE: &str = "Only PDF, DOC and DOCX files are allowed";

/// The candidate record of a signed-in candidate, matched by email in their hub.
pub(crate) fn own_candidate<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Candidate>
where
    R: CandidateReader + ?Sized,
{
    ensure_role(user, &[UserRole::Candidate])?;
    let email = CandidateEmail::from(&user.email()?);
    repo.get_candidate_by_email(&email, user.hub_id()?)?
        .ok_or(ServiceError::NotFound)
}

pub(crate) fn interviews_with_participants<R>(
    repo: &R,
    application: &Application,
) -> ServiceResult<Vec<InterviewWithParticipants>>
where
    R: InterviewReader + ?Sized,
{
    repo.list_application_interviews(application.id)?
        .into_iter()
        .map(|interview| {
            let participants = repo.list_participants(interview.id)?;
            Ok(InterviewWithParticipants {
                interview,
                participants,
            })
        })
        .collect()
}

/// Applications of a candidate, newest first, each with its interviews and
/// the notes from `notes` attached to it.
fn candidate_applications<R>(
    repo: &R,
    candidate_id: CandidateId,
    notes: &[Note],
) -> ServiceResult<Vec<CandidateApplication>>
where
    R: ApplicationReader + InterviewReader + ?Sized,
{
    repo.list_candidate_applications(candidate_id)?
        .into_iter()
        .map(|(application, job)| {
            let interviews = interviews_with_participants(repo, &application)?;
            let notes = notes
                .iter()
                .filter(|note| note.application_id == Some(application.id))
                .cloned()
                .collect();
            Ok(CandidateApplication {
                job: JobSummary::from(&job),
                application,
                interviews,
                notes,
            })
        })
        .collect()
}

fn cv_views(cvs: Vec<Cv>) -> Vec<CvView> {
    cvs.into_iter().map(CvView::from).collect()
}

/// The candidate's own record with applications, public notes and CVs.
pub fn get_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CandidateProfile>
where
    R: CandidateReader + ApplicationReader + InterviewReader + NoteReader + ?Sized,
{
    let candidate = own_candidate(repo, user)?;
    let public_notes =
        repo.list_notes(NoteListQuery::new(candidate.id).note_type(NoteType::Public))?;
    let applications = candidate_applications(repo, candidate.id, &public_notes)?;
    let cvs = cv_views(repo.list_cvs(candidate.id)?);

    Ok(CandidateProfile {
        candidate,
        applications,
        cvs,
    })
}

pub fn update_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateProfileForm,
) -> ServiceResult<Candidate>
where
    R: CandidateReader + CandidateWriter + ?Sized,
{
    let candidate = own_candidate(repo, user)?;
    let updates = UpdateCandidate::try_from(form)?;

    let updated = repo.update_candidate(candidate.id, &updates).map_err(|err| {
        log::error!("Failed to update candidate {}: {err}", candidate.id);
        err
    })?;
    Ok(updated)
}

/// Validates and stores an uploaded CV for the signed-in candidate.
pub fn upload_cv<R, S>(
    repo: &R,
    storage: &S,
    user: &AuthenticatedUser,
    upload: CvUpload,
    max_bytes: usize,
) -> ServiceResult<CvView>
where
    R: CandidateReader + CandidateWriter + ?Sized,
    S: FileStorage + ?Sized,
{
    let candidate = own_candidate(repo, user)?;

    if upload.bytes.is_empty() {
        return Err(ServiceError::Validation("No file uploaded".to_string()));
    }
    if !is_allowed_cv_mime_type(&upload.mime_type) {
        return Err(ServiceError::Validation(CV_TYPE_MESSAGE.to_string()));
    }
    if upload.bytes.len() > max_bytes {
        return Err(ServiceError::Validation(format!(
            "File size exceeds the {}MB limit",
            max_bytes / (1024 * 1024)
        )));
    }

    let stored = storage.store(&upload.filename, &upload.mime_type, &upload.bytes)?;

    let new_cv = NewCv {
        candidate_id: candidate.id,
        filename: stored.filename,
        file_key: stored.key.clone(),
        file_size: stored.size as i64,
        mime_type: upload.mime_type,
    };

    match repo.create_cv(&new_cv) {
        Ok(cv) => Ok(CvView::from(cv)),
        Err(err) => {
            log::error!("Failed to record CV for candidate {}: {err}", candidate.id);
            if let Err(cleanup) = storage.delete(&stored.key) {
                log::error!("Failed to remove orphaned CV {}: {cleanup}", stored.key);
            }
            Err(err.into())
        }
    }
}

pub fn list_cvs<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<CvView>>
where
    R: CandidateReader + ?Sized,
{
    let candidate = own_candidate(repo, user)?;
    Ok(cv_views(repo.list_cvs(candidate.id)?))
}

/// Resolves a CV to its stored file. Candidates may only fetch their own CVs.
pub fn download_cv<R, S>(
    repo: &R,
    storage: &S,
    user: &AuthenticatedUser,
    cv_id: i32,
) -> ServiceResult<(Cv, PathBuf)>
where
    R: CandidateReader + ?Sized,
    S: FileStorage + ?Sized,
{
    let own = if user.role == UserRole::Candidate {
        Some(own_candidate(repo, user)?)
    } else {
        ensure_role(user, HR_ROLES)?;
        None
    };

    let cv = repo
        .get_cv(CvId::new(cv_id)?, user.hub_id()?)?
        .ok_or(ServiceError::NotFound)?;
    if own.is_some_and(|candidate| candidate.id != cv.candidate_id) {
        return Err(ServiceError::Forbidden);
    }

    let path = storage.open(&cv.file_key)?;
    Ok((cv, path))
}

/// Applies the signed-in candidate to a published job of their hub.
pub fn apply_for_job<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ApplyForm,
) -> ServiceResult<Application>
where
    R: CandidateReader
        + JobReader
        + ApplicationReader
        + ApplicationWriter
        + FormReader
        + NotificationWriter
        + ?Sized,
{
    let candidate = own_candidate(repo, user)?;
    let hub_id = user.hub_id()?;

    let job = repo
        .get_job_by_id(JobId::new(form.job_id)?, hub_id)?
        .filter(|job| job.is_published())
        .ok_or(ServiceError::NotFound)?;

    if repo.find_application(candidate.id, job.id)?.is_some() {
        return Err(ServiceError::Conflict(
            "Already applied for this job".to_string(),
        ));
    }

    let response = match form.form_response.filter(|answers| !answers.is_empty()) {
        Some(answers) => {
            let job_form = repo
                .get_form_by_job(job.id)?
                .filter(|f| f.is_active)
                .ok_or_else(|| {
                    ServiceError::Validation("This job has no active application form".to_string())
                })?;
            validate_answers(&job_form.fields, &answers)?;
            Some(NewFormResponse {
                form_id: job_form.id,
                application_id: None,
                candidate_id: Some(candidate.id),
                answers,
            })
        }
        None => None,
    };

    let application = repo
        .create_application(&NewApplication::new(candidate.id, job.id, None, None), response)
        .map_err(|err| {
            log::error!("Failed to create application: {err}");
            err
        })?;

    notify(
        repo,
        &[NewNotification::for_candidate(
            hub_id,
            candidate.id,
            NotificationType::ApplicationReceived,
            "Application received",
            format!("{} applied for {}", candidate.full_name(), job.title),
        )],
    );

    Ok(application)
}

pub fn my_applications<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<CandidateApplication>>
where
    R: CandidateReader + ApplicationReader + InterviewReader + NoteReader + ?Sized,
{
    let candidate = own_candidate(repo, user)?;
    let public_notes =
        repo.list_notes(NoteListQuery::new(candidate.id).note_type(NoteType::Public))?;
    candidate_applications(repo, candidate.id, &public_notes)
}

/// Lists candidates of the hub with their application summary and latest CV.
pub fn list_candidates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: CandidateListParams,
) -> ServiceResult<Paginated<CandidateListItem>>
where
    R: CandidateReader + ApplicationReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let query = params.into_query(user.hub_id()?)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, candidates) = repo.list_candidates(query).map_err(|err| {
        log::error!("Failed to list candidates: {err}");
        err
    })?;

    let items = candidates
        .into_iter()
        .map(|candidate| {
            let applications = repo.list_candidate_applications(candidate.id)?;
            let latest_cv = repo.list_cvs(candidate.id)?.into_iter().next();
            Ok(CandidateListItem {
                application_count: applications.len(),
                job_titles: applications
                    .iter()
                    .map(|(_, job)| job.title.as_str().to_string())
                    .collect(),
                latest_cv: latest_cv.map(CvView::from),
                candidate,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(items, total, pagination))
}

/// Full candidate record for HR, including every note with its author.
pub fn get_candidate<R>(
    repo: &R,
    user: &AuthenticatedUser,
    candidate_id: i32,
) -> ServiceResult<CandidateDetail>
where
    R: CandidateReader + ApplicationReader + InterviewReader + NoteReader + UserReader + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let hub_id = user.hub_id()?;

    let candidate = repo
        .get_candidate_by_id(CandidateId::new(candidate_id)?, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let notes = repo.list_notes(NoteListQuery::new(candidate.id))?;
    let applications = candidate_applications(repo, candidate.id, &notes)?;
    let cvs = cv_views(repo.list_cvs(candidate.id)?);

    let authors = note_authors(repo, &notes, hub_id)?;

    Ok(CandidateDetail {
        candidate,
        applications,
        cvs,
        notes: NoteView::with_authors(notes, &authors),
    })
}

pub fn create_candidate<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateCandidateForm,
) -> ServiceResult<Candidate>
where
    R: CandidateReader + CandidateWriter + ?Sized,
{
    ensure_role(user, HR_ROLES)?;
    let new_candidate = form.into_domain(user.hub_id()?)?;

    if repo
        .get_candidate_by_email(&new_candidate.email, new_candidate.hub_id)?
        .is_some()
    {
        return Err(ServiceError::Conflict(
            "Candidate with this email already exists".to_string(),
        ));
    }

    let candidate = repo.create_candidate(&new_candidate).map_err(|err| {
        log::error!("Failed to create candidate: {err}");
        err
    })?;
    Ok(candidate)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::domain::form::{Form, FormField, FormFieldType};
    use crate::domain::job::JobStatus;
    use crate::domain::types::{ApplicationId, FormId, FormTitle, NoteContent, NoteId, UserId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{application, auth_user, candidate, hub, job, ts};
    use crate::storage::{MockFileStorage, StoredFile};

    const EMAIL: &str = "user3@example.com";

    fn candidate_user() -> AuthenticatedUser {
        auth_user(3, UserRole::Candidate)
    }

    fn with_own_candidate(repo: &mut MockRepository) {
        repo.expect_get_candidate_by_email()
            .withf(|email, hub_id| email.as_str() == EMAIL && *hub_id == hub())
            .returning(|_, _| Ok(Some(candidate(10, EMAIL))));
    }

    fn cv(id: i32, candidate_id: i32) -> Cv {
        Cv {
            id: CvId::new(id).unwrap(),
            candidate_id: CandidateId::new(candidate_id).unwrap(),
            filename: "resume.pdf".into(),
            file_key: format!("cv-{id}.pdf"),
            file_size: 1024,
            mime_type: "application/pdf".into(),
            created_at: ts(),
        }
    }

    fn note(id: i32, application_id: Option<i32>, note_type: NoteType) -> Note {
        Note {
            id: NoteId::new(id).unwrap(),
            author_id: UserId::new(1).unwrap(),
            candidate_id: CandidateId::new(10).unwrap(),
            application_id: application_id.map(|id| ApplicationId::new(id).unwrap()),
            content: NoteContent::new("Strong communicator").unwrap(),
            note_type,
            rating: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn pdf(size: usize) -> CvUpload {
        CvUpload {
            filename: "resume.pdf".into(),
            mime_type: "application/pdf".into(),
            bytes: vec![b'%'; size],
        }
    }

    fn job_form(required: bool) -> Form {
        Form {
            id: FormId::new(4).unwrap(),
            hub_id: hub(),
            job_id: Some(JobId::new(2).unwrap()),
            title: FormTitle::new("Screening").unwrap(),
            description: None,
            fields: vec![FormField {
                id: "years".into(),
                field_type: FormFieldType::Number,
                label: "Years of experience".into(),
                placeholder: None,
                required,
                options: None,
                validation: None,
            }],
            is_active: true,
            created_by: UserId::new(1).unwrap(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn profile_only_includes_public_notes() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_list_notes()
            .withf(|query| query.note_type == Some(NoteType::Public))
            .times(1)
            .returning(|_| Ok(vec![note(1, Some(5), NoteType::Public)]));
        repo.expect_list_candidate_applications()
            .returning(|_| Ok(vec![(application(5, 10, 2), job(2, JobStatus::Published))]));
        repo.expect_list_application_interviews()
            .returning(|_| Ok(vec![]));
        repo.expect_list_cvs().returning(|_| Ok(vec![cv(1, 10)]));

        let profile = get_profile(&repo, &candidate_user()).unwrap();
        assert_eq!(profile.applications.len(), 1);
        assert_eq!(profile.applications[0].notes.len(), 1);
        assert_eq!(profile.applications[0].job.title, "Backend Engineer");
        assert_eq!(profile.cvs[0].download_url, "/api/candidates/cv/1/download");
    }

    #[test]
    fn profile_requires_candidate_role() {
        let repo = MockRepository::new();
        let result = get_profile(&repo, &auth_user(1, UserRole::HrEmployee));
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn profile_without_candidate_record_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_email().returning(|_, _| Ok(None));
        let result = get_profile(&repo, &candidate_user());
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn upload_rejects_disallowed_type() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        let mut storage = MockFileStorage::new();
        storage.expect_store().times(0);

        let upload = CvUpload {
            mime_type: "image/png".into(),
            ..pdf(10)
        };
        let result = upload_cv(&repo, &storage, &candidate_user(), upload, 5 * 1024 * 1024);
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == CV_TYPE_MESSAGE));
    }

    #[test]
    fn upload_rejects_oversized_file() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        let mut storage = MockFileStorage::new();
        storage.expect_store().times(0);

        let result = upload_cv(&repo, &storage, &candidate_user(), pdf(2048), 1024);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn upload_stores_file_and_records_cv() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_create_cv()
            .withf(|new_cv| new_cv.file_key == "cv-abc.pdf" && new_cv.file_size == 10)
            .times(1)
            .returning(|_| Ok(cv(3, 10)));
        let mut storage = MockFileStorage::new();
        storage
            .expect_store()
            .withf(|name, mime, bytes| {
                name == "resume.pdf" && mime == "application/pdf" && bytes.len() == 10
            })
            .times(1)
            .returning(|name, _, bytes| {
                Ok(StoredFile {
                    key: "cv-abc.pdf".into(),
                    filename: name.to_string(),
                    size: bytes.len() as u64,
                })
            });
        storage.expect_delete().times(0);

        let view = upload_cv(&repo, &storage, &candidate_user(), pdf(10), 5 * 1024 * 1024).unwrap();
        assert_eq!(view.cv.id.get(), 3);
    }

    #[test]
    fn failed_cv_record_removes_stored_file() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_create_cv()
            .returning(|_| Err(RepositoryError::Unexpected("disk full".into())));
        let mut storage = MockFileStorage::new();
        storage.expect_store().returning(|name, _, bytes| {
            Ok(StoredFile {
                key: "cv-abc.pdf".into(),
                filename: name.to_string(),
                size: bytes.len() as u64,
            })
        });
        storage
            .expect_delete()
            .withf(|key| key == "cv-abc.pdf")
            .times(1)
            .returning(|_| Ok(()));

        let result = upload_cv(&repo, &storage, &candidate_user(), pdf(10), 5 * 1024 * 1024);
        assert!(matches!(result, Err(ServiceError::Internal)));
    }

    #[test]
    fn candidates_cannot_download_foreign_cv() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_get_cv().returning(|_, _| Ok(Some(cv(1, 99))));
        let mut storage = MockFileStorage::new();
        storage.expect_open().times(0);

        let result = download_cv(&repo, &storage, &candidate_user(), 1);
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn hr_downloads_any_cv_of_the_hub() {
        let mut repo = MockRepository::new();
        repo.expect_get_cv()
            .withf(|id, hub_id| id.get() == 1 && *hub_id == hub())
            .returning(|_, _| Ok(Some(cv(1, 99))));
        let mut storage = MockFileStorage::new();
        storage
            .expect_open()
            .withf(|key| key == "cv-1.pdf")
            .returning(|key| Ok(std::path::PathBuf::from("/tmp").join(key)));

        let (found, path) =
            download_cv(&repo, &storage, &auth_user(1, UserRole::HrEmployee), 1).unwrap();
        assert_eq!(found.id.get(), 1);
        assert!(path.ends_with("cv-1.pdf"));
    }

    #[test]
    fn hiring_managers_cannot_download_cvs() {
        let repo = MockRepository::new();
        let storage = MockFileStorage::new();
        let result = download_cv(&repo, &storage, &auth_user(1, UserRole::HiringManager), 1);
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn applying_to_unpublished_job_is_not_found() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_get_job_by_id()
            .returning(|_, _| Ok(Some(job(2, JobStatus::Draft))));
        repo.expect_create_application().times(0);

        let result = apply_for_job(
            &repo,
            &candidate_user(),
            ApplyForm {
                job_id: 2,
                form_response: None,
            },
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn applying_twice_is_a_conflict() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_get_job_by_id()
            .returning(|_, _| Ok(Some(job(2, JobStatus::Published))));
        repo.expect_find_application()
            .returning(|_, _| Ok(Some(application(5, 10, 2))));
        repo.expect_create_application().times(0);

        let result = apply_for_job(
            &repo,
            &candidate_user(),
            ApplyForm {
                job_id: 2,
                form_response: None,
            },
        );
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn invalid_form_answers_are_rejected() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_get_job_by_id()
            .returning(|_, _| Ok(Some(job(2, JobStatus::Published))));
        repo.expect_find_application().returning(|_, _| Ok(None));
        repo.expect_get_form_by_job()
            .returning(|_| Ok(Some(job_form(true))));
        repo.expect_create_application().times(0);

        let mut answers = Map::new();
        answers.insert("years".into(), json!("many"));
        let result = apply_for_job(
            &repo,
            &candidate_user(),
            ApplyForm {
                job_id: 2,
                form_response: Some(answers),
            },
        );
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn application_with_answers_notifies() {
        let mut repo = MockRepository::new();
        with_own_candidate(&mut repo);
        repo.expect_get_job_by_id()
            .returning(|_, _| Ok(Some(job(2, JobStatus::Published))));
        repo.expect_find_application().returning(|_, _| Ok(None));
        repo.expect_get_form_by_job()
            .returning(|_| Ok(Some(job_form(true))));
        repo.expect_create_application()
            .withf(|new_app, response| {
                new_app.job_id.get() == 2
                    && response.as_ref().is_some_and(|r| {
                        r.form_id.get() == 4 && r.candidate_id.map(|c| c.get()) == Some(10)
                    })
            })
            .times(1)
            .returning(|_, _| Ok(application(5, 10, 2)));
        repo.expect_create_notifications()
            .withf(|items| {
                items.len() == 1
                    && items[0].notification_type == NotificationType::ApplicationReceived
                    && items[0].message == "Jane Doe applied for Backend Engineer"
            })
            .times(1)
            .returning(|items| Ok(items.len()));

        let mut answers = Map::new();
        answers.insert("years".into(), Value::from(4));
        let created = apply_for_job(
            &repo,
            &candidate_user(),
            ApplyForm {
                job_id: 2,
                form_response: Some(answers),
            },
        )
        .unwrap();
        assert_eq!(created.id.get(), 5);
    }

    #[test]
    fn hr_list_includes_job_titles_and_latest_cv() {
        let mut repo = MockRepository::new();
        repo.expect_list_candidates()
            .withf(|query| query.search.as_deref() == Some("jane"))
            .returning(|_| Ok((1, vec![candidate(10, "jane@example.com")])));
        repo.expect_list_candidate_applications()
            .returning(|_| Ok(vec![(application(5, 10, 2), job(2, JobStatus::Published))]));
        repo.expect_list_cvs()
            .returning(|_| Ok(vec![cv(8, 10), cv(7, 10)]));

        let page = list_candidates(
            &repo,
            &auth_user(1, UserRole::RecruitmentAdmin),
            CandidateListParams {
                search: Some("jane".into()),
                ..CandidateListParams::default()
            },
        )
        .unwrap();
        let item = &page.items[0];
        assert_eq!(item.application_count, 1);
        assert_eq!(item.job_titles, vec!["Backend Engineer".to_string()]);
        assert_eq!(item.latest_cv.as_ref().unwrap().cv.id.get(), 8);
        assert_eq!(page.pagination.limit, 20);
    }

    #[test]
    fn hr_detail_includes_private_notes_with_authors() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_id()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_list_notes()
            .withf(|query| query.note_type.is_none())
            .returning(|_| {
                Ok(vec![
                    note(1, None, NoteType::Private),
                    note(2, Some(5), NoteType::Public),
                ])
            });
        repo.expect_list_candidate_applications()
            .returning(|_| Ok(vec![(application(5, 10, 2), job(2, JobStatus::Published))]));
        repo.expect_list_application_interviews()
            .returning(|_| Ok(vec![]));
        repo.expect_list_cvs().returning(|_| Ok(vec![]));
        repo.expect_get_users_by_ids()
            .withf(|ids, _| ids.len() == 1)
            .returning(|_, _| Ok(vec![crate::services::test_support::user(1, UserRole::HrEmployee)]));

        let detail = get_candidate(&repo, &auth_user(1, UserRole::HrEmployee), 10).unwrap();
        assert_eq!(detail.notes.len(), 2);
        assert!(detail.notes.iter().all(|n| n.author.is_some()));
        assert_eq!(detail.applications[0].notes.len(), 1);
    }

    #[test]
    fn duplicate_candidate_email_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_candidate_by_email()
            .returning(|_, _| Ok(Some(candidate(10, "jane@example.com"))));
        repo.expect_create_candidate().times(0);

        let result = create_candidate(
            &repo,
            &auth_user(1, UserRole::HrEmployee),
            CreateCandidateForm {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane@example.com".into(),
                phone: None,
                source: None,
            },
        );
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }
}
