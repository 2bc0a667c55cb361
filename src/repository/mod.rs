//! Persistence traits and their Diesel implementation.
//!
//! Every entity exposes a `*Reader` and a `*Writer` trait. Services depend on
//! the traits so they can be exercised against mocks; [`DieselRepository`]
//! implements all of them over a pooled SQLite connection.

use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::{
    application::{Application, ApplicationStage, ApplicationStatus, NewApplication, UpdateApplication},
    audit_log::{AuditLog, NewAuditLog},
    auth::{NewRefreshToken, RefreshToken},
    candidate::{Candidate, Cv, NewCandidate, NewCv, UpdateCandidate},
    form::{Form, FormResponse, NewForm, NewFormResponse, UpdateForm},
    interview::{
        Interview, InterviewParticipant, InterviewResponse, InterviewStatus, NewInterview,
        UpdateInterview,
    },
    job::{Job, JobStatus, NewJob, UpdateJob},
    note::{NewNote, Note, NoteType, UpdateNote},
    notification::{NewNotification, Notification, NotificationType},
    types::{
        ApplicationId, CandidateEmail, CandidateId, CvId, FormId, HubId, InterviewId, JobId,
        NoteId, NotificationId, ParticipantId, UserEmail, UserId,
    },
    user::{NewProfile, NewUser, Profile, User, UserCredentials, UserRole, UserWithProfile},
};
use crate::repository::errors::RepositoryResult;

pub mod application;
pub mod audit_log;
pub mod auth;
pub mod candidate;
pub mod errors;
pub mod form;
pub mod interview;
pub mod job;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod note;
pub mod notification;
pub mod user;

/// Diesel-backed repository shared by all services.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape character used by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `needle` anywhere, with `%`, `_` and the escape
/// character taken literally. Pair with `.escape(LIKE_ESCAPE)`.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Normalizes a requested page: page 0 becomes 1, size is clamped to `1..=100`.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Rows to skip. Pages past the addressable range land beyond the last row.
    pub fn offset(&self) -> i64 {
        let skipped = (self.page - 1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub hub_id: HubId,
    pub role: Option<UserRole>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            role: None,
            pagination: None,
        }
    }

    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct JobListQuery {
    pub hub_id: HubId,
    pub status: Option<JobStatus>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub pagination: Option<Pagination>,
}

impl JobListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            department: None,
            location: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CandidateListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub stage: Option<ApplicationStage>,
    pub job_id: Option<JobId>,
    pub pagination: Option<Pagination>,
}

impl CandidateListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            status: None,
            stage: None,
            job_id: None,
            pagination: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stage(mut self, stage: ApplicationStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Whether the query needs to look at the candidate's applications.
    pub fn filters_applications(&self) -> bool {
        self.status.is_some() || self.stage.is_some() || self.job_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationListQuery {
    pub hub_id: HubId,
    pub status: Option<ApplicationStatus>,
    pub stage: Option<ApplicationStage>,
    pub job_id: Option<JobId>,
    pub candidate_id: Option<CandidateId>,
    pub pagination: Option<Pagination>,
}

impl ApplicationListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            status: None,
            stage: None,
            job_id: None,
            candidate_id: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stage(mut self, stage: ApplicationStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn candidate(mut self, candidate_id: CandidateId) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct InterviewListQuery {
    pub hub_id: HubId,
    pub date: Option<NaiveDate>,
    pub status: Option<InterviewStatus>,
    pub interviewer_id: Option<UserId>,
    pub candidate_id: Option<CandidateId>,
}

impl InterviewListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            date: None,
            status: None,
            interviewer_id: None,
            candidate_id: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn status(mut self, status: InterviewStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn interviewer(mut self, user_id: UserId) -> Self {
        self.interviewer_id = Some(user_id);
        self
    }

    pub fn candidate(mut self, candidate_id: CandidateId) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct NoteListQuery {
    pub candidate_id: CandidateId,
    pub note_type: Option<NoteType>,
    pub application_id: Option<ApplicationId>,
}

impl NoteListQuery {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            note_type: None,
            application_id: None,
        }
    }

    pub fn note_type(mut self, note_type: NoteType) -> Self {
        self.note_type = Some(note_type);
        self
    }

    pub fn application(mut self, application_id: ApplicationId) -> Self {
        self.application_id = Some(application_id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormListQuery {
    pub hub_id: HubId,
    pub job_id: Option<JobId>,
    pub pagination: Option<Pagination>,
}

impl FormListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            job_id: None,
            pagination: None,
        }
    }

    pub fn job(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct AuditLogListQuery {
    pub hub_id: HubId,
    pub resource: Option<String>,
    pub user_id: Option<UserId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl AuditLogListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            resource: None,
            user_id: None,
            start_date: None,
            end_date: None,
            pagination: None,
        }
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Restricts entries to the inclusive day range `[start, end]`.
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotificationListQuery {
    pub hub_id: HubId,
    pub notification_type: Option<NotificationType>,
    pub read: Option<bool>,
    pub user_id: Option<UserId>,
    pub candidate_id: Option<CandidateId>,
    pub pagination: Option<Pagination>,
}

impl NotificationListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            notification_type: None,
            read: None,
            user_id: None,
            candidate_id: None,
            pagination: None,
        }
    }

    pub fn notification_type(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = Some(notification_type);
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = Some(read);
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn candidate(mut self, candidate_id: CandidateId) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
    fn get_users_by_ids(&self, ids: &[UserId], hub_id: HubId) -> RepositoryResult<Vec<User>>;
    fn get_credentials_by_email(
        &self,
        email: &UserEmail,
    ) -> RepositoryResult<Option<UserCredentials>>;
    fn get_credentials_by_id(&self, id: UserId) -> RepositoryResult<Option<UserCredentials>>;
    fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<UserWithProfile>)>;
    fn count_users_by_role(&self, hub_id: HubId) -> RepositoryResult<Vec<(UserRole, i64)>>;
}

pub trait UserWriter {
    /// Creates the user with an optional profile and, for candidates, the
    /// matching candidate record when the hub has none for that email yet.
    fn create_user(
        &self,
        new_user: &NewUser,
        profile: Option<NewProfile>,
        candidate: Option<NewCandidate>,
    ) -> RepositoryResult<User>;
    fn update_user_role(&self, id: UserId, hub_id: HubId, role: UserRole)
    -> RepositoryResult<User>;
    fn record_login(&self, id: UserId) -> RepositoryResult<()>;
    /// Stores new password material and revokes every refresh token of the user.
    fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
        password_salt: &str,
    ) -> RepositoryResult<()>;
    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<usize>;
}

pub trait RefreshTokenReader {
    fn get_refresh_token(&self, token_hash: &str) -> RepositoryResult<Option<RefreshToken>>;
}

pub trait RefreshTokenWriter {
    fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken>;
    fn revoke_refresh_token(&self, token_hash: &str) -> RepositoryResult<usize>;
}

pub trait CandidateReader {
    fn get_candidate_by_id(
        &self,
        id: CandidateId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>>;
    fn get_candidate_by_email(
        &self,
        email: &CandidateEmail,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Candidate>>;
    fn list_candidates(&self, query: CandidateListQuery)
    -> RepositoryResult<(usize, Vec<Candidate>)>;
    fn count_candidates(&self, hub_id: HubId) -> RepositoryResult<i64>;
    /// CVs of a candidate, newest first.
    fn list_cvs(&self, candidate_id: CandidateId) -> RepositoryResult<Vec<Cv>>;
    fn get_cv(&self, id: CvId, hub_id: HubId) -> RepositoryResult<Option<Cv>>;
}

pub trait CandidateWriter {
    fn create_candidate(&self, candidate: &NewCandidate) -> RepositoryResult<Candidate>;
    fn update_candidate(
        &self,
        id: CandidateId,
        updates: &UpdateCandidate,
    ) -> RepositoryResult<Candidate>;
    fn create_cv(&self, cv: &NewCv) -> RepositoryResult<Cv>;
}

pub trait JobReader {
    fn get_job_by_id(&self, id: JobId, hub_id: HubId) -> RepositoryResult<Option<Job>>;
    /// Jobs newest first, each with its application count.
    fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<(Job, i64)>)>;
    fn count_jobs_by_status(&self, hub_id: HubId) -> RepositoryResult<Vec<(JobStatus, i64)>>;
}

pub trait JobWriter {
    fn create_job(&self, job: &NewJob) -> RepositoryResult<Job>;
    fn update_job(&self, id: JobId, hub_id: HubId, updates: &UpdateJob) -> RepositoryResult<Job>;
    fn delete_job(&self, id: JobId, hub_id: HubId) -> RepositoryResult<usize>;
}

pub trait ApplicationReader {
    fn get_application_by_id(
        &self,
        id: ApplicationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Application>>;
    fn find_application(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> RepositoryResult<Option<Application>>;
    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<Application>)>;
    /// Applications of a candidate with their jobs, newest first.
    fn list_candidate_applications(
        &self,
        candidate_id: CandidateId,
    ) -> RepositoryResult<Vec<(Application, Job)>>;
    /// Applications to a job with their candidates, newest first.
    fn list_job_applications(
        &self,
        job_id: JobId,
    ) -> RepositoryResult<Vec<(Application, Candidate)>>;
    fn count_applications_by_status(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ApplicationStatus, i64)>>;
    fn count_applications_by_stage(
        &self,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<(ApplicationStage, i64)>>;
}

pub trait ApplicationWriter {
    /// Creates the application and, when given, its form response in one transaction.
    fn create_application(
        &self,
        application: &NewApplication,
        response: Option<NewFormResponse>,
    ) -> RepositoryResult<Application>;
    fn update_application(
        &self,
        id: ApplicationId,
        updates: &UpdateApplication,
    ) -> RepositoryResult<Application>;
    fn delete_application(&self, id: ApplicationId) -> RepositoryResult<usize>;
}

pub trait InterviewReader {
    fn get_interview_by_id(
        &self,
        id: InterviewId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Interview>>;
    /// Interviews ordered by start time.
    fn list_interviews(&self, query: InterviewListQuery) -> RepositoryResult<Vec<Interview>>;
    fn list_application_interviews(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<Interview>>;
    fn list_participants(
        &self,
        interview_id: InterviewId,
    ) -> RepositoryResult<Vec<InterviewParticipant>>;
    fn count_interviews(&self, hub_id: HubId) -> RepositoryResult<i64>;
}

pub trait InterviewWriter {
    /// Creates the interview together with its participants in one transaction.
    fn create_interview(&self, interview: &NewInterview) -> RepositoryResult<Interview>;
    fn update_interview(
        &self,
        id: InterviewId,
        updates: &UpdateInterview,
    ) -> RepositoryResult<Interview>;
    fn update_participant_response(
        &self,
        id: ParticipantId,
        response: InterviewResponse,
    ) -> RepositoryResult<InterviewParticipant>;
}

pub trait NoteReader {
    fn get_note_by_id(&self, id: NoteId, hub_id: HubId) -> RepositoryResult<Option<Note>>;
    /// Notes newest first.
    fn list_notes(&self, query: NoteListQuery) -> RepositoryResult<Vec<Note>>;
}

pub trait NoteWriter {
    fn create_note(&self, note: &NewNote) -> RepositoryResult<Note>;
    fn update_note(&self, id: NoteId, updates: &UpdateNote) -> RepositoryResult<Note>;
    fn delete_note(&self, id: NoteId) -> RepositoryResult<usize>;
}

pub trait FormReader {
    fn get_form_by_id(&self, id: FormId, hub_id: HubId) -> RepositoryResult<Option<Form>>;
    fn get_form_by_job(&self, job_id: JobId) -> RepositoryResult<Option<Form>>;
    /// Active forms newest first, with the linked job title and response count.
    fn list_forms(
        &self,
        query: FormListQuery,
    ) -> RepositoryResult<(usize, Vec<(Form, Option<String>, i64)>)>;
    fn list_form_responses(
        &self,
        form_id: FormId,
        pagination: Pagination,
    ) -> RepositoryResult<(usize, Vec<FormResponse>)>;
    fn get_application_form_response(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Option<FormResponse>>;
}

pub trait FormWriter {
    fn create_form(&self, form: &NewForm) -> RepositoryResult<Form>;
    fn update_form(&self, id: FormId, updates: &UpdateForm) -> RepositoryResult<Form>;
    fn create_form_response(&self, response: &NewFormResponse) -> RepositoryResult<FormResponse>;
}

pub trait AuditLogReader {
    fn list_audit_logs(&self, query: AuditLogListQuery) -> RepositoryResult<(usize, Vec<AuditLog>)>;
}

pub trait AuditLogWriter {
    fn create_audit_log(&self, log: &NewAuditLog) -> RepositoryResult<AuditLog>;
}

pub trait NotificationReader {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<(usize, Vec<Notification>)>;
}

pub trait NotificationWriter {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize>;
    fn mark_notification_read(
        &self,
        id: NotificationId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Notification>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_normalizes_page_and_limit() {
        let p = Pagination::new(0, 0);
        assert_eq!(p, Pagination { page: 1, per_page: 1 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(3, 500);
        assert_eq!(p.per_page, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 200);
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("eng"), "%eng%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn huge_page_numbers_never_wrap_to_a_negative_offset() {
        let p = Pagination::new(1_000_000_000_000_000_000, 100);
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination::new(100_000_000_000_000_000, 100);
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination::new(usize::MAX, 1);
        assert!(p.offset() > 0);
    }
}
