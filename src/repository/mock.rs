//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::{
    application::{Application, ApplicationStage, ApplicationStatus, NewApplication, UpdateApplication},
    audit_log::{AuditLog, NewAuditLog},
    auth::{NewRefreshToken, RefreshToken},
    candidate::{Candidate, Cv, NewCandidate, NewCv, UpdateCandidate},
    form::{Form, FormResponse, NewForm, NewFormResponse, UpdateForm},
    interview::{Interview, InterviewParticipant, InterviewResponse, NewInterview, UpdateInterview},
    job::{Job, JobStatus, NewJob, UpdateJob},
    note::{NewNote, Note, UpdateNote},
    notification::{NewNotification, Notification},
    types::{
        ApplicationId, CandidateEmail, CandidateId, CvId, FormId, HubId, InterviewId, JobId,
        NoteId, NotificationId, ParticipantId, UserEmail, UserId,
    },
    user::{NewProfile, NewUser, Profile, User, UserCredentials, UserRole, UserWithProfile},
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, AuditLogListQuery, AuditLogReader,
    AuditLogWriter, CandidateListQuery, CandidateReader, CandidateWriter, FormListQuery,
    FormReader, FormWriter, InterviewListQuery, InterviewReader, InterviewWriter, JobListQuery,
    JobReader, JobWriter, NoteListQuery, NoteReader, NoteWriter, NotificationListQuery,
    NotificationReader, NotificationWriter, Pagination, RefreshTokenReader, RefreshTokenWriter,
    UserListQuery, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
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

    impl UserWriter for Repository {
        fn create_user(
            &self,
            new_user: &NewUser,
            profile: Option<NewProfile>,
            candidate: Option<NewCandidate>,
        ) -> RepositoryResult<User>;
        fn update_user_role(&self, id: UserId, hub_id: HubId, role: UserRole)
        -> RepositoryResult<User>;
        fn record_login(&self, id: UserId) -> RepositoryResult<()>;
        fn update_password(
            &self,
            id: UserId,
            password_hash: &str,
            password_salt: &str,
        ) -> RepositoryResult<()>;
        fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<usize>;
    }

    impl RefreshTokenReader for Repository {
        fn get_refresh_token(&self, token_hash: &str) -> RepositoryResult<Option<RefreshToken>>;
    }

    impl RefreshTokenWriter for Repository {
        fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken>;
        fn revoke_refresh_token(&self, token_hash: &str) -> RepositoryResult<usize>;
    }

    impl CandidateReader for Repository {
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
        fn list_cvs(&self, candidate_id: CandidateId) -> RepositoryResult<Vec<Cv>>;
        fn get_cv(&self, id: CvId, hub_id: HubId) -> RepositoryResult<Option<Cv>>;
    }

    impl CandidateWriter for Repository {
        fn create_candidate(&self, candidate: &NewCandidate) -> RepositoryResult<Candidate>;
        fn update_candidate(
            &self,
            id: CandidateId,
            updates: &UpdateCandidate,
        ) -> RepositoryResult<Candidate>;
        fn create_cv(&self, cv: &NewCv) -> RepositoryResult<Cv>;
    }

    impl JobReader for Repository {
        fn get_job_by_id(&self, id: JobId, hub_id: HubId) -> RepositoryResult<Option<Job>>;
        fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<(Job, i64)>)>;
        fn count_jobs_by_status(&self, hub_id: HubId) -> RepositoryResult<Vec<(JobStatus, i64)>>;
    }

    impl JobWriter for Repository {
        fn create_job(&self, job: &NewJob) -> RepositoryResult<Job>;
        fn update_job(&self, id: JobId, hub_id: HubId, updates: &UpdateJob) -> RepositoryResult<Job>;
        fn delete_job(&self, id: JobId, hub_id: HubId) -> RepositoryResult<usize>;
    }

    impl ApplicationReader for Repository {
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
        fn list_candidate_applications(
            &self,
            candidate_id: CandidateId,
        ) -> RepositoryResult<Vec<(Application, Job)>>;
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

    impl ApplicationWriter for Repository {
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

    impl InterviewReader for Repository {
        fn get_interview_by_id(
            &self,
            id: InterviewId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Interview>>;
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

    impl InterviewWriter for Repository {
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

    impl NoteReader for Repository {
        fn get_note_by_id(&self, id: NoteId, hub_id: HubId) -> RepositoryResult<Option<Note>>;
        fn list_notes(&self, query: NoteListQuery) -> RepositoryResult<Vec<Note>>;
    }

    impl NoteWriter for Repository {
        fn create_note(&self, note: &NewNote) -> RepositoryResult<Note>;
        fn update_note(&self, id: NoteId, updates: &UpdateNote) -> RepositoryResult<Note>;
        fn delete_note(&self, id: NoteId) -> RepositoryResult<usize>;
    }

    impl FormReader for Repository {
        fn get_form_by_id(&self, id: FormId, hub_id: HubId) -> RepositoryResult<Option<Form>>;
        fn get_form_by_job(&self, job_id: JobId) -> RepositoryResult<Option<Form>>;
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

    impl FormWriter for Repository {
        fn create_form(&self, form: &NewForm) -> RepositoryResult<Form>;
        fn update_form(&self, id: FormId, updates: &UpdateForm) -> RepositoryResult<Form>;
        fn create_form_response(&self, response: &NewFormResponse) -> RepositoryResult<FormResponse>;
    }

    impl AuditLogReader for Repository {
        fn list_audit_logs(&self, query: AuditLogListQuery) -> RepositoryResult<(usize, Vec<AuditLog>)>;
    }

    impl AuditLogWriter for Repository {
        fn create_audit_log(&self, log: &NewAuditLog) -> RepositoryResult<AuditLog>;
    }

    impl NotificationReader for Repository {
        fn list_notifications(
            &self,
            query: NotificationListQuery,
        ) -> RepositoryResult<(usize, Vec<Notification>)>;
    }

    impl NotificationWriter for Repository {
        fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize>;
        fn mark_notification_read(
            &self,
            id: NotificationId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Notification>>;
    }
}
