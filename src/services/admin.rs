//! Hub administration: users, statistics, audit trail and notifications.

use std::collections::BTreeMap;

use serde_json::json;

use crate::auth::{ensure_strong_password, hash_password};
use crate::domain::application::ApplicationStatus;
use crate::domain::audit_log::{AuditLog, NewAuditLog};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::candidate::NewCandidate;
use crate::domain::job::JobStatus;
use crate::domain::notification::Notification;
use crate::domain::types::{CandidateEmail, NotificationId, UserId};
use crate::domain::user::{ADMIN_ROLES, NewUser, User, UserRole, UserWithProfile};
use crate::dto::admin::{SystemStats, Totals};
use crate::forms::admin::{
    AuditLogParams, CreateUserForm, CreateUserPayload, NotificationParams, UpdateRoleForm,
    UserListParams,
};
use crate::pagination::Paginated;
use crate::repository::{
    ApplicationReader, AuditLogReader, AuditLogWriter, CandidateReader, InterviewReader,
    JobReader, NotificationReader, NotificationWriter, UserReader, UserWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_role, record_audit};

/// Zero-filled counts keyed by label.
fn counts<T: Copy>(
    all: &[T],
    label: fn(T) -> &'static str,
    found: Vec<(T, i64)>,
) -> BTreeMap<&'static str, i64> {
    let mut map: BTreeMap<&'static str, i64> = all.iter().map(|item| (label(*item), 0)).collect();
    for (item, count) in found {
        map.insert(label(item), count);
    }
    map
}

pub fn system_stats<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SystemStats>
where
    R: UserReader + CandidateReader + JobReader + ApplicationReader + InterviewReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let hub_id = user.hub_id()?;

    let users_by_role = counts(UserRole::ALL, UserRole::as_str, repo.count_users_by_role(hub_id)?);
    let jobs_by_status = counts(JobStatus::ALL, JobStatus::as_str, repo.count_jobs_by_status(hub_id)?);
    let applications_by_status = counts(
        ApplicationStatus::ALL,
        ApplicationStatus::as_str,
        repo.count_applications_by_status(hub_id)?,
    );

    Ok(SystemStats {
        totals: Totals {
            users: users_by_role.values().sum(),
            candidates: repo.count_candidates(hub_id)?,
            jobs: jobs_by_status.values().sum(),
            applications: applications_by_status.values().sum(),
            interviews: repo.count_interviews(hub_id)?,
        },
        users_by_role,
        jobs_by_status,
        applications_by_status,
    })
}

pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: UserListParams,
) -> ServiceResult<Paginated<UserWithProfile>>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let query = params.into_query(user.hub_id()?)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, users) = repo.list_users(query).map_err(|err| {
        log::error!("Failed to list users: {err}");
        err
    })?;
    Ok(Paginated::new(users, total, pagination))
}

/// Creates an account of any role in the admin's hub.
pub fn create_user<R>(repo: &R, user: &AuthenticatedUser, form: CreateUserForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + AuditLogWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let hub_id = user.hub_id()?;
    let payload = CreateUserPayload::try_from(form)?;
    ensure_strong_password(&payload.password)?;

    if repo.get_credentials_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Conflict("User already exists".to_string()));
    }

    let candidate = (payload.role == UserRole::Candidate).then(|| {
        NewCandidate::new(
            hub_id,
            payload.first_name.clone(),
            payload.last_name.clone(),
            CandidateEmail::from(&payload.email),
            payload.profile.phone.clone(),
            None,
        )
    });
    let new_user = NewUser::new(
        hub_id,
        payload.email,
        hash_password(&payload.password)?,
        payload.role,
        payload.first_name,
        payload.last_name,
    );

    let created = repo
        .create_user(&new_user, Some(payload.profile), candidate)
        .map_err(|err| {
            log::error!("Failed to create user: {err}");
            err
        })?;

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            user.user_id()?,
            "CREATE",
            "user",
            Some(created.id.get()),
            json!({ "email": created.email.as_str(), "role": created.role.as_str() }),
        ),
    );

    Ok(created)
}

/// Changes a user's role. Admins cannot demote themselves.
pub fn update_user_role<R>(
    repo: &R,
    user: &AuthenticatedUser,
    target_id: i32,
    form: UpdateRoleForm,
) -> ServiceResult<User>
where
    R: UserWriter + AuditLogWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let hub_id = user.hub_id()?;
    let admin_id = user.user_id()?;
    let target_id = UserId::new(target_id)?;
    let role = UserRole::try_from(form)?;

    if target_id == admin_id && role != UserRole::RecruitmentAdmin {
        return Err(ServiceError::Validation(
            "You cannot remove your own admin role".to_string(),
        ));
    }

    let updated = repo
        .update_user_role(target_id, hub_id, role)
        .map_err(|err| {
            log::error!("Failed to change role of user {target_id}: {err}");
            err
        })?;

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            admin_id,
            "UPDATE_ROLE",
            "user",
            Some(target_id.get()),
            json!({ "role": role.as_str() }),
        ),
    );

    Ok(updated)
}

pub fn delete_user<R>(repo: &R, user: &AuthenticatedUser, target_id: i32) -> ServiceResult<()>
where
    R: UserWriter + AuditLogWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let hub_id = user.hub_id()?;
    let admin_id = user.user_id()?;
    let target_id = UserId::new(target_id)?;

    if target_id == admin_id {
        return Err(ServiceError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    let deleted = repo.delete_user(target_id, hub_id).map_err(|err| {
        log::error!("Failed to delete user {target_id}: {err}");
        err
    })?;
    if deleted == 0 {
        return Err(ServiceError::NotFound);
    }

    record_audit(
        repo,
        NewAuditLog::new(
            hub_id,
            admin_id,
            "DELETE",
            "user",
            Some(target_id.get()),
            json!({}),
        ),
    );

    Ok(())
}

pub fn list_audit_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: AuditLogParams,
) -> ServiceResult<Paginated<AuditLog>>
where
    R: AuditLogReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let query = params.into_query(user.hub_id()?)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, logs) = repo.list_audit_logs(query).map_err(|err| {
        log::error!("Failed to list audit logs: {err}");
        err
    })?;
    Ok(Paginated::new(logs, total, pagination))
}

pub fn list_notifications<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: NotificationParams,
) -> ServiceResult<Paginated<Notification>>
where
    R: NotificationReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    let query = params.into_query(user.hub_id()?)?;
    let pagination = query.pagination.unwrap_or_default();

    let (total, notifications) = repo.list_notifications(query).map_err(|err| {
        log::error!("Failed to list notifications: {err}");
        err
    })?;
    Ok(Paginated::new(notifications, total, pagination))
}

pub fn mark_notification_read<R>(
    repo: &R,
    user: &AuthenticatedUser,
    notification_id: i32,
) -> ServiceResult<Notification>
where
    R: NotificationWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;
    repo.mark_notification_read(NotificationId::new(notification_id)?, user.hub_id()?)?
        .ok_or(ServiceError::NotFound)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::AuditLogId;
    use crate::domain::user::UserCredentials;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{auth_user, hub, ts, user};

    fn admin() -> AuthenticatedUser {
        auth_user(1, UserRole::RecruitmentAdmin)
    }

    fn audit_ok(repo: &mut MockRepository, action: &'static str) {
        repo.expect_create_audit_log()
            .withf(move |entry| entry.action == action && entry.resource == "user")
            .times(1)
            .returning(|entry| {
                Ok(AuditLog {
                    id: AuditLogId::new(1).unwrap(),
                    hub_id: entry.hub_id,
                    user_id: entry.user_id,
                    action: entry.action.clone(),
                    resource: entry.resource.clone(),
                    resource_id: entry.resource_id,
                    details: entry.details.clone(),
                    created_at: ts(),
                })
            });
    }

    fn create_form(role: &str, password: &str) -> CreateUserForm {
        CreateUserForm {
            email: "new@example.com".into(),
            password: password.into(),
            role: role.into(),
            first_name: "New".into(),
            last_name: "Person".into(),
            phone: None,
            avatar: None,
        }
    }

    #[test]
    fn stats_require_admin() {
        let repo = MockRepository::new();
        let result = system_stats(&repo, &auth_user(1, UserRole::HrEmployee));
        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn stats_sum_group_counts() {
        let mut repo = MockRepository::new();
        repo.expect_count_users_by_role()
            .withf(|hub_id| *hub_id == hub())
            .returning(|_| Ok(vec![(UserRole::HrEmployee, 2), (UserRole::Candidate, 5)]));
        repo.expect_count_jobs_by_status()
            .returning(|_| Ok(vec![(JobStatus::Published, 3)]));
        repo.expect_count_applications_by_status()
            .returning(|_| Ok(vec![(ApplicationStatus::Applied, 4), (ApplicationStatus::Hired, 1)]));
        repo.expect_count_candidates().returning(|_| Ok(6));
        repo.expect_count_interviews().returning(|_| Ok(2));

        let stats = system_stats(&repo, &admin()).unwrap();
        assert_eq!(
            stats.totals,
            Totals {
                users: 7,
                candidates: 6,
                jobs: 3,
                applications: 5,
                interviews: 2,
            }
        );
        assert_eq!(stats.users_by_role["HIRING_MANAGER"], 0);
        assert_eq!(stats.jobs_by_status["DRAFT"], 0);
    }

    #[test]
    fn weak_password_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_create_user().times(0);
        let result = create_user(&repo, &admin(), create_form("HR_EMPLOYEE", "password"));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email().returning(|_| {
            Ok(Some(UserCredentials {
                user: user(5, UserRole::HrEmployee),
                password_hash: String::new(),
                password_salt: String::new(),
            }))
        });
        repo.expect_create_user().times(0);

        let result = create_user(&repo, &admin(), create_form("HR_EMPLOYEE", "Str0ng!pass"));
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn created_user_gets_profile_and_audit_entry() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email().returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|new_user, profile, candidate| {
                new_user.role == UserRole::HiringManager
                    && new_user.hub_id == hub()
                    && profile.is_some()
                    && candidate.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(user(8, UserRole::HiringManager)));
        audit_ok(&mut repo, "CREATE");

        let created = create_user(&repo, &admin(), create_form("HIRING_MANAGER", "Str0ng!pass")).unwrap();
        assert_eq!(created.id.get(), 8);
    }

    #[test]
    fn admin_cannot_demote_self() {
        let mut repo = MockRepository::new();
        repo.expect_update_user_role().times(0);
        let result = update_user_role(
            &repo,
            &admin(),
            1,
            UpdateRoleForm {
                role: "HR_EMPLOYEE".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn role_change_is_audited() {
        let mut repo = MockRepository::new();
        repo.expect_update_user_role()
            .withf(|id, _, role| id.get() == 4 && *role == UserRole::HiringManager)
            .returning(|_, _, _| Ok(user(4, UserRole::HiringManager)));
        audit_ok(&mut repo, "UPDATE_ROLE");

        let updated = update_user_role(
            &repo,
            &admin(),
            4,
            UpdateRoleForm {
                role: "HIRING_MANAGER".into(),
            },
        )
        .unwrap();
        assert_eq!(updated.role, UserRole::HiringManager);
    }

    #[test]
    fn admin_cannot_delete_self() {
        let mut repo = MockRepository::new();
        repo.expect_delete_user().times(0);
        assert!(matches!(
            delete_user(&repo, &admin(), 1),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn deleting_missing_user_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_user().returning(|_, _| Ok(0));
        repo.expect_create_audit_log().times(0);
        assert!(matches!(
            delete_user(&repo, &admin(), 4),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn missing_notification_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_mark_notification_read()
            .returning(|_, _| Ok(None));
        assert!(matches!(
            mark_notification_read(&repo, &admin(), 3),
            Err(ServiceError::NotFound)
        ));
    }
}
