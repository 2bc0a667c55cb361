//! Registration, login and token lifecycle.

use chrono::{Duration, Utc};
use validator::Validate;

use crate::auth::{
    ensure_strong_password, expiry_after, generate_refresh_token, hash_password, hash_token,
    issue_access_token, verify_password,
};
use crate::domain::auth::{AuthenticatedUser, NewRefreshToken};
use crate::domain::candidate::NewCandidate;
use crate::domain::types::{CandidateEmail, UserEmail};
use crate::domain::user::{NewUser, SELF_REGISTRATION_ROLES, User, UserRole, UserWithProfile};
use crate::dto::auth::{AccessTokenResponse, AuthResponse, TOKEN_TYPE};
use crate::forms::auth::{ChangePasswordForm, LoginForm, RefreshTokenForm, RegisterForm, RegisterPayload};
use crate::models::config::ServerConfig;
use crate::repository::{RefreshTokenReader, RefreshTokenWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

/// Signs an access token and stores a fresh refresh token for `user`.
fn issue_token_pair<R>(
    repo: &R,
    config: &ServerConfig,
    user: User,
) -> ServiceResult<AuthResponse>
where
    R: UserReader + RefreshTokenWriter + ?Sized,
{
    let now = Utc::now();
    let access_token =
        issue_access_token(&user, &config.secret, config.access_token_ttl_minutes, now)?;
    let refresh_token = generate_refresh_token()?;

    repo.create_refresh_token(&NewRefreshToken {
        user_id: user.id,
        token_hash: hash_token(&refresh_token),
        expires_at: expiry_after(now, Duration::try_days(config.refresh_token_ttl_days))?
            .naive_utc(),
    })
    .map_err(|err| {
        log::error!("Failed to store refresh token: {err}");
        err
    })?;

    let profile = repo.get_profile(user.id)?;

    Ok(AuthResponse {
        user: UserWithProfile { user, profile },
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE,
        expires_in: config.access_token_ttl_minutes.saturating_mul(60),
    })
}

/// Creates a self-registered candidate account and signs it in.
///
/// The user is linked to a candidate record with the same email in the hub.
pub fn register<R>(
    repo: &R,
    config: &ServerConfig,
    form: RegisterForm,
) -> ServiceResult<AuthResponse>
where
    R: UserReader + UserWriter + RefreshTokenWriter + ?Sized,
{
    let payload = RegisterPayload::try_from(form)?;
    ensure_strong_password(&payload.password)?;

    let role = payload.role.unwrap_or(UserRole::Candidate);
    if !SELF_REGISTRATION_ROLES.contains(&role) {
        log::warn!("Rejected self-registration as {role}");
        return Err(ServiceError::Forbidden);
    }

    if repo.get_credentials_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Conflict("User already exists".to_string()));
    }

    let password = hash_password(&payload.password)?;
    let candidate = NewCandidate::new(
        payload.hub_id,
        payload.first_name.clone(),
        payload.last_name.clone(),
        CandidateEmail::from(&payload.email),
        None,
        None,
    );

    let new_user = NewUser::new(
        payload.hub_id,
        payload.email,
        password,
        role,
        payload.first_name,
        payload.last_name,
    );

    let user = repo
        .create_user(&new_user, None, Some(candidate))
        .map_err(|err| {
            log::error!("Failed to register user: {err}");
            err
        })?;

    log::info!("Registered user {} as {}", user.id, user.role);

    issue_token_pair(repo, config, user)
}

/// Verifies credentials and issues a token pair.
pub fn login<R>(repo: &R, config: &ServerConfig, form: LoginForm) -> ServiceResult<AuthResponse>
where
    R: UserReader + UserWriter + RefreshTokenWriter + ?Sized,
{
    form.validate()?;

    let email = UserEmail::new(form.email).map_err(|_| invalid_credentials())?;
    let credentials = repo
        .get_credentials_by_email(&email)?
        .filter(|c| c.user.is_active)
        .ok_or_else(invalid_credentials)?;

    if !verify_password(
        &form.password,
        &credentials.password_hash,
        &credentials.password_salt,
    ) {
        log::warn!("Failed login for user {}", credentials.user.id);
        return Err(invalid_credentials());
    }

    repo.record_login(credentials.user.id)?;

    issue_token_pair(repo, config, credentials.user)
}

/// Exchanges a valid refresh token for a new access token.
pub fn refresh<R>(
    repo: &R,
    config: &ServerConfig,
    form: RefreshTokenForm,
) -> ServiceResult<AccessTokenResponse>
where
    R: RefreshTokenReader + UserReader + ?Sized,
{
    let invalid = || ServiceError::Unauthorized(INVALID_REFRESH_TOKEN.to_string());
    if form.validate().is_err() {
        return Err(invalid());
    }

    let now = Utc::now();
    let stored = repo
        .get_refresh_token(&hash_token(form.refresh_token.trim()))?
        .filter(|token| token.is_usable(now.naive_utc()))
        .ok_or_else(invalid)?;

    let credentials = repo
        .get_credentials_by_id(stored.user_id)?
        .filter(|c| c.user.is_active)
        .ok_or_else(invalid)?;

    let access_token = issue_access_token(
        &credentials.user,
        &config.secret,
        config.access_token_ttl_minutes,
        now,
    )?;

    Ok(AccessTokenResponse {
        access_token,
        token_type: TOKEN_TYPE,
        expires_in: config.access_token_ttl_minutes.saturating_mul(60),
    })
}

/// Revokes the presented refresh token. Unknown tokens are ignored.
pub fn logout<R>(repo: &R, form: RefreshTokenForm) -> ServiceResult<()>
where
    R: RefreshTokenWriter + ?Sized,
{
    form.validate()?;
    let revoked = repo.revoke_refresh_token(&hash_token(form.refresh_token.trim()))?;
    if revoked == 0 {
        log::warn!("Logout with an unknown refresh token");
    }
    Ok(())
}

/// Returns the signed-in user with their profile.
pub fn me<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UserWithProfile>
where
    R: UserReader + ?Sized,
{
    let current = repo
        .get_user_by_id(user.user_id()?, user.hub_id()?)?
        .ok_or(ServiceError::NotFound)?;
    let profile = repo.get_profile(current.id)?;
    Ok(UserWithProfile {
        user: current,
        profile,
    })
}

/// Replaces the password after checking the current one. All refresh tokens are revoked.
pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ChangePasswordForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()?;

    let credentials = repo
        .get_credentials_by_id(user.user_id()?)?
        .ok_or(ServiceError::NotFound)?;

    if !verify_password(
        &form.current_password,
        &credentials.password_hash,
        &credentials.password_salt,
    ) {
        log::warn!("Password change with a wrong current password for user {}", user.sub);
        return Err(ServiceError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    ensure_strong_password(&form.new_password)?;
    let (hash, salt) = hash_password(&form.new_password)?;

    repo.update_password(credentials.user.id, &hash, &salt)
        .map_err(|err| {
            log::error!("Failed to update password: {err}");
            err
        })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::auth::RefreshToken;
    use crate::domain::types::{RefreshTokenId, UserId};
    use crate::domain::user::UserCredentials;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{auth_user, config, ts, user};

    fn register_form(role: Option<&str>) -> RegisterForm {
        RegisterForm {
            email: "new@example.com".into(),
            password: "Str0ng!pass".into(),
            first_name: "New".into(),
            last_name: "Person".into(),
            role: role.map(str::to_string),
            hub_id: 42,
        }
    }

    fn credentials(password: &str, is_active: bool) -> UserCredentials {
        let (password_hash, password_salt) = hash_password(password).unwrap();
        let mut account = user(5, UserRole::HrEmployee);
        account.is_active = is_active;
        UserCredentials {
            user: account,
            password_hash,
            password_salt,
        }
    }

    #[test]
    fn register_candidate_creates_candidate_record() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|new_user, profile, candidate| {
                new_user.role == UserRole::Candidate
                    && profile.is_none()
                    && candidate
                        .as_ref()
                        .is_some_and(|c| c.email.as_str() == "new@example.com")
            })
            .times(1)
            .returning(|_, _, _| Ok(user(9, UserRole::Candidate)));
        repo.expect_create_refresh_token()
            .times(1)
            .returning(|token| {
                Ok(RefreshToken {
                    id: RefreshTokenId::new(1).unwrap(),
                    user_id: token.user_id,
                    token_hash: token.token_hash.clone(),
                    expires_at: token.expires_at,
                    revoked: false,
                    created_at: ts(),
                })
            });
        repo.expect_get_profile().returning(|_| Ok(None));

        let response = register(&repo, &config(), register_form(None)).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
        assert_eq!(response.refresh_token.len(), 64);
        assert_eq!(response.user.user.id, UserId::new(9).unwrap());
    }

    #[test]
    fn register_rejects_staff_roles() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email().times(0);
        repo.expect_create_user().times(0);

        for role in ["HR_EMPLOYEE", "HIRING_MANAGER", "RECRUITMENT_ADMIN"] {
            let result = register(&repo, &config(), register_form(Some(role)));
            assert!(matches!(result, Err(ServiceError::Forbidden)), "{role}");
        }
    }

    #[test]
    fn register_rejects_weak_password() {
        let mut repo = MockRepository::new();
        repo.expect_create_user().times(0);

        let mut form = register_form(None);
        form.password = "password".into();
        assert!(matches!(
            register(&repo, &config(), form),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));
        repo.expect_create_user().times(0);

        assert!(matches!(
            register(&repo, &config(), register_form(None)),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn login_rejects_wrong_password_and_inactive_users() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));
        repo.expect_record_login().times(0);

        let result = login(
            &repo,
            &config(),
            LoginForm {
                email: "user5@example.com".into(),
                password: "wrong".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized(m)) if m == "Invalid credentials"));

        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", false))));
        let result = login(
            &repo,
            &config(),
            LoginForm {
                email: "user5@example.com".into(),
                password: "Str0ng!pass".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn login_records_last_login() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));
        repo.expect_record_login()
            .withf(|id| *id == UserId::new(5).unwrap())
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_create_refresh_token().returning(|token| {
            Ok(RefreshToken {
                id: RefreshTokenId::new(1).unwrap(),
                user_id: token.user_id,
                token_hash: token.token_hash.clone(),
                expires_at: token.expires_at,
                revoked: false,
                created_at: ts(),
            })
        });
        repo.expect_get_profile().returning(|_| Ok(None));

        let response = login(
            &repo,
            &config(),
            LoginForm {
                email: "USER5@example.com".into(),
                password: "Str0ng!pass".into(),
            },
        )
        .unwrap();
        assert!(!response.access_token.is_empty());
    }

    #[test]
    fn refresh_rejects_revoked_tokens() {
        let mut repo = MockRepository::new();
        repo.expect_get_refresh_token().returning(|hash| {
            Ok(Some(RefreshToken {
                id: RefreshTokenId::new(1).unwrap(),
                user_id: UserId::new(5).unwrap(),
                token_hash: hash.to_string(),
                expires_at: (Utc::now() + Duration::days(1)).naive_utc(),
                revoked: true,
                created_at: ts(),
            }))
        });
        repo.expect_get_credentials_by_id().times(0);

        let result = refresh(
            &repo,
            &config(),
            RefreshTokenForm {
                refresh_token: "abc".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn refresh_issues_access_token() {
        let mut repo = MockRepository::new();
        repo.expect_get_refresh_token()
            .withf(|hash| hash == hash_token("abc"))
            .returning(|hash| {
                Ok(Some(RefreshToken {
                    id: RefreshTokenId::new(1).unwrap(),
                    user_id: UserId::new(5).unwrap(),
                    token_hash: hash.to_string(),
                    expires_at: (Utc::now() + Duration::days(1)).naive_utc(),
                    revoked: false,
                    created_at: ts(),
                }))
            });
        repo.expect_get_credentials_by_id()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));

        let response = refresh(
            &repo,
            &config(),
            RefreshTokenForm {
                refresh_token: "abc".into(),
            },
        )
        .unwrap();
        let claims = crate::auth::decode_access_token(&response.access_token, "test-secret").unwrap();
        assert_eq!(claims.sub, "5");
    }

    #[test]
    fn logout_revokes_by_hash() {
        let mut repo = MockRepository::new();
        repo.expect_revoke_refresh_token()
            .withf(|hash| hash == hash_token("abc"))
            .times(1)
            .returning(|_| Ok(1));

        logout(
            &repo,
            RefreshTokenForm {
                refresh_token: "abc".into(),
            },
        )
        .unwrap();
    }

    #[test]
    fn change_password_requires_current_password() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_id()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));
        repo.expect_update_password().times(0);

        let result = change_password(
            &repo,
            &auth_user(5, UserRole::HrEmployee),
            ChangePasswordForm {
                current_password: "wrong".into(),
                new_password: "N3w!password".into(),
            },
        );
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn change_password_updates_hash() {
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_id()
            .returning(|_| Ok(Some(credentials("Str0ng!pass", true))));
        repo.expect_update_password()
            .withf(|id, hash, salt| {
                *id == UserId::new(5).unwrap() && verify_password("N3w!password", hash, salt)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        change_password(
            &repo,
            &auth_user(5, UserRole::HrEmployee),
            ChangePasswordForm {
                current_password: "Str0ng!pass".into(),
                new_password: "N3w!password".into(),
            },
        )
        .unwrap();
    }

    #[test]
    fn me_returns_not_found_for_deleted_user() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            me(&repo, &auth_user(5, UserRole::HrEmployee)),
            Err(ServiceError::NotFound)
        ));
    }
}
