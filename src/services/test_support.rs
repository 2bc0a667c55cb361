//! Fixtures shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::application::{Application, ApplicationStage, ApplicationStatus};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::candidate::Candidate;
use crate::domain::job::{Job, JobStatus};
use crate::domain::types::{
    ApplicationId, CandidateEmail, CandidateId, DepartmentName, HubId, JobId, JobTitle, PersonName,
    UserEmail, UserId,
};
use crate::domain::user::{User, UserRole};
use crate::models::config::ServerConfig;

pub const HUB: i32 = 42;

pub fn ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn hub() -> HubId {
    HubId::new(HUB).unwrap()
}

pub fn config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        database_url: ":memory:".into(),
        secret: "test-secret".into(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        upload_dir: "uploads".into(),
        max_upload_mb: 5,
        cors_origin: None,
    }
}

pub fn auth_user(id: i32, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: id.to_string(),
        hub_id: HUB,
        email: format!("user{id}@example.com"),
        role,
        iat: 0,
        exp: 0,
    }
}

pub fn user(id: i32, role: UserRole) -> User {
    User {
        id: UserId::new(id).unwrap(),
        hub_id: hub(),
        email: UserEmail::new(format!("user{id}@example.com")).unwrap(),
        role,
        first_name: PersonName::new("Test").unwrap(),
        last_name: PersonName::new(format!("User{id}")).unwrap(),
        is_active: true,
        last_login_at: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn candidate(id: i32, email: &str) -> Candidate {
    Candidate {
        id: CandidateId::new(id).unwrap(),
        hub_id: hub(),
        first_name: PersonName::new("Jane").unwrap(),
        last_name: PersonName::new("Doe").unwrap(),
        email: CandidateEmail::new(email).unwrap(),
        phone: None,
        source: None,
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn job(id: i32, status: JobStatus) -> Job {
    Job {
        id: JobId::new(id).unwrap(),
        hub_id: hub(),
        title: JobTitle::new("Backend Engineer").unwrap(),
        description: "Build APIs".into(),
        department: DepartmentName::new("Engineering").unwrap(),
        location: Some("Remote".into()),
        status,
        published_at: (status == JobStatus::Published).then(ts),
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn application(id: i32, candidate_id: i32, job_id: i32) -> Application {
    Application {
        id: ApplicationId::new(id).unwrap(),
        candidate_id: CandidateId::new(candidate_id).unwrap(),
        job_id: JobId::new(job_id).unwrap(),
        status: ApplicationStatus::Applied,
        stage: ApplicationStage::Applied,
        created_at: ts(),
        updated_at: ts(),
    }
}
