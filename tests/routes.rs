use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test, web};
use pushkind_hr::auth::hash_password;
use pushkind_hr::configure_app;
use pushkind_hr::domain::types::{HubId, PersonName, UserEmail};
use pushkind_hr::domain::user::{NewProfile, NewUser, UserRole};
use pushkind_hr::models::config::ServerConfig;
use pushkind_hr::repository::{DieselRepository, UserWriter};
use pushkind_hr::routes::not_found;
use pushkind_hr::storage::LocalFileStorage;
use serde_json::{Value, json};
use tempfile::TempDir;

mod common;

const BOUNDARY: &str = "----pushkind-hr-test-boundary";

fn server_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        database_url: String::new(),
        secret: "route-test-secret".into(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        upload_dir: upload_dir.path().display().to_string(),
        max_upload_mb: 1,
        cors_origin: None,
    }
}

macro_rules! test_app {
    ($test_db:expr, $upload_dir:expr) => {{
        let config = server_config(&$upload_dir);
        let max_upload_bytes = config.max_upload_bytes();
        test::init_service(
            App::new()
                .app_data(web::Data::new(DieselRepository::new($test_db.pool())))
                .app_data(web::Data::new(LocalFileStorage::new($upload_dir.path())))
                .app_data(web::Data::new(config))
                .configure(|cfg| configure_app(cfg, max_upload_bytes))
                .default_service(web::to(not_found)),
        )
        .await
    }};
}

fn register_body(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "password": "Str0ng!pass",
        "first_name": "Jane",
        "last_name": "Doe",
        "role": role,
        "hub_id": 1,
    })
}

/// Staff accounts cannot self-register, so they are inserted directly.
fn seed_staff(test_db: &common::TestDb, email: &str, role: UserRole) {
    let repo = DieselRepository::new(test_db.pool());
    let new_user = NewUser::new(
        HubId::new(1).unwrap(),
        UserEmail::new(email).unwrap(),
        hash_password("Str0ng!pass").unwrap(),
        role,
        PersonName::new("Grace").unwrap(),
        PersonName::new("Hopper").unwrap(),
    );
    repo.create_user(&new_user, Some(NewProfile::default()), None)
        .unwrap();
}

fn login_body(email: &str) -> Value {
    json!({ "email": email, "password": "Str0ng!pass" })
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cv\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[actix_web::test]
async fn test_health_and_unknown_routes() {
    let test_db = common::TestDb::new("test_health_and_unknown_routes.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let test_db = common::TestDb::new("test_protected_routes_require_a_valid_token.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/jobs").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Access token required" }));

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_login_and_role_checks() {
    let test_db = common::TestDb::new("test_register_login_and_role_checks.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("jane@example.com", "CANDIDATE"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["role"], "CANDIDATE");
    assert_eq!(body["token_type"], "Bearer");
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("jane@example.com", "CANDIDATE"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    for (email, role) in [
        ("boss@example.com", "RECRUITMENT_ADMIN"),
        ("hr@example.com", "HR_EMPLOYEE"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(email, role))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "jane@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Invalid credentials" }));

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "jane@example.com", "password": "Str0ng!pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "jane@example.com");

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header(bearer(&access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Insufficient permissions" }));

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_malformed_bodies_are_rejected_as_json() {
    let test_db = common::TestDb::new("test_malformed_bodies_are_rejected_as_json.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[actix_web::test]
async fn test_hiring_flow_through_the_api() {
    let test_db = common::TestDb::new("test_hiring_flow_through_the_api.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    seed_staff(&test_db, "hr@example.com", UserRole::HrEmployee);
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(login_body("hr@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let hr_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("jane@example.com", "CANDIDATE"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let candidate_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(bearer(&hr_token))
        .set_json(json!({
            "title": "Backend Engineer",
            "description": "Rust services",
            "department": "Engineering",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let job: Value = test::read_body_json(resp).await;
    assert_eq!(job["status"], "DRAFT");
    let job_id = job["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/candidates/applications")
        .insert_header(bearer(&candidate_token))
        .set_json(json!({ "job_id": job_id }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::patch()
        .uri(&format!("/api/jobs/{job_id}/publish"))
        .insert_header(bearer(&hr_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "PUBLISHED");

    let req = test::TestRequest::post()
        .uri("/api/candidates/applications")
        .insert_header(bearer(&candidate_token))
        .set_json(json!({ "job_id": job_id }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/candidates/applications")
        .insert_header(bearer(&candidate_token))
        .set_json(json!({ "job_id": job_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Already applied for this job" }));

    let req = test::TestRequest::get()
        .uri("/api/applications?status=APPLIED")
        .insert_header(bearer(&hr_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["items"][0]["job"]["title"], "Backend Engineer");

    let req = test::TestRequest::get()
        .uri("/api/applications?status=LIVE")
        .insert_header(bearer(&hr_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/jobs")
        .insert_header(bearer(&candidate_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["items"][0]["application_count"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/jobs/{job_id}"))
        .insert_header(bearer(&candidate_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn test_cv_upload_and_download() {
    let test_db = common::TestDb::new("test_cv_upload_and_download.db");
    let upload_dir = tempfile::tempdir().unwrap();
    let app = test_app!(test_db, upload_dir);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("jane@example.com", "CANDIDATE"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();
    let multipart = format!("multipart/form-data; boundary={BOUNDARY}");

    let req = test::TestRequest::post()
        .uri("/api/candidates/cv")
        .insert_header(bearer(&token))
        .insert_header((CONTENT_TYPE, multipart.clone()))
        .set_payload(multipart_body("notes.txt", "text/plain", b"hello"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/candidates/cv")
        .insert_header(bearer(&token))
        .insert_header((CONTENT_TYPE, multipart.clone()))
        .set_payload(multipart_body("jane.pdf", "application/pdf", b"%PDF-1.4 resume"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let cv: Value = test::read_body_json(resp).await;
    assert_eq!(cv["filename"], "jane.pdf");
    assert_eq!(cv["file_size"], 15);
    let download_url = cv["download_url"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/candidates/cv")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&download_url)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"%PDF-1.4 resume");

    let oversized = vec![b'x'; 3 * 1024 * 1024];
    let req = test::TestRequest::post()
        .uri("/api/candidates/cv")
        .insert_header(bearer(&token))
        .insert_header((CONTENT_TYPE, multipart))
        .set_payload(multipart_body("big.pdf", "application/pdf", &oversized))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::PAYLOAD_TOO_LARGE
    );
}
