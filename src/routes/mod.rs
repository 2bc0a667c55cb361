//! HTTP handlers. Each handler extracts its input, calls one service function
//! and turns the result into a JSON response.

use actix_multipart::MultipartError;
use actix_web::error::{InternalError, PayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError, get};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::services::{ServiceError, ServiceResult};

pub mod admin;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod forms;
pub mod interviews;
pub mod jobs;
pub mod notes;

/// Maps a service failure to its HTTP status and `{ "error": ... }` body.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let status = match &err {
        ServiceError::Validation(_) | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Forbidden => StatusCode::FORBIDDEN,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        ServiceError::Storage(_) => "File storage is unavailable".to_string(),
        other => other.to_string(),
    };

    HttpResponse::build(status).json(json!({ "error": message }))
}

/// Serializes a successful result with `status`, or maps the error.
pub fn reply<T: Serialize>(result: ServiceResult<T>, status: StatusCode) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::build(status).json(body),
        Err(err) => error_response(err),
    }
}

/// `204 No Content` on success.
pub fn no_content(result: ServiceResult<()>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

/// Turns malformed JSON bodies, query strings and paths into a 400 with the
/// usual error body.
pub fn bad_request<E: std::fmt::Display>(err: E, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request to {}: {err}", req.path());
    let response =
        HttpResponse::BadRequest().json(json!({ "error": format!("Invalid request: {err}") }));
    InternalError::from_response(err.to_string(), response).into()
}

/// Rejects unreadable uploads. A body over the multipart limit gets 413.
pub fn multipart_error(err: MultipartError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected upload to {}: {err}", req.path());
    let (status, message) = match &err {
        MultipartError::Payload(PayloadError::Overflow) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Uploaded file is too large".to_string(),
        ),
        other => (other.status_code(), other.to_string()),
    };
    let response = HttpResponse::build(status).json(json!({ "error": message }));
    InternalError::from_response(err, response).into()
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_of(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::TypeConstraint("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Storage("disk".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(err).status(), status);
        }
    }

    #[actix_web::test]
    async fn error_body_carries_message_but_hides_storage_details() {
        let body = body_of(error_response(ServiceError::Conflict(
            "Already applied for this job".into(),
        )))
        .await;
        assert_eq!(body, json!({ "error": "Already applied for this job" }));

        let body = body_of(error_response(ServiceError::Storage("/srv/uploads: EACCES".into()))).await;
        assert_eq!(body, json!({ "error": "File storage is unavailable" }));

        let body = body_of(error_response(ServiceError::Internal)).await;
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[actix_web::test]
    async fn reply_uses_requested_status() {
        let response = reply(Ok(json!({ "id": 1 })), StatusCode::CREATED);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(no_content(Ok(())).status(), StatusCode::NO_CONTENT);
        assert_eq!(
            no_content(Err(ServiceError::NotFound)).status(),
            StatusCode::NOT_FOUND
        );
    }
}
