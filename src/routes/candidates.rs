use actix_files::NamedFile;
use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::candidates::{
    ApplyForm, CandidateListParams, CreateCandidateForm, UpdateProfileForm, UploadCvForm,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, reply};
use crate::services::ServiceError;
use crate::services::candidates as candidates_service;
use crate::storage::LocalFileStorage;

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        candidates_service::get_profile(repo.get_ref(), &user),
        StatusCode::OK,
    )
}

#[put("/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateProfileForm>,
) -> impl Responder {
    reply(
        candidates_service::update_profile(repo.get_ref(), &user, form),
        StatusCode::OK,
    )
}

#[post("/cv")]
pub async fn upload_cv(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalFileStorage>,
    config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<UploadCvForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => {
            log::error!("Failed to read uploaded CV: {err}");
            return error_response(ServiceError::Internal);
        }
    };

    reply(
        candidates_service::upload_cv(
            repo.get_ref(),
            storage.get_ref(),
            &user,
            upload,
            config.max_upload_bytes(),
        ),
        StatusCode::CREATED,
    )
}

#[get("/cv")]
pub async fn list_cvs(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    reply(
        candidates_service::list_cvs(repo.get_ref(), &user),
        StatusCode::OK,
    )
}

#[get("/cv/{cv_id}/download")]
pub async fn download_cv(
    req: HttpRequest,
    cv_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalFileStorage>,
) -> HttpResponse {
    let (cv, path) = match candidates_service::download_cv(
        repo.get_ref(),
        storage.get_ref(),
        &user,
        cv_id.into_inner(),
    ) {
        Ok(found) => found,
        Err(err) => return error_response(err),
    };

    match NamedFile::open(&path) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(cv.filename)],
            })
            .into_response(&req),
        Err(err) => {
            log::error!("Failed to open CV {}: {err}", path.display());
            error_response(ServiceError::Storage(err.to_string()))
        }
    }
}

#[post("/applications")]
pub async fn apply_for_job(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ApplyForm>,
) -> impl Responder {
    reply(
        candidates_service::apply_for_job(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[get("/applications")]
pub async fn my_applications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        candidates_service::my_applications(repo.get_ref(), &user),
        StatusCode::OK,
    )
}

#[get("")]
pub async fn list_candidates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<CandidateListParams>,
) -> impl Responder {
    reply(
        candidates_service::list_candidates(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[get("/{candidate_id}")]
pub async fn show_candidate(
    candidate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        candidates_service::get_candidate(repo.get_ref(), &user, candidate_id.into_inner()),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn create_candidate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateCandidateForm>,
) -> impl Responder {
    reply(
        candidates_service::create_candidate(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/candidates")
            .service(show_profile)
            .service(update_profile)
            .service(upload_cv)
            .service(list_cvs)
            .service(download_cv)
            .service(apply_for_job)
            .service(my_applications)
            .service(list_candidates)
            .service(show_candidate)
            .service(create_candidate),
    );
}
