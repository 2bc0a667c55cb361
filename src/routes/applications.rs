use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::applications::{
    ApplicationListParams, CreateApplicationForm, UpdateStageForm, UpdateStatusForm,
};
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::applications as applications_service;

#[get("")]
pub async fn list_applications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ApplicationListParams>,
) -> impl Responder {
    reply(
        applications_service::list_applications(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[get("/stats")]
pub async fn application_stats(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        applications_service::application_stats(repo.get_ref(), &user),
        StatusCode::OK,
    )
}

#[get("/{application_id}")]
pub async fn show_application(
    application_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        applications_service::get_application(repo.get_ref(), &user, application_id.into_inner()),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn create_application(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateApplicationForm>,
) -> impl Responder {
    reply(
        applications_service::create_application(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[patch("/{application_id}/status")]
pub async fn update_status(
    application_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateStatusForm>,
) -> impl Responder {
    reply(
        applications_service::update_status(
            repo.get_ref(),
            &user,
            application_id.into_inner(),
            form,
        ),
        StatusCode::OK,
    )
}

#[patch("/{application_id}/stage")]
pub async fn update_stage(
    application_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateStageForm>,
) -> impl Responder {
    reply(
        applications_service::update_stage(repo.get_ref(), &user, application_id.into_inner(), form),
        StatusCode::OK,
    )
}

#[delete("/{application_id}")]
pub async fn delete_application(
    application_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(applications_service::delete_application(
        repo.get_ref(),
        &user,
        application_id.into_inner(),
    ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/applications")
            .service(list_applications)
            .service(application_stats)
            .service(show_application)
            .service(create_application)
            .service(update_status)
            .service(update_stage)
            .service(delete_application),
    );
}
