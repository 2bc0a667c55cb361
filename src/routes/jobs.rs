use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, patch, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::jobs::{CreateJobForm, JobListParams, UpdateJobForm};
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::jobs as jobs_service;

#[get("")]
pub async fn list_jobs(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<JobListParams>,
) -> impl Responder {
    reply(
        jobs_service::list_jobs(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[get("/stats")]
pub async fn job_stats(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    reply(jobs_service::job_stats(repo.get_ref(), &user), StatusCode::OK)
}

#[get("/{job_id}")]
pub async fn show_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        jobs_service::get_job(repo.get_ref(), &user, job_id.into_inner()),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn create_job(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateJobForm>,
) -> impl Responder {
    reply(
        jobs_service::create_job(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[put("/{job_id}")]
pub async fn update_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateJobForm>,
) -> impl Responder {
    reply(
        jobs_service::update_job(repo.get_ref(), &user, job_id.into_inner(), form),
        StatusCode::OK,
    )
}

#[patch("/{job_id}/publish")]
pub async fn publish_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        jobs_service::publish_job(repo.get_ref(), &user, job_id.into_inner()),
        StatusCode::OK,
    )
}

#[patch("/{job_id}/close")]
pub async fn close_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        jobs_service::close_job(repo.get_ref(), &user, job_id.into_inner()),
        StatusCode::OK,
    )
}

#[delete("/{job_id}")]
pub async fn delete_job(
    job_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(jobs_service::delete_job(
        repo.get_ref(),
        &user,
        job_id.into_inner(),
    ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .service(list_jobs)
            .service(job_stats)
            .service(show_job)
            .service(create_job)
            .service(update_job)
            .service(publish_job)
            .service(close_job)
            .service(delete_job),
    );
}
