use actix_web::http::StatusCode;
use actix_web::{Responder, get, patch, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::interviews::{
    CancelInterviewForm, InterviewListParams, RespondForm, ScheduleInterviewForm,
    UpdateInterviewForm,
};
use crate::repository::DieselRepository;
use crate::routes::reply;
use crate::services::interviews as interviews_service;

#[get("")]
pub async fn list_interviews(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<InterviewListParams>,
) -> impl Responder {
    reply(
        interviews_service::list_interviews(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn schedule_interview(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ScheduleInterviewForm>,
) -> impl Responder {
    reply(
        interviews_service::schedule_interview(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[get("/{interview_id}")]
pub async fn show_interview(
    interview_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        interviews_service::get_interview(repo.get_ref(), &user, interview_id.into_inner()),
        StatusCode::OK,
    )
}

#[put("/{interview_id}")]
pub async fn update_interview(
    interview_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateInterviewForm>,
) -> impl Responder {
    reply(
        interviews_service::update_interview(
            repo.get_ref(),
            &user,
            interview_id.into_inner(),
            form,
        ),
        StatusCode::OK,
    )
}

/// The body is optional; without it the interview is cancelled without a reason.
#[patch("/{interview_id}/cancel")]
pub async fn cancel_interview(
    interview_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: Option<web::Json<CancelInterviewForm>>,
) -> impl Responder {
    let form = form
        .map(web::Json::into_inner)
        .unwrap_or_default();
    reply(
        interviews_service::cancel_interview(
            repo.get_ref(),
            &user,
            interview_id.into_inner(),
            form,
        ),
        StatusCode::OK,
    )
}

#[post("/{interview_id}/respond")]
pub async fn respond(
    interview_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RespondForm>,
) -> impl Responder {
    reply(
        interviews_service::respond(repo.get_ref(), &user, interview_id.into_inner(), form),
        StatusCode::OK,
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/interviews")
            .service(list_interviews)
            .service(schedule_interview)
            .service(show_interview)
            .service(update_interview)
            .service(cancel_interview)
            .service(respond),
    );
}
