use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::PageQuery;
use crate::forms::custom_forms::{
    CreateFormForm, FormListParams, SubmitResponseForm, UpdateFormForm,
};
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::forms as forms_service;

#[get("")]
pub async fn list_forms(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<FormListParams>,
) -> impl Responder {
    reply(
        forms_service::list_forms(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[get("/{form_id}")]
pub async fn show_form(
    form_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        forms_service::get_form(repo.get_ref(), &user, form_id.into_inner()),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn create_form(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateFormForm>,
) -> impl Responder {
    reply(
        forms_service::create_form(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[put("/{form_id}")]
pub async fn update_form(
    form_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateFormForm>,
) -> impl Responder {
    reply(
        forms_service::update_form(repo.get_ref(), &user, form_id.into_inner(), form),
        StatusCode::OK,
    )
}

#[delete("/{form_id}")]
pub async fn delete_form(
    form_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(forms_service::delete_form(
        repo.get_ref(),
        &user,
        form_id.into_inner(),
    ))
}

#[post("/{form_id}/responses")]
pub async fn submit_response(
    form_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(submission): web::Json<SubmitResponseForm>,
) -> impl Responder {
    reply(
        forms_service::submit_response(repo.get_ref(), &user, form_id.into_inner(), submission),
        StatusCode::CREATED,
    )
}

#[get("/{form_id}/responses")]
pub async fn list_responses(
    form_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    page: web::Query<PageQuery>,
) -> impl Responder {
    reply(
        forms_service::list_responses(repo.get_ref(), &user, form_id.into_inner(), page.into_inner()),
        StatusCode::OK,
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/forms")
            .service(list_forms)
            .service(show_form)
            .service(create_form)
            .service(update_form)
            .service(delete_form)
            .service(submit_response)
            .service(list_responses),
    );
}
