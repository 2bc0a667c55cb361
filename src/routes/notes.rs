use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::notes::{CreateNoteForm, NoteListParams, UpdateNoteForm};
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::notes as notes_service;

#[get("/candidate/{candidate_id}")]
pub async fn list_candidate_notes(
    candidate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<NoteListParams>,
) -> impl Responder {
    reply(
        notes_service::list_candidate_notes(
            repo.get_ref(),
            &user,
            candidate_id.into_inner(),
            params.into_inner(),
        ),
        StatusCode::OK,
    )
}

#[post("")]
pub async fn create_note(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateNoteForm>,
) -> impl Responder {
    reply(
        notes_service::create_note(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[put("/{note_id}")]
pub async fn update_note(
    note_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateNoteForm>,
) -> impl Responder {
    reply(
        notes_service::update_note(repo.get_ref(), &user, note_id.into_inner(), form),
        StatusCode::OK,
    )
}

#[delete("/{note_id}")]
pub async fn delete_note(
    note_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(notes_service::delete_note(
        repo.get_ref(),
        &user,
        note_id.into_inner(),
    ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .service(list_candidate_notes)
            .service(create_note)
            .service(update_note)
            .service(delete_note),
    );
}
