use actix_web::http::StatusCode;
use actix_web::{Responder, delete, get, patch, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::admin::{
    AuditLogParams, CreateUserForm, NotificationParams, UpdateRoleForm, UserListParams,
};
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::admin as admin_service;

#[get("/stats")]
pub async fn system_stats(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(admin_service::system_stats(repo.get_ref(), &user), StatusCode::OK)
}

#[get("/users")]
pub async fn list_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<UserListParams>,
) -> impl Responder {
    reply(
        admin_service::list_users(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[post("/users")]
pub async fn create_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateUserForm>,
) -> impl Responder {
    reply(
        admin_service::create_user(repo.get_ref(), &user, form),
        StatusCode::CREATED,
    )
}

#[patch("/users/{user_id}/role")]
pub async fn update_user_role(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateRoleForm>,
) -> impl Responder {
    reply(
        admin_service::update_user_role(repo.get_ref(), &user, user_id.into_inner(), form),
        StatusCode::OK,
    )
}

#[delete("/users/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(admin_service::delete_user(
        repo.get_ref(),
        &user,
        user_id.into_inner(),
    ))
}

#[get("/audit-logs")]
pub async fn list_audit_logs(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<AuditLogParams>,
) -> impl Responder {
    reply(
        admin_service::list_audit_logs(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[get("/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<NotificationParams>,
) -> impl Responder {
    reply(
        admin_service::list_notifications(repo.get_ref(), &user, params.into_inner()),
        StatusCode::OK,
    )
}

#[patch("/notifications/{notification_id}/read")]
pub async fn mark_notification_read(
    notification_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    reply(
        admin_service::mark_notification_read(repo.get_ref(), &user, notification_id.into_inner()),
        StatusCode::OK,
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(system_stats)
            .service(list_users)
            .service(create_user)
            .service(update_user_role)
            .service(delete_user)
            .service(list_audit_logs)
            .service(list_notifications)
            .service(mark_notification_read),
    );
}
