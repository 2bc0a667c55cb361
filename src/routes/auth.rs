use actix_web::http::StatusCode;
use actix_web::{Responder, get, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{ChangePasswordForm, LoginForm, RefreshTokenForm, RegisterForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{no_content, reply};
use crate::services::auth as auth_service;

#[post("/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    reply(
        auth_service::register(repo.get_ref(), config.get_ref(), form),
        StatusCode::CREATED,
    )
}

#[post("/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    reply(
        auth_service::login(repo.get_ref(), config.get_ref(), form),
        StatusCode::OK,
    )
}

#[post("/refresh")]
pub async fn refresh(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    web::Json(form): web::Json<RefreshTokenForm>,
) -> impl Responder {
    reply(
        auth_service::refresh(repo.get_ref(), config.get_ref(), form),
        StatusCode::OK,
    )
}

#[post("/logout")]
pub async fn logout(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RefreshTokenForm>,
) -> impl Responder {
    no_content(auth_service::logout(repo.get_ref(), form))
}

#[get("/me")]
pub async fn me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    reply(auth_service::me(repo.get_ref(), &user), StatusCode::OK)
}

#[post("/change-password")]
pub async fn change_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ChangePasswordForm>,
) -> impl Responder {
    no_content(auth_service::change_password(repo.get_ref(), &user, form))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(refresh)
            .service(logout)
            .service(me)
            .service(change_password),
    );
}
