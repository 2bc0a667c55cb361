//! Domain aggregates exposed by the recruitment service layer.

pub mod application;
pub mod audit_log;
pub mod auth;
pub mod candidate;
pub mod form;
pub mod interview;
pub mod job;
pub mod note;
pub mod notification;
pub mod types;
pub mod user;
