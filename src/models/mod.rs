//! Database models shared across the recruitment repository.

pub mod application;
pub mod audit_log;
pub mod candidate;
#[cfg(feature = "server")]
pub mod config;
pub mod form;
pub mod interview;
pub mod job;
pub mod note;
pub mod notification;
pub mod user;
