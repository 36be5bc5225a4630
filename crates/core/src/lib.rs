//! Core building blocks for the chattrace service: request-scoped context,
//! log formatting, configuration, errors, and process lifecycle.

pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod log_format;
