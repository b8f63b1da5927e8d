//! Command handlers

pub mod dnssec;
pub mod log_retention;
pub mod settings;
