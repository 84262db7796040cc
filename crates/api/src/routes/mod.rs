//! HTTP route handlers.

pub mod alerts;
pub mod config;
pub mod devices;
pub mod health;
pub mod maintenance;
pub mod readings;
pub mod reports;
pub mod root;
pub mod status;
