//! Domain models and pure core logic for the PV Monitor backend.

pub mod models;
pub mod services;
