//! Shared utilities and common types for the PV Monitor backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Measurement and timestamp validation logic

pub mod validation;
