//! Pure domain services: metric derivation and threshold evaluation.

pub mod derive;
pub mod thresholds;
