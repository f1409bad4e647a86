//! Bursary Match - donor-student matching service for FundForward
//!
//! This library provides the compatibility scoring engine used to pair
//! student aid-seekers with donors: a deterministic, explainable scorer
//! applied to single pairs on demand, to the full students x donors cross
//! product, or reactively when a student or donor record changes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_compatibility, Matcher, DEFAULT_MIN_THRESHOLD};
pub use models::{
    Donor, DonorFeatures, DonorType, MatchCandidate, MatchOutcome, MatchRecord, ScoringWeights,
    Student, StudentFeatures,
};
