// Service exports
pub mod postgres;
pub mod rescoring;

pub use postgres::{PostgresClient, PostgresError};
pub use rescoring::{RescoreSummary, RescoringService};
