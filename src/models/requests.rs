use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::DonorType;

/// Request to score a single student-donor pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchScoreRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: i64,
}

/// Request to create or replace a student record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveStudentRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "student_number", rename = "studentNumber")]
    pub student_number: String,
    #[validate(length(min = 1))]
    #[serde(alias = "first_name", rename = "firstName")]
    pub first_name: String,
    #[validate(length(min = 1))]
    #[serde(alias = "last_name", rename = "lastName")]
    pub last_name: String,
    #[validate(range(min = 0.0, max = 4.0))]
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub course: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(alias = "need_score", rename = "needScore", default)]
    pub need_score: f64,
    #[serde(default)]
    pub province: Option<String>,
}

/// Request to create or replace a donor record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveDonorRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(alias = "donor_type", rename = "donorType")]
    pub donor_type: DonorType,
    #[serde(alias = "preferred_course", rename = "preferredCourse", default)]
    pub preferred_course: Option<String>,
    #[validate(range(min = 0.0, max = 4.0))]
    #[serde(alias = "min_gpa", rename = "minGpa", default)]
    pub min_gpa: f64,
    #[serde(alias = "max_amount", rename = "maxAmount", default)]
    pub max_amount: Decimal,
}

/// Query parameters for the donor candidate shortlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateParams {
    #[serde(default = "default_candidate_limit")]
    pub limit: usize,
}

fn default_candidate_limit() -> usize {
    5
}
