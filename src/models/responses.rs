use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::{Donor, MatchRecord, Student};

/// Response for the single-pair scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScoreResponse {
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    pub explanation: BTreeMap<String, f64>,
}

/// Response for the full regeneration endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateResponse {
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
}

/// Persisted matches for one student or donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchRecord>,
    pub count: usize,
}

/// One entry in a donor's candidate shortlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: i64,
    #[serde(rename = "studentNumber")]
    pub student_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub course: Option<String>,
    pub gpa: f64,
    #[serde(rename = "needScore")]
    pub need_score: f64,
}

impl From<&Student> for CandidateSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            student_number: student.student_number.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            course: student.course.clone(),
            gpa: student.gpa,
            need_score: student.need_score,
        }
    }
}

/// Response for the donor candidate shortlist endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateListResponse {
    #[serde(rename = "donorId")]
    pub donor_id: i64,
    pub candidates: Vec<CandidateSummary>,
    pub count: usize,
}

/// Response after a student save plus reactive re-score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSavedResponse {
    pub student: Student,
    #[serde(rename = "matchesUpserted")]
    pub matches_upserted: usize,
    #[serde(rename = "matchesRemoved")]
    pub matches_removed: usize,
}

/// Response after a donor save plus reactive re-score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorSavedResponse {
    pub donor: Donor,
    #[serde(rename = "matchesUpserted")]
    pub matches_upserted: usize,
    #[serde(rename = "matchesRemoved")]
    pub matches_removed: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
