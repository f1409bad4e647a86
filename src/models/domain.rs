use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Student record as persisted in the students table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "studentNumber")]
    pub student_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub gpa: f64,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(rename = "needScore")]
    pub need_score: f64,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Donor record as persisted in the donors table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    #[serde(rename = "donorType")]
    pub donor_type: DonorType,
    #[serde(rename = "preferredCourse", default)]
    pub preferred_course: Option<String>,
    #[serde(rename = "minGpa")]
    pub min_gpa: f64,
    #[serde(rename = "maxAmount")]
    pub max_amount: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "donor_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DonorType {
    Alumni,
    Corporate,
    Ngo,
}

/// Fields accepted when creating or updating a student
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gpa: f64,
    pub course: Option<String>,
    pub need_score: f64,
    pub province: Option<String>,
}

/// Fields accepted when creating or updating a donor
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: String,
    pub donor_type: DonorType,
    pub preferred_course: Option<String>,
    pub min_gpa: f64,
    pub max_amount: Decimal,
}

/// Immutable scoring snapshot of a student
///
/// Built once per scoring call; the constructor normalizes missing and
/// out-of-range inputs so the scorer itself never has to coerce.
#[derive(Debug, Clone)]
pub struct StudentFeatures {
    pub gpa: f64,
    pub course: String,
    pub need_score: f64,
}

impl StudentFeatures {
    pub fn new(gpa: f64, course: Option<&str>, need_score: f64) -> Self {
        Self {
            gpa: clamp_finite(gpa, 0.0, 4.0),
            course: course.map(str::trim).unwrap_or("").to_string(),
            need_score: clamp_finite(need_score, 0.0, 100.0),
        }
    }

    pub fn from_record(student: &Student) -> Self {
        Self::new(student.gpa, student.course.as_deref(), student.need_score)
    }
}

/// Immutable scoring snapshot of a donor
#[derive(Debug, Clone)]
pub struct DonorFeatures {
    pub min_gpa: f64,
    pub preferred_course: String,
    pub donor_type: DonorType,
    pub max_amount: Decimal,
}

impl DonorFeatures {
    pub fn new(
        min_gpa: f64,
        preferred_course: Option<&str>,
        donor_type: DonorType,
        max_amount: Decimal,
    ) -> Self {
        let preferred = preferred_course.map(str::trim).unwrap_or("");
        Self {
            min_gpa: clamp_finite(min_gpa, 0.0, 4.0),
            preferred_course: if preferred.is_empty() {
                "Any".to_string()
            } else {
                preferred.to_string()
            },
            donor_type,
            max_amount,
        }
    }

    pub fn from_record(donor: &Donor) -> Self {
        Self::new(
            donor.min_gpa,
            donor.preferred_course.as_deref(),
            donor.donor_type,
            donor.max_amount,
        )
    }
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}

/// Score and per-term breakdown for one student-donor pair
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub score: f64,
    pub explanation: BTreeMap<String, f64>,
}

/// A qualifying pair produced by the matcher, ready to persist
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub student_id: i64,
    pub donor_id: i64,
    pub score: f64,
    pub explanation: BTreeMap<String, f64>,
}

/// Persisted match row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    #[serde(rename = "studentId")]
    pub student_id: i64,
    #[serde(rename = "donorId")]
    pub donor_id: i64,
    pub score: f64,
    #[serde(rename = "topFeatures")]
    pub top_features: serde_json::Value,
    pub funded: bool,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub gpa: f64,
    pub course: f64,
    pub need: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gpa: 0.4,
            course: 0.4,
            need: 0.2,
        }
    }
}
