use std::collections::BTreeMap;

use crate::core::filters::{course_matches, meets_gpa_requirement};
use crate::models::{DonorFeatures, MatchOutcome, ScoringWeights, StudentFeatures};

/// Score a student-donor pair (0-1) with a per-term explanation
///
/// Weighted additive model, each term independently gated:
/// - gpa term    (weight 0.4): only when student GPA clears the donor's
///   minimum; contribution scales with GPA normalized against 4.0
/// - course term (weight 0.4): flat contribution when the donor's course
///   preference accepts the student's course
/// - need term   (weight 0.2): unconditional; need score normalized
///   against 100
///
/// The explanation holds exactly the terms that contributed, keyed
/// "gpa_match" / "course_match" / "need_score"; the need term is always
/// present. Values and the total are rounded to 3 decimal places and the
/// total is clamped to 1.0.
pub fn calculate_compatibility(
    student: &StudentFeatures,
    donor: &DonorFeatures,
    weights: &ScoringWeights,
) -> MatchOutcome {
    let mut explanation = BTreeMap::new();
    let mut score = 0.0;

    if meets_gpa_requirement(student, donor) {
        let normalized_gpa = (student.gpa / 4.0).min(1.0);
        let gpa_score = weights.gpa * normalized_gpa;
        score += gpa_score;
        explanation.insert("gpa_match".to_string(), round3(gpa_score));
    }

    if course_matches(&donor.preferred_course, &student.course) {
        score += weights.course;
        explanation.insert("course_match".to_string(), weights.course);
    }

    let need_contribution = weights.need * (student.need_score.min(100.0) / 100.0);
    score += need_contribution;
    explanation.insert("need_score".to_string(), round3(need_contribution));

    MatchOutcome {
        score: round3(score.min(1.0)),
        explanation,
    }
}

/// Round to 3 decimal places
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DonorType;
    use rust_decimal::Decimal;

    fn student(gpa: f64, course: &str, need_score: f64) -> StudentFeatures {
        StudentFeatures::new(gpa, Some(course), need_score)
    }

    fn donor(min_gpa: f64, preferred_course: &str) -> DonorFeatures {
        DonorFeatures::new(
            min_gpa,
            Some(preferred_course),
            DonorType::Alumni,
            Decimal::new(500000, 2),
        )
    }

    #[test]
    fn test_strong_match_with_any_preference() {
        let outcome = calculate_compatibility(
            &student(3.6, "Engineering", 80.0),
            &donor(3.0, "Any"),
            &ScoringWeights::default(),
        );

        assert!((outcome.score - 0.92).abs() < 1e-9);
        assert!((outcome.explanation["gpa_match"] - 0.36).abs() < 1e-9);
        assert!((outcome.explanation["course_match"] - 0.4).abs() < 1e-9);
        assert!((outcome.explanation["need_score"] - 0.16).abs() < 1e-9);
    }

    #[test]
    fn test_gpa_below_minimum_is_gated_out() {
        let outcome = calculate_compatibility(
            &student(2.0, "Commerce", 50.0),
            &donor(3.0, "Commerce"),
            &ScoringWeights::default(),
        );

        assert!((outcome.score - 0.5).abs() < 1e-9);
        assert!(!outcome.explanation.contains_key("gpa_match"));
        assert!((outcome.explanation["course_match"] - 0.4).abs() < 1e-9);
        assert!((outcome.explanation["need_score"] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_course_mismatch_and_zero_need() {
        let outcome = calculate_compatibility(
            &student(3.9, "ICT", 0.0),
            &donor(0.0, "Health"),
            &ScoringWeights::default(),
        );

        assert!((outcome.score - 0.39).abs() < 1e-9);
        assert!(!outcome.explanation.contains_key("course_match"));
        assert!((outcome.explanation["need_score"]).abs() < 1e-9);
    }

    #[test]
    fn test_substring_course_preference() {
        let outcome = calculate_compatibility(
            &student(3.0, "Engineering", 0.0),
            &donor(0.0, "eng"),
            &ScoringWeights::default(),
        );

        assert!(outcome.explanation.contains_key("course_match"));
    }

    #[test]
    fn test_score_clamped_to_one() {
        let weights = ScoringWeights {
            gpa: 0.8,
            course: 0.8,
            need: 0.4,
        };
        let outcome =
            calculate_compatibility(&student(4.0, "Engineering", 100.0), &donor(0.0, "Any"), &weights);

        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_need_term_always_present_and_bounded() {
        for need in [0.0, 5.0, 50.0, 100.0, 250.0] {
            let outcome = calculate_compatibility(
                &student(0.0, "", need),
                &donor(3.5, "Health"),
                &ScoringWeights::default(),
            );
            let contribution = outcome.explanation["need_score"];
            assert!((0.0..=0.2).contains(&contribution));
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let s = student(3.1, "Commerce", 62.0);
        let d = donor(2.5, "commerce");
        let weights = ScoringWeights::default();

        let first = calculate_compatibility(&s, &d, &weights);
        let second = calculate_compatibility(&s, &d, &weights);

        assert_eq!(first, second);
    }
}
