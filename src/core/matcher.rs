use crate::core::scoring::calculate_compatibility;
use crate::models::{
    Donor, DonorFeatures, MatchCandidate, MatchOutcome, ScoringWeights, Student, StudentFeatures,
};

/// Minimum score a pair needs to be persisted as a match
pub const DEFAULT_MIN_THRESHOLD: f64 = 0.5;

/// Result of a full batch run
#[derive(Debug)]
pub struct MatchRun {
    pub candidates: Vec<MatchCandidate>,
    pub pairs_scored: usize,
}

/// Result of a targeted per-entity re-score
///
/// `qualifying` pairs are upserted; `stale` pairs fell below the threshold
/// on this pass and any persisted row for them should be removed.
#[derive(Debug)]
pub struct RescoreOutcome {
    pub qualifying: Vec<MatchCandidate>,
    pub stale: Vec<(i64, i64)>,
}

/// Matching orchestrator - scores pairs and applies the threshold gate
///
/// Pure over its inputs: callers hand it entity snapshots and persist the
/// returned candidates themselves.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_threshold: f64,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, min_threshold: f64) -> Self {
        Self {
            weights,
            min_threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    /// Score one student-donor pair
    pub fn score_pair(&self, student: &Student, donor: &Donor) -> MatchOutcome {
        calculate_compatibility(
            &StudentFeatures::from_record(student),
            &DonorFeatures::from_record(donor),
            &self.weights,
        )
    }

    /// Score the full students x donors cross product
    ///
    /// Iterates students outer, donors inner; callers pass snapshots in
    /// primary-key order so reruns over unchanged data produce identical
    /// candidate lists.
    pub fn generate_all(&self, students: &[Student], donors: &[Donor]) -> MatchRun {
        let mut candidates = Vec::new();

        for student in students {
            let features = StudentFeatures::from_record(student);
            for donor in donors {
                let outcome = calculate_compatibility(
                    &features,
                    &DonorFeatures::from_record(donor),
                    &self.weights,
                );
                if outcome.score >= self.min_threshold {
                    candidates.push(MatchCandidate {
                        student_id: student.id,
                        donor_id: donor.id,
                        score: outcome.score,
                        explanation: outcome.explanation,
                    });
                }
            }
        }

        MatchRun {
            candidates,
            pairs_scored: students.len() * donors.len(),
        }
    }

    /// Re-score one student against every donor
    pub fn rescore_student(&self, student: &Student, donors: &[Donor]) -> RescoreOutcome {
        let features = StudentFeatures::from_record(student);
        let mut qualifying = Vec::new();
        let mut stale = Vec::new();

        for donor in donors {
            let outcome = calculate_compatibility(
                &features,
                &DonorFeatures::from_record(donor),
                &self.weights,
            );
            if outcome.score >= self.min_threshold {
                qualifying.push(MatchCandidate {
                    student_id: student.id,
                    donor_id: donor.id,
                    score: outcome.score,
                    explanation: outcome.explanation,
                });
            } else {
                stale.push((student.id, donor.id));
            }
        }

        RescoreOutcome { qualifying, stale }
    }

    /// Re-score one donor against every student
    pub fn rescore_donor(&self, donor: &Donor, students: &[Student]) -> RescoreOutcome {
        let features = DonorFeatures::from_record(donor);
        let mut qualifying = Vec::new();
        let mut stale = Vec::new();

        for student in students {
            let outcome = calculate_compatibility(
                &StudentFeatures::from_record(student),
                &features,
                &self.weights,
            );
            if outcome.score >= self.min_threshold {
                qualifying.push(MatchCandidate {
                    student_id: student.id,
                    donor_id: donor.id,
                    score: outcome.score,
                    explanation: outcome.explanation,
                });
            } else {
                stale.push((student.id, donor.id));
            }
        }

        RescoreOutcome { qualifying, stale }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
