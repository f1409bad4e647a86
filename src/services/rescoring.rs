use std::sync::Arc;

use crate::core::Matcher;
use crate::models::{Donor, Student};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Counts from one targeted re-score pass
#[derive(Debug, Clone, Copy)]
pub struct RescoreSummary {
    pub upserted: usize,
    pub removed: usize,
}

/// Re-scoring service invoked from the persistence-write path
///
/// Save handlers call this explicitly after a student or donor write is
/// durable, replacing the implicit post-save hook pattern: the dependency
/// is visible and the service can be exercised directly in tests.
/// Failures propagate to the caller of the save.
pub struct RescoringService {
    postgres: Arc<PostgresClient>,
    matcher: Matcher,
}

impl RescoringService {
    pub fn new(postgres: Arc<PostgresClient>, matcher: Matcher) -> Self {
        Self { postgres, matcher }
    }

    /// Full regeneration: wipe and repopulate the match table
    ///
    /// Computes the new match set off to the side, then swaps it in
    /// atomically. Returns the number of pairs that cleared the threshold
    /// during this run, which equals the number of live match rows after.
    pub async fn regenerate_all(&self) -> Result<usize, PostgresError> {
        let students = self.postgres.list_students().await?;
        let donors = self.postgres.list_donors().await?;

        let run = self.matcher.generate_all(&students, &donors);
        let total = self.postgres.replace_all_matches(&run.candidates).await?;

        tracing::info!(
            "Regenerated matches: {} qualifying of {} pairs scored",
            total,
            run.pairs_scored
        );

        Ok(total)
    }

    /// Re-score one student against every donor
    ///
    /// Upserts qualifying pairs and removes rows for pairs that no longer
    /// clear the threshold, keeping the table consistent with the current
    /// snapshot.
    pub async fn rescore_student(&self, student: &Student) -> Result<RescoreSummary, PostgresError> {
        let donors = self.postgres.list_donors().await?;
        let outcome = self.matcher.rescore_student(student, &donors);

        for candidate in &outcome.qualifying {
            self.postgres.upsert_match(candidate).await?;
        }

        let mut removed = 0;
        for (student_id, donor_id) in &outcome.stale {
            if self.postgres.delete_match(*student_id, *donor_id).await? {
                removed += 1;
            }
        }

        let summary = RescoreSummary {
            upserted: outcome.qualifying.len(),
            removed,
        };

        tracing::debug!(
            "Rescored student {}: {} upserted, {} removed",
            student.id,
            summary.upserted,
            summary.removed
        );

        Ok(summary)
    }

    /// Re-score one donor against every student
    pub async fn rescore_donor(&self, donor: &Donor) -> Result<RescoreSummary, PostgresError> {
        let students = self.postgres.list_students().await?;
        let outcome = self.matcher.rescore_donor(donor, &students);

        for candidate in &outcome.qualifying {
            self.postgres.upsert_match(candidate).await?;
        }

        let mut removed = 0;
        for (student_id, donor_id) in &outcome.stale {
            if self.postgres.delete_match(*student_id, *donor_id).await? {
                removed += 1;
            }
        }

        let summary = RescoreSummary {
            upserted: outcome.qualifying.len(),
            removed,
        };

        tracing::debug!(
            "Rescored donor {}: {} upserted, {} removed",
            donor.id,
            summary.upserted,
            summary.removed
        );

        Ok(summary)
    }
}
