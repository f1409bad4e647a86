use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Donor, MatchCandidate, MatchRecord, NewDonor, NewStudent, Student};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client for students, donors and the persisted match table
///
/// The match table holds at most one row per (student, donor) pair; the
/// unique constraint plus `ON CONFLICT` upserts keep re-scoring idempotent.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    // ---- students ----

    pub async fn get_student(&self, id: i64) -> Result<Student, PostgresError> {
        let query = r#"
            SELECT id, student_number, first_name, last_name, gpa, course, need_score, province, created_at
            FROM students
            WHERE id = $1
        "#;

        sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| map_student(&row))
            .ok_or_else(|| PostgresError::NotFound(format!("student {}", id)))
    }

    /// All students in primary-key order
    pub async fn list_students(&self) -> Result<Vec<Student>, PostgresError> {
        let query = r#"
            SELECT id, student_number, first_name, last_name, gpa, course, need_score, province, created_at
            FROM students
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_student).collect())
    }

    pub async fn insert_student(&self, student: &NewStudent) -> Result<Student, PostgresError> {
        let query = r#"
            INSERT INTO students (student_number, first_name, last_name, gpa, course, need_score, province)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, student_number, first_name, last_name, gpa, course, need_score, province, created_at
        "#;

        let row = sqlx::query(query)
            .bind(&student.student_number)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.gpa)
            .bind(&student.course)
            .bind(student.need_score)
            .bind(&student.province)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_student(&row))
    }

    pub async fn update_student(
        &self,
        id: i64,
        student: &NewStudent,
    ) -> Result<Student, PostgresError> {
        let query = r#"
            UPDATE students
            SET student_number = $1, first_name = $2, last_name = $3, gpa = $4,
                course = $5, need_score = $6, province = $7
            WHERE id = $8
            RETURNING id, student_number, first_name, last_name, gpa, course, need_score, province, created_at
        "#;

        sqlx::query(query)
            .bind(&student.student_number)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.gpa)
            .bind(&student.course)
            .bind(student.need_score)
            .bind(&student.province)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| map_student(&row))
            .ok_or_else(|| PostgresError::NotFound(format!("student {}", id)))
    }

    // ---- donors ----

    pub async fn get_donor(&self, id: i64) -> Result<Donor, PostgresError> {
        let query = r#"
            SELECT id, name, donor_type, preferred_course, min_gpa, max_amount, created_at
            FROM donors
            WHERE id = $1
        "#;

        sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| map_donor(&row))
            .ok_or_else(|| PostgresError::NotFound(format!("donor {}", id)))
    }

    /// All donors in primary-key order
    pub async fn list_donors(&self) -> Result<Vec<Donor>, PostgresError> {
        let query = r#"
            SELECT id, name, donor_type, preferred_course, min_gpa, max_amount, created_at
            FROM donors
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_donor).collect())
    }

    pub async fn insert_donor(&self, donor: &NewDonor) -> Result<Donor, PostgresError> {
        let query = r#"
            INSERT INTO donors (name, donor_type, preferred_course, min_gpa, max_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, donor_type, preferred_course, min_gpa, max_amount, created_at
        "#;

        let row = sqlx::query(query)
            .bind(&donor.name)
            .bind(donor.donor_type)
            .bind(&donor.preferred_course)
            .bind(donor.min_gpa)
            .bind(donor.max_amount)
            .fetch_one(&self.pool)
            .await?;

        Ok(map_donor(&row))
    }

    pub async fn update_donor(&self, id: i64, donor: &NewDonor) -> Result<Donor, PostgresError> {
        let query = r#"
            UPDATE donors
            SET name = $1, donor_type = $2, preferred_course = $3, min_gpa = $4, max_amount = $5
            WHERE id = $6
            RETURNING id, name, donor_type, preferred_course, min_gpa, max_amount, created_at
        "#;

        sqlx::query(query)
            .bind(&donor.name)
            .bind(donor.donor_type)
            .bind(&donor.preferred_course)
            .bind(donor.min_gpa)
            .bind(donor.max_amount)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| map_donor(&row))
            .ok_or_else(|| PostgresError::NotFound(format!("donor {}", id)))
    }

    // ---- matches ----

    /// Insert or refresh the match row for one (student, donor) pair
    ///
    /// On conflict only score and top_features are refreshed; funded and
    /// matched_at keep their original values.
    pub async fn upsert_match(&self, candidate: &MatchCandidate) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO matches (student_id, donor_id, score, top_features)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, donor_id)
            DO UPDATE SET
                score = EXCLUDED.score,
                top_features = EXCLUDED.top_features
        "#;

        let top_features = serde_json::to_value(&candidate.explanation)?;

        sqlx::query(query)
            .bind(candidate.student_id)
            .bind(candidate.donor_id)
            .bind(candidate.score)
            .bind(top_features)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Upserted match {} -> {} (score {})",
            candidate.student_id,
            candidate.donor_id,
            candidate.score
        );

        Ok(())
    }

    /// Remove the match row for one pair, if present
    pub async fn delete_match(
        &self,
        student_id: i64,
        donor_id: i64,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM matches
            WHERE student_id = $1 AND donor_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(student_id)
            .bind(donor_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically replace the entire match table with a fresh candidate set
    ///
    /// The wipe and repopulate run in one transaction so no reader ever
    /// observes the empty window between them.
    pub async fn replace_all_matches(
        &self,
        candidates: &[MatchCandidate],
    ) -> Result<usize, PostgresError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM matches").execute(&mut *tx).await?;

        let insert = r#"
            INSERT INTO matches (student_id, donor_id, score, top_features)
            VALUES ($1, $2, $3, $4)
        "#;

        for candidate in candidates {
            let top_features = serde_json::to_value(&candidate.explanation)?;
            sqlx::query(insert)
                .bind(candidate.student_id)
                .bind(candidate.donor_id)
                .bind(candidate.score)
                .bind(top_features)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Replaced match table with {} rows", candidates.len());

        Ok(candidates.len())
    }

    /// Persisted matches for one student, best score first
    pub async fn matches_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            SELECT id, student_id, donor_id, score, top_features, funded, matched_at
            FROM matches
            WHERE student_id = $1
            ORDER BY score DESC, donor_id
        "#;

        let rows = sqlx::query(query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_match).collect())
    }

    /// Persisted matches for one donor, best score first
    pub async fn matches_for_donor(
        &self,
        donor_id: i64,
    ) -> Result<Vec<MatchRecord>, PostgresError> {
        let query = r#"
            SELECT id, student_id, donor_id, score, top_features, funded, matched_at
            FROM matches
            WHERE donor_id = $1
            ORDER BY score DESC, student_id
        "#;

        let rows = sqlx::query(query)
            .bind(donor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_match).collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn map_student(row: &PgRow) -> Student {
    Student {
        id: row.get("id"),
        student_number: row.get("student_number"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        gpa: row.get("gpa"),
        course: row.get("course"),
        need_score: row.get("need_score"),
        province: row.get("province"),
        created_at: row.get("created_at"),
    }
}

fn map_donor(row: &PgRow) -> Donor {
    Donor {
        id: row.get("id"),
        name: row.get("name"),
        donor_type: row.get("donor_type"),
        preferred_course: row.get("preferred_course"),
        min_gpa: row.get("min_gpa"),
        max_amount: row.get("max_amount"),
        created_at: row.get("created_at"),
    }
}

fn map_match(row: &PgRow) -> MatchRecord {
    MatchRecord {
        id: row.get("id"),
        student_id: row.get("student_id"),
        donor_id: row.get("donor_id"),
        score: row.get("score"),
        top_features: row.get("top_features"),
        funded: row.get("funded"),
        matched_at: row.get("matched_at"),
    }
}
