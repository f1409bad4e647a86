use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{shortlist_students, Matcher};
use crate::models::{
    CandidateListResponse, CandidateParams, CandidateSummary, DonorSavedResponse, ErrorResponse,
    HealthResponse, MatchListResponse, MatchScoreRequest, MatchScoreResponse, NewDonor, NewStudent,
    RegenerateResponse, SaveDonorRequest, SaveStudentRequest, StudentSavedResponse,
};
use crate::services::{PostgresClient, PostgresError, RescoringService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub rescoring: Arc<RescoringService>,
    pub matcher: Matcher,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match/score", web::post().to(match_score))
        .route("/matches/regenerate", web::post().to(regenerate_matches))
        .route("/matches/student/{id}", web::get().to(student_matches))
        .route("/matches/donor/{id}", web::get().to(donor_matches))
        .route("/students", web::post().to(create_student))
        .route("/students/{id}", web::get().to(get_student))
        .route("/students/{id}", web::put().to(update_student))
        .route("/donors", web::post().to(create_donor))
        .route("/donors/{id}", web::get().to(get_donor))
        .route("/donors/{id}", web::put().to(update_donor))
        .route("/donors/{id}/candidates", web::get().to(donor_candidates));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one student-donor pair
///
/// POST /api/v1/match/score
///
/// Request body:
/// ```json
/// {
///   "studentId": 1,
///   "donorId": 2
/// }
/// ```
///
/// Any failure, including an unknown student or donor id, is reported as a
/// JSON error with status 400.
async fn match_score(
    state: web::Data<AppState>,
    req: web::Json<MatchScoreRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let student = match state.postgres.get_student(req.student_id).await {
        Ok(student) => student,
        Err(e) => {
            tracing::info!("match_score lookup failed for student {}: {}", req.student_id, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Failed to score pair".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let donor = match state.postgres.get_donor(req.donor_id).await {
        Ok(donor) => donor,
        Err(e) => {
            tracing::info!("match_score lookup failed for donor {}: {}", req.donor_id, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Failed to score pair".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let outcome = state.matcher.score_pair(&student, &donor);

    tracing::debug!(
        "Scored student {} against donor {}: {}",
        student.id,
        donor.id,
        outcome.score
    );

    HttpResponse::Ok().json(MatchScoreResponse {
        match_score: outcome.score,
        explanation: outcome.explanation,
    })
}

/// Regenerate the full match table
///
/// POST /api/v1/matches/regenerate
///
/// Wipes and repopulates the match table from the current student and
/// donor snapshots, returning the number of qualifying pairs.
async fn regenerate_matches(state: web::Data<AppState>) -> impl Responder {
    match state.rescoring.regenerate_all().await {
        Ok(total_matches) => HttpResponse::Ok().json(RegenerateResponse { total_matches }),
        Err(e) => {
            tracing::error!("Full match regeneration failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to regenerate matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Persisted matches for one student
///
/// GET /api/v1/matches/student/{id}
async fn student_matches(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let student_id = path.into_inner();

    match state.postgres.matches_for_student(student_id).await {
        Ok(matches) => {
            let count = matches.len();
            HttpResponse::Ok().json(MatchListResponse { matches, count })
        }
        Err(e) => {
            tracing::error!("Failed to fetch matches for student {}: {}", student_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Persisted matches for one donor
///
/// GET /api/v1/matches/donor/{id}
async fn donor_matches(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let donor_id = path.into_inner();

    match state.postgres.matches_for_donor(donor_id).await {
        Ok(matches) => {
            let count = matches.len();
            HttpResponse::Ok().json(MatchListResponse { matches, count })
        }
        Err(e) => {
            tracing::error!("Failed to fetch matches for donor {}: {}", donor_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Student shortlist for a donor
///
/// GET /api/v1/donors/{id}/candidates?limit=5
///
/// Students at or above the donor's minimum GPA in one of the donor's
/// preferred courses, highest need first.
async fn donor_candidates(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    params: web::Query<CandidateParams>,
) -> impl Responder {
    let donor_id = path.into_inner();

    let donor = match state.postgres.get_donor(donor_id).await {
        Ok(donor) => donor,
        Err(e) => return storage_error("fetch donor", e),
    };

    let students = match state.postgres.list_students().await {
        Ok(students) => students,
        Err(e) => return storage_error("list students", e),
    };

    let shortlist = shortlist_students(&donor, students, params.limit);
    let candidates: Vec<CandidateSummary> = shortlist.iter().map(CandidateSummary::from).collect();

    HttpResponse::Ok().json(CandidateListResponse {
        donor_id,
        count: candidates.len(),
        candidates,
    })
}

/// Fetch one student
///
/// GET /api/v1/students/{id}
async fn get_student(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.postgres.get_student(path.into_inner()).await {
        Ok(student) => HttpResponse::Ok().json(student),
        Err(e) => storage_error("fetch student", e),
    }
}

/// Create a student and re-score it against every donor
///
/// POST /api/v1/students
async fn create_student(
    state: web::Data<AppState>,
    req: web::Json<SaveStudentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let student = match state.postgres.insert_student(&new_student(&req)).await {
        Ok(student) => student,
        Err(e) => return storage_error("create student", e),
    };

    // Reactive re-score runs after the write is durable; its failure is the
    // caller's failure.
    match state.rescoring.rescore_student(&student).await {
        Ok(summary) => {
            tracing::info!(
                "Created student {} ({} matches upserted)",
                student.id,
                summary.upserted
            );
            HttpResponse::Created().json(StudentSavedResponse {
                student,
                matches_upserted: summary.upserted,
                matches_removed: summary.removed,
            })
        }
        Err(e) => storage_error("rescore student", e),
    }
}

/// Update a student and re-score it against every donor
///
/// PUT /api/v1/students/{id}
async fn update_student(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<SaveStudentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let student = match state
        .postgres
        .update_student(path.into_inner(), &new_student(&req))
        .await
    {
        Ok(student) => student,
        Err(e) => return storage_error("update student", e),
    };

    match state.rescoring.rescore_student(&student).await {
        Ok(summary) => HttpResponse::Ok().json(StudentSavedResponse {
            student,
            matches_upserted: summary.upserted,
            matches_removed: summary.removed,
        }),
        Err(e) => storage_error("rescore student", e),
    }
}

/// Fetch one donor
///
/// GET /api/v1/donors/{id}
async fn get_donor(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.postgres.get_donor(path.into_inner()).await {
        Ok(donor) => HttpResponse::Ok().json(donor),
        Err(e) => storage_error("fetch donor", e),
    }
}

/// Create a donor and re-score it against every student
///
/// POST /api/v1/donors
async fn create_donor(
    state: web::Data<AppState>,
    req: web::Json<SaveDonorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let donor = match state.postgres.insert_donor(&new_donor(&req)).await {
        Ok(donor) => donor,
        Err(e) => return storage_error("create donor", e),
    };

    match state.rescoring.rescore_donor(&donor).await {
        Ok(summary) => {
            tracing::info!(
                "Created donor {} ({} matches upserted)",
                donor.id,
                summary.upserted
            );
            HttpResponse::Created().json(DonorSavedResponse {
                donor,
                matches_upserted: summary.upserted,
                matches_removed: summary.removed,
            })
        }
        Err(e) => storage_error("rescore donor", e),
    }
}

/// Update a donor and re-score it against every student
///
/// PUT /api/v1/donors/{id}
async fn update_donor(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<SaveDonorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let donor = match state
        .postgres
        .update_donor(path.into_inner(), &new_donor(&req))
        .await
    {
        Ok(donor) => donor,
        Err(e) => return storage_error("update donor", e),
    };

    match state.rescoring.rescore_donor(&donor).await {
        Ok(summary) => HttpResponse::Ok().json(DonorSavedResponse {
            donor,
            matches_upserted: summary.upserted,
            matches_removed: summary.removed,
        }),
        Err(e) => storage_error("rescore donor", e),
    }
}

fn new_student(req: &SaveStudentRequest) -> NewStudent {
    NewStudent {
        student_number: req.student_number.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        gpa: req.gpa,
        course: req.course.clone(),
        need_score: req.need_score,
        province: req.province.clone(),
    }
}

fn new_donor(req: &SaveDonorRequest) -> NewDonor {
    NewDonor {
        name: req.name.clone(),
        donor_type: req.donor_type,
        preferred_course: req.preferred_course.clone(),
        min_gpa: req.min_gpa,
        max_amount: req.max_amount,
    }
}

fn storage_error(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(ref what) => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Failed to {}", context),
            message: what.clone(),
            status_code: 404,
        }),
        _ => {
            tracing::error!("Failed to {}: {}", context, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to {}", context),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}
