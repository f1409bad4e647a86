// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Donor, DonorFeatures, DonorType, MatchCandidate, MatchOutcome, MatchRecord, NewDonor,
    NewStudent, ScoringWeights, Student, StudentFeatures,
};
pub use requests::{CandidateParams, MatchScoreRequest, SaveDonorRequest, SaveStudentRequest};
pub use responses::{
    CandidateListResponse, CandidateSummary, DonorSavedResponse, ErrorResponse, HealthResponse,
    MatchListResponse, MatchScoreResponse, RegenerateResponse, StudentSavedResponse,
};
