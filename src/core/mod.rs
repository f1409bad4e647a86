// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{course_matches, meets_gpa_requirement, preferred_course_list, shortlist_students};
pub use matcher::{Matcher, MatchRun, RescoreOutcome, DEFAULT_MIN_THRESHOLD};
pub use scoring::calculate_compatibility;
