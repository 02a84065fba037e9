pub mod assessment;
pub mod page;
pub mod patient;

pub use assessment::{
    AssessmentResponse, AssessmentResults, BreakdownCategory, Feedback, RiskAssessment,
    RiskSummary, ScoreBreakdown, ScoredResults, INVALID_SCORE,
};
pub use page::{Pagination, PatientPage, ResponseMetadata};
pub use patient::{FieldValue, Patient};
