pub mod assessment_flow;

pub use assessment_flow::{AssessmentFlow, AssessmentOutcome};
