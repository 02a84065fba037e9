pub mod risk_calculator;
pub mod submission_builder;
pub mod validator;

pub use risk_calculator::{assess_all, calculate_risk_assessment, BloodPressure};
pub use submission_builder::{build_assessment_results, summarize, HIGH_RISK_THRESHOLD};
pub use validator::is_valid_patient_page;
