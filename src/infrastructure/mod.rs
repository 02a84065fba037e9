pub mod request_executor;
pub mod retry;

pub use request_executor::{RequestExecutor, RequestSpec, Validator};
pub use retry::{RetryPolicy, RetryState};
