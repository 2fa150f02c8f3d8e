//! Hardened execution pipeline
//!
//! The layers that stand between the agent loop and a tool backend:
//! timeout and retry wrappers, failure classification, name routing, and
//! the public executor entry point. Composition order is
//! retry ∘ timeout ∘ route.

mod classify;
mod executor;
mod retry;
mod router;
mod timeout;

pub use classify::{
    classify_message, error_from_call_result, format_error_for_model, should_retry,
};
pub use executor::{ExecuteOptions, execute};
pub use retry::{RetryPolicy, with_retry};
pub use router::{RouteRequest, Router};
pub use timeout::with_timeout;
