//! `fraserpay-retry` runs unreliable backend calls with bounded retry.
//!
//! The FraserPay point-of-sale client talks straight to a hosted backend.
//! Every remote read or write (fetching a student balance, posting a booth
//! transaction, loading the leaderboard) goes through the same policy:
//! - [`run_with_retry`] / [`RetryExecutor::run`]
//! - [`RetryExecutor::run_until`] for calls that can be abandoned
//!
//! Failures never escape as errors. They are reported through
//! [`RetryHooks`], and exhaustion is signalled by `None`.
//!
//! On native targets the delay between attempts is a `tokio` timer: run the
//! executor inside a tokio runtime with the time driver enabled
//! (`#[tokio::main]` does this). A nonzero delay panics outside of one. On
//! `wasm32` the delay is scheduled with the JS `setTimeout` and no runtime
//! is needed.

mod error;
mod executor;
mod hooks;
mod options;
mod sleep;

pub use error::{BoxError, ConfigError, OperationError};
pub use executor::{run_with_retry, RetryConfig, RetryExecutor};
pub use hooks::{FailFn, Notice, NoticeLevel, Notifier, RetryFn, RetryHooks};
pub use options::{RetryOptions, MAX_RETRIES_ENV, RETRY_DELAY_MS_ENV};

pub type Result<T> = std::result::Result<T, ConfigError>;
