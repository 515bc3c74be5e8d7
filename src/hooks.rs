use std::{fmt, sync::Arc};

use crate::OperationError;

/// Callback invoked before each retry with `(attempt, max_retries, error)`.
pub type RetryFn = dyn Fn(u32, u32, &OperationError) + Send + Sync;
/// Callback invoked once when every attempt has failed.
pub type FailFn = dyn Fn(&OperationError) + Send + Sync;

/// Severity of a transient user-facing notice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeLevel {
    /// An attempt failed and another one is coming.
    Warning,
    /// Every attempt failed.
    Error,
}

/// Short-lived message meant for the user interface (a toast).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    /// How the UI should style the notice.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    fn retrying(attempt: u32, max_retries: u32) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: format!("Connection issue, retrying ({attempt}/{max_retries})..."),
        }
    }

    fn failed(error: &OperationError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("Request failed: {error}"),
        }
    }
}

/// Sink for transient notices, implemented by the UI layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Observer callbacks fired by the executor.
///
/// The default hooks log through `tracing` (when the `tracing` feature is
/// enabled). Use [`RetryHooks::notifying`] to also surface notices to the
/// user, or [`RetryHooks::silent`] to observe nothing.
#[derive(Clone)]
pub struct RetryHooks {
    on_retry: Arc<RetryFn>,
    on_fail: Arc<FailFn>,
}

impl fmt::Debug for RetryHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryHooks")
            .field("on_retry", &"<callback>")
            .field("on_fail", &"<callback>")
            .finish()
    }
}

impl Default for RetryHooks {
    fn default() -> Self {
        Self::logging()
    }
}

impl RetryHooks {
    /// Creates hooks from two custom callbacks.
    pub fn new<R, F>(on_retry: R, on_fail: F) -> Self
    where
        R: Fn(u32, u32, &OperationError) + Send + Sync + 'static,
        F: Fn(&OperationError) + Send + Sync + 'static,
    {
        Self {
            on_retry: Arc::new(on_retry),
            on_fail: Arc::new(on_fail),
        }
    }

    /// Hooks that do nothing.
    pub fn silent() -> Self {
        Self::new(|_, _, _| {}, |_| {})
    }

    /// Hooks that log a warning per retry and an error on final failure.
    pub fn logging() -> Self {
        Self::new(log_retry, log_failure)
    }

    /// Logging hooks that also push a [`Notice`] to `notifier`.
    pub fn notifying(notifier: Arc<dyn Notifier>) -> Self {
        let on_retry = Arc::clone(&notifier);
        let on_fail = notifier;
        Self::new(
            move |attempt, max_retries, error| {
                log_retry(attempt, max_retries, error);
                on_retry.notify(Notice::retrying(attempt, max_retries));
            },
            move |error| {
                log_failure(error);
                on_fail.notify(Notice::failed(error));
            },
        )
    }

    /// Replaces the retry callback.
    pub fn on_retry<R>(mut self, on_retry: R) -> Self
    where
        R: Fn(u32, u32, &OperationError) + Send + Sync + 'static,
    {
        self.on_retry = Arc::new(on_retry);
        self
    }

    /// Replaces the failure callback.
    pub fn on_fail<F>(mut self, on_fail: F) -> Self
    where
        F: Fn(&OperationError) + Send + Sync + 'static,
    {
        self.on_fail = Arc::new(on_fail);
        self
    }

    pub(crate) fn retrying(&self, attempt: u32, max_retries: u32, error: &OperationError) {
        (self.on_retry)(attempt, max_retries, error)
    }

    pub(crate) fn failed(&self, error: &OperationError) {
        (self.on_fail)(error)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_retry(attempt: u32, max_retries: u32, error: &OperationError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(attempt, max_retries, error = %error, "operation failed, retrying");
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_failure(error: &OperationError) {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %error, "operation failed after all attempts");
}
