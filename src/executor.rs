use std::{
    future::{poll_fn, Future},
    pin::pin,
    task::Poll,
};

use crate::{sleep, BoxError, OperationError, RetryHooks, RetryOptions};

/// Retry policy plus the hooks observing it, supplied per invocation.
#[derive(Clone, Debug, Default)]
pub struct RetryConfig {
    /// Attempt bound and inter-attempt delay.
    pub options: RetryOptions,
    /// Callbacks fired on each retry and on final failure.
    pub hooks: RetryHooks,
}

impl RetryConfig {
    /// Default options (3 attempts, 1 s apart) with logging hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options with hooks that observe nothing.
    pub fn silent() -> Self {
        Self::default().with_hooks(RetryHooks::silent())
    }

    /// Replaces attempt bound and delay in one go.
    pub fn with_options(mut self, options: RetryOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the retry and failure callbacks.
    pub fn with_hooks(mut self, hooks: RetryHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the total number of attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.options.max_retries = max_retries;
        self
    }

    /// Sets the fixed delay between attempts.
    pub fn retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.options.retry_delay_ms = retry_delay_ms;
        self
    }
}

/// Runs `operation` with the retry policy in `config`.
///
/// Returns `Some(value)` from the first successful attempt, or `None` once
/// every attempt has failed. Failures never propagate: they are reported
/// through the config's hooks only.
///
/// Native callers need a tokio runtime with the time driver enabled; a
/// nonzero delay panics outside of one.
///
/// # Example
///
/// ```no_run
/// use fraserpay_retry::{run_with_retry, RetryConfig};
///
/// # async fn fetch_balance(_: &str) -> Result<u64, std::io::Error> { Ok(0) }
/// # async fn demo() {
/// let config = RetryConfig::new().max_retries(5).retry_delay_ms(200);
/// let balance = run_with_retry(|| fetch_balance("student-42"), &config).await;
/// # }
/// ```
pub async fn run_with_retry<T, E, F, Fut>(operation: F, config: &RetryConfig) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    RetryExecutor::new(config.clone()).run(operation).await
}

/// Executes fallible async operations with bounded, fixed-delay retry.
///
/// On native targets the delay between attempts is a `tokio` timer, so the
/// executor must be polled inside a tokio runtime with the time driver
/// enabled.
#[derive(Clone, Debug, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

enum Wake {
    Elapsed,
    Cancelled,
}

impl RetryExecutor {
    /// Creates an executor that applies `config` to every run.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Runs `operation` until it succeeds or the attempt bound is reached.
    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.run_until(operation, std::future::pending()).await
    }

    /// Like [`RetryExecutor::run`], but gives up as soon as `cancel`
    /// resolves while waiting between attempts.
    ///
    /// A cancelled wait does not count as an attempt: `on_fail` is called
    /// once with the last operation error and `None` is returned.
    pub async fn run_until<T, E, F, Fut, C>(&self, mut operation: F, cancel: C) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
        C: Future<Output = ()>,
    {
        let max_retries = self.config.options.attempt_limit();
        let delay = self.config.options.retry_delay();
        let hooks = &self.config.hooks;
        let mut cancel = pin!(cancel);
        let mut attempts = 0u32;

        while attempts < max_retries {
            let error = match operation().await {
                Ok(value) => return Some(value),
                Err(err) => OperationError::new(err),
            };
            attempts += 1;

            if attempts >= max_retries {
                hooks.failed(&error);
                return None;
            }
            hooks.retrying(attempts, max_retries, &error);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt = attempts,
                max_retries,
                "retrying operation after {} ms",
                delay.as_millis()
            );

            let mut elapsed = pin!(sleep::wait(delay));
            let wake = poll_fn(|cx| {
                if cancel.as_mut().poll(cx).is_ready() {
                    return Poll::Ready(Wake::Cancelled);
                }
                elapsed.as_mut().poll(cx).map(|()| Wake::Elapsed)
            })
            .await;

            if let Wake::Cancelled = wake {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt = attempts, "retry cancelled during delay");
                hooks.failed(&error);
                return None;
            }
        }

        None
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::{run_with_retry, RetryConfig, RetryExecutor};
    use crate::RetryOptions;

    #[test]
    fn builder_overrides_defaults() {
        let config = RetryConfig::silent().max_retries(7).retry_delay_ms(5);
        assert_eq!(
            config.options,
            RetryOptions {
                max_retries: 7,
                retry_delay_ms: 5,
            }
        );
    }

    #[tokio::test]
    async fn zero_max_retries_still_attempts_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let config = RetryConfig::silent().max_retries(0).retry_delay_ms(0);

        let result: Option<()> = run_with_retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("always") }
            },
            &config,
        )
        .await;

        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn falsy_success_is_not_absence() {
        let executor = RetryExecutor::new(RetryConfig::silent());

        let zero = executor.run(|| async { Ok::<_, &str>(0u64) }).await;
        let empty = executor.run(|| async { Ok::<_, &str>(String::new()) }).await;
        let no = executor.run(|| async { Ok::<_, &str>(false) }).await;

        assert_eq!(zero, Some(0));
        assert_eq!(empty, Some(String::new()));
        assert_eq!(no, Some(false));
    }
}
