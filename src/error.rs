use std::{error::Error as StdError, fmt};

/// Boxed, thread-safe error accepted from retried operations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type returned by the fallible configuration APIs of this crate.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `max_retries` must allow at least one attempt.
    #[error("max_retries must be at least 1")]
    ZeroRetries,
    /// Environment variable is set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Name of the offending variable.
        var: &'static str,
        /// Raw value as read from the environment.
        value: String,
    },
}

/// Normalized failure of a retried operation.
///
/// Whatever the operation failed with (a typed error, a `String`, a boxed
/// error) is carried here so hooks see a single error shape. The original
/// value stays reachable through [`OperationError::downcast_ref`].
pub struct OperationError {
    inner: BoxError,
}

impl OperationError {
    /// Wraps an operation failure.
    ///
    /// An `OperationError` passed back in is unwrapped rather than nested.
    pub fn new(error: impl Into<BoxError>) -> Self {
        let boxed: BoxError = error.into();
        match boxed.downcast::<OperationError>() {
            Ok(already) => *already,
            Err(inner) => Self { inner },
        }
    }

    /// Builds an error from any displayable, non-error payload.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self {
            inner: message.to_string().into(),
        }
    }

    /// Returns the original error if it is of type `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Returns `true` if the original error is of type `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    /// Consumes the wrapper and returns the boxed original error.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl From<BoxError> for OperationError {
    fn from(inner: BoxError) -> Self {
        Self::new(inner)
    }
}

impl fmt::Debug for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for OperationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use std::{error::Error as _, io};

    use super::{BoxError, ConfigError, OperationError};

    #[derive(Debug, thiserror::Error)]
    #[error("charge rejected")]
    struct ChargeRejected {
        #[source]
        cause: io::Error,
    }

    fn rejected() -> ChargeRejected {
        ChargeRejected {
            cause: io::Error::new(io::ErrorKind::ConnectionReset, "socket closed"),
        }
    }

    #[test]
    fn string_payload_is_normalized() {
        let err = OperationError::new("backend unreachable");
        assert_eq!(err.to_string(), "backend unreachable");

        let err = OperationError::new(String::from("timeout"));
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn msg_accepts_non_error_values() {
        let err = OperationError::msg(503);
        assert_eq!(err.to_string(), "503");
    }

    #[test]
    fn typed_error_can_be_recovered() {
        let err = OperationError::new(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(err.is::<io::Error>());
        let io_err = err
            .downcast_ref::<io::Error>()
            .expect("original io error must be recoverable");
        assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn wrapping_twice_does_not_nest() {
        let inner = OperationError::new(io::Error::new(io::ErrorKind::Other, "x"));
        let outer = OperationError::new(inner);
        assert!(outer.is::<io::Error>());
        assert!(!outer.is::<OperationError>());
    }

    #[test]
    fn source_passes_through_to_wrapped_cause() {
        let err = OperationError::new(rejected());
        assert_eq!(err.to_string(), "charge rejected");

        let source = err.source().expect("wrapped cause must be exposed");
        let cause = source
            .downcast_ref::<io::Error>()
            .expect("source must be the original io error");
        assert_eq!(cause.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn boxed_error_converts_and_unwraps() {
        let boxed: BoxError = Box::new(rejected());
        let err = OperationError::from(boxed);
        assert!(err.is::<ChargeRejected>());

        let inner = err.into_inner();
        let original = inner
            .downcast::<ChargeRejected>()
            .expect("into_inner must return the original box");
        assert_eq!(original.cause.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::ZeroRetries.to_string(),
            "max_retries must be at least 1"
        );
        let err = ConfigError::InvalidEnv {
            var: "FRASERPAY_MAX_RETRIES",
            value: "lots".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for FRASERPAY_MAX_RETRIES: \"lots\""
        );
    }
}
