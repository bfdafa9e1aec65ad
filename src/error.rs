//! Factory failure reporting.

use core::fmt;
use std::sync::Arc;

/// Result returned by singleton factories and by every fallible accessor.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// The error type for a singleton that could not produce its value.
///
/// `Failed` shares the underlying error behind an `Arc`, so a holder that
/// caches a failure hands every caller a clone of the *same* error.
#[derive(Debug, Clone)]
pub enum FactoryError {
    /// The factory returned an error.
    Failed(Arc<anyhow::Error>),
    /// The factory tried to read the holder it was initializing.
    Reentrant,
    /// A value was offered to a holder that already has one.
    AlreadyInitialized,
}

impl FactoryError {
    /// Builds a `Failed` error from a plain message.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::from(anyhow::Error::msg(message))
    }

    /// The error the factory returned, if this is a factory failure.
    pub fn factory_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed(err) => Some(&**err),
            Self::Reentrant | Self::AlreadyInitialized => None,
        }
    }
}

impl From<anyhow::Error> for FactoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(Arc::new(err))
    }
}

/// Two `Failed` errors are equal only when they are the same cached failure.
impl PartialEq for FactoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Failed(a), Self::Failed(b)) => Arc::ptr_eq(a, b),
            (Self::Reentrant, Self::Reentrant)
            | (Self::AlreadyInitialized, Self::AlreadyInitialized) => true,
            _ => false,
        }
    }
}

impl Eq for FactoryError {}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "singleton factory failed: {err}"),
            Self::Reentrant => f.write_str("singleton factory re-entered its own holder"),
            Self::AlreadyInitialized => f.write_str("singleton is already initialized"),
        }
    }
}

impl std::error::Error for FactoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(err) => Some(&***err as &(dyn std::error::Error + 'static)),
            Self::Reentrant | Self::AlreadyInitialized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_clones_of_one_failure_compare_equal() {
        let err = FactoryError::from(anyhow!("connection refused"));
        let clone = err.clone();
        assert_eq!(err, clone);

        let other = FactoryError::from(anyhow!("connection refused"));
        assert_ne!(err, other);
    }

    #[test]
    fn test_display_and_source() {
        let err = FactoryError::msg("no route to host");
        assert_eq!(err.to_string(), "singleton factory failed: no route to host");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("no route to host"));

        assert!(std::error::Error::source(&FactoryError::Reentrant).is_none());
        assert_eq!(FactoryError::Reentrant.factory_error().map(ToString::to_string), None);
    }
}
