// fastcart/core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure reported by a store adapter (Postgres, in-memory, ...).
///
/// Adapters classify their own failures; the order builder only cares whether
/// retrying the whole request could succeed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lock-wait timeout, deadlock victim, serialization failure, lost connection.
    #[error("transient store failure: {0}")]
    Transient(#[source] AnyhowError),

    #[error("store failure: {0}")]
    Unexpected(#[source] AnyhowError),
}

impl StoreError {
    pub fn transient(err: impl Into<AnyhowError>) -> Self {
        StoreError::Transient(err.into())
    }

    pub fn unexpected(err: impl Into<AnyhowError>) -> Self {
        StoreError::Unexpected(err.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

/// Error returned by [`crate::OrderBuilder::create_order`].
///
/// Only `Validation` carries a caller-facing message. The other two variants
/// display an opaque text; the underlying cause stays reachable through
/// `std::error::Error::source` for logging.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("the order could not be placed right now, please try again later")]
    Transient {
        #[source]
        source: AnyhowError,
    },

    #[error("the order could not be placed")]
    Internal {
        #[source]
        source: AnyhowError,
    },
}

impl OrderError {
    pub fn validation(message: impl Into<String>) -> Self {
        OrderError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, OrderError::Validation(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, OrderError::Transient { .. })
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Transient(source) => OrderError::Transient { source },
            StoreError::Unexpected(source) => OrderError::Internal { source },
        }
    }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_class_across_conversion() {
        let transient: OrderError = StoreError::transient(anyhow::anyhow!("lock timeout")).into();
        assert!(transient.is_transient());

        let internal: OrderError = StoreError::unexpected(anyhow::anyhow!("constraint violated")).into();
        assert!(matches!(internal, OrderError::Internal { .. }));
    }

    #[test]
    fn opaque_variants_do_not_leak_their_cause_in_display() {
        let err: OrderError = StoreError::unexpected(anyhow::anyhow!("relation \"orders\" does not exist")).into();
        assert_eq!(err.to_string(), "the order could not be placed");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("relation \"orders\" does not exist"));
    }
}
