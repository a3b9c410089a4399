use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unit of work is closed")]
    SessionClosed,

    #[error("Validation: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried by the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Persistence(_))
    }
}

/// Raised by the shipping charge calculator for any failure during its lookups.
///
/// The message is deliberately generic. The originating [`DomainError`] is kept
/// as the error source so it shows up in logs and error chains.
#[derive(Debug, Error)]
#[error("Shipping charge could not be calculated")]
pub struct ChargeCalculationError {
    #[source]
    cause: DomainError,
}

impl ChargeCalculationError {
    pub(crate) fn new(cause: DomainError) -> Self {
        Self { cause }
    }

    /// True when the underlying failure came from the store rather than
    /// from missing pricing data, so asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        self.cause.is_transient()
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn charge_error_hides_cause_in_message() {
        let err = ChargeCalculationError::new(DomainError::not_found("City", "id", 7));
        assert_eq!(err.to_string(), "Shipping charge could not be calculated");
    }

    #[test]
    fn charge_error_chains_cause() {
        let err = ChargeCalculationError::new(DomainError::Persistence("db down".into()));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Persistence error: db down"));
    }

    #[test]
    fn only_persistence_errors_are_transient() {
        assert!(DomainError::Persistence("timeout".into()).is_transient());
        assert!(!DomainError::SessionClosed.is_transient());
        assert!(!DomainError::Validation("negative weight".into()).is_transient());
        assert!(!DomainError::not_found("Branch", "id", 1).is_transient());
        assert!(ChargeCalculationError::new(DomainError::Persistence("timeout".into())).is_retryable());
        assert!(!ChargeCalculationError::new(DomainError::not_found("Standard", "id", "any")).is_retryable());
    }
}
