//! Categorized client errors.
//!
//! Every error produced inside the synchronizer is caught at the component
//! boundary that produced it and converted into either a terminal
//! [`RequestOutcome`](crate::request::RequestOutcome) or a status line; none
//! propagate to the presentation layer as faults.

use thiserror::Error;

/// Errors raised by the critter client core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CritterError {
    /// Opening a subscription failed (ledger unreachable or malformed path).
    /// Non-fatal: the affected watcher yields no further data.
    #[error("subscription setup failed: {0}")]
    SubscriptionSetup(String),

    /// A request parameter failed validation before any network interaction.
    #[error("invalid request parameter: {0}")]
    Validation(String),

    /// Signing or submission was rejected by the ledger.
    #[error("broadcast rejected: {0}")]
    Broadcast(String),

    /// The request reached a block but the ledger reported a logical failure.
    #[error("request failed after inclusion: {0}")]
    Dispatch(String),

    /// Invariant violation inside the client itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CritterError {
    /// Build a [`CritterError::SubscriptionSetup`].
    pub fn subscription(message: impl Into<String>) -> Self {
        Self::SubscriptionSetup(message.into())
    }

    /// Build a [`CritterError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a [`CritterError::Broadcast`].
    pub fn broadcast(message: impl Into<String>) -> Self {
        Self::Broadcast(message.into())
    }

    /// Build a [`CritterError::Dispatch`].
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }

    /// Build a [`CritterError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_reason() {
        let err = CritterError::validation("missing parameter 0");
        assert_eq!(
            err.to_string(),
            "invalid request parameter: missing parameter 0"
        );
    }

    #[test]
    fn test_constructors_match_variants() {
        assert!(matches!(
            CritterError::subscription("x"),
            CritterError::SubscriptionSetup(_)
        ));
        assert!(matches!(
            CritterError::broadcast("x"),
            CritterError::Broadcast(_)
        ));
        assert!(matches!(
            CritterError::dispatch("x"),
            CritterError::Dispatch(_)
        ));
        assert!(matches!(
            CritterError::internal("x"),
            CritterError::Internal(_)
        ));
    }
}
