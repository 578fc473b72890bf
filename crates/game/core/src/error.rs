//! Common error infrastructure for crawl-core.
//!
//! Gameplay never fails with an `Err`: a blocked move or an unusable item is
//! narrated through the message log instead. The errors that do exist here
//! describe broken content or broken structural invariants, and are
//! classified through [`GameError`] so callers can pick a recovery strategy.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - narrative or runtime data problem, play continues.
    ///
    /// Examples: dialogue parcel missing at runtime, save file unreadable
    Recoverable,

    /// Validation error - caller asked for something that does not exist.
    ///
    /// Examples: checkout of an unknown branch, branching from an unknown commit
    Validation,

    /// Fatal error - required content is missing or inconsistent.
    ///
    /// Examples: theme references an unknown enemy, no start map
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all crawl errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ContentError, ContentKind};

    #[test]
    fn only_recoverable_severity_is_recoverable() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(!ErrorSeverity::Fatal.is_recoverable());
    }

    #[test]
    fn broken_content_is_fatal() {
        let error = ContentError::missing(ContentKind::Map, "vault");
        assert_eq!(error.severity().as_str(), "fatal");
        assert_eq!(error.error_code(), "CONTENT_MISSING");
    }
}
