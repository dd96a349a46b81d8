// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy of the resource index.
//!
//! Every error propagates to the caller as-is: the index never retries and
//! never converts one kind into another. Store failures pass through
//! unchanged inside [`IndexError::Store`].

use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

/// Why an operation was rejected as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedReason {
    /// The operation exists in the contract but is not implemented yet.
    NotYetSupported,
    /// The operation is meaningless for this element's configuration
    /// (node-breaker vs bus-breaker).
    NotApplicable,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotYetSupported => "not yet supported",
            Self::NotApplicable => "not applicable to this configuration",
        })
    }
}

/// Errors surfaced by the index and its views.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No bundle exists for the identifier.
    #[error("identifiable '{id}' not found")]
    NotFound {
        /// Requested identifier.
        id: String,
    },
    /// The operation is recognised but cannot be served.
    #[error("{operation} on '{id}' is {reason}")]
    Unsupported {
        /// Requested operation.
        operation: &'static str,
        /// Element the operation was requested on.
        id: String,
        /// Whether the gap is temporary or structural.
        reason: UnsupportedReason,
    },
    /// The caller used an accessor that is invalid for the element.
    ///
    /// This signals a programming error in the caller.
    #[error("invariant violation in {operation} on '{id}': {detail}")]
    InvariantViolation {
        /// Requested operation.
        operation: &'static str,
        /// Element the operation was requested on.
        id: String,
        /// What was violated.
        detail: String,
    },
    /// Failure reported by the backing store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IndexError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub(crate) fn not_yet_supported(operation: &'static str, id: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            id: id.into(),
            reason: UnsupportedReason::NotYetSupported,
        }
    }

    pub(crate) fn not_applicable(operation: &'static str, id: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            id: id.into(),
            reason: UnsupportedReason::NotApplicable,
        }
    }

    pub(crate) fn invariant(
        operation: &'static str,
        id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvariantViolation {
            operation,
            id: id.into(),
            detail: detail.into(),
        }
    }

    /// Returns `true` for [`IndexError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`IndexError::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns `true` for [`IndexError::InvariantViolation`].
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_operation_and_reason() {
        let err = IndexError::not_yet_supported("remove_extension", "BBS1");
        assert_eq!(
            err.to_string(),
            "remove_extension on 'BBS1' is not yet supported"
        );
        let err = IndexError::not_applicable("node", "LOAD1");
        assert!(err.to_string().ends_with("not applicable to this configuration"));
    }

    #[test]
    fn store_errors_pass_through_verbatim() {
        let inner = StoreError::Unavailable("connection reset".into());
        let err = IndexError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, IndexError::Store(e) if e == inner));
    }
}
