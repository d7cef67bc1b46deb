//! Service-level error taxonomy shared by the admin facade and its adapters.

// self
use crate::{_prelude::*, policy::PolicyError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error categories exposed by every administrative operation.
///
/// Validation failures are raised before any storage call; storage-reported not-found and
/// already-exists conditions pass through as their category; everything else is wrapped as
/// [`Error::Internal`] with the underlying cause retained for diagnostics but kept out of the
/// display text shown to untrusted callers.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Malformed or missing input, rejected before touching storage.
	#[error("{reason}")]
	InvalidArgument {
		/// Human-readable description of the rejected input.
		reason: String,
	},
	/// The addressed record does not exist.
	#[error("{reason}")]
	NotFound {
		/// Human-readable description of the missing record.
		reason: String,
	},
	/// A unique key collided during create.
	#[error("{reason}")]
	AlreadyExists {
		/// Human-readable description of the collision.
		reason: String,
	},
	/// Storage failure, encoding failure, or a partial failure inside a cross-entity protocol.
	#[error("{context}")]
	Internal {
		/// Stable description of the failed step; never echoes the raw cause.
		context: String,
		/// Underlying failure, when one exists.
		#[source]
		source: Option<BoxError>,
	},
}
impl Error {
	/// Builds an [`Error::InvalidArgument`].
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument { reason: reason.into() }
	}

	/// Builds an [`Error::NotFound`].
	pub fn not_found(reason: impl Into<String>) -> Self {
		Self::NotFound { reason: reason.into() }
	}

	/// Builds an [`Error::AlreadyExists`].
	pub fn already_exists(reason: impl Into<String>) -> Self {
		Self::AlreadyExists { reason: reason.into() }
	}

	/// Wraps an underlying failure as [`Error::Internal`], retaining the cause as the error
	/// source.
	pub fn internal(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
		Self::Internal { context: context.into(), source: Some(source.into()) }
	}

	/// Builds an [`Error::Internal`] for a broken invariant with no distinct underlying cause.
	pub fn internal_invariant(context: impl Into<String>) -> Self {
		Self::Internal { context: context.into(), source: None }
	}
}
impl From<PolicyError> for Error {
	fn from(err: PolicyError) -> Self {
		Self::InvalidArgument { reason: err.to_string() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use std::error::Error as StdError;

	#[test]
	fn internal_retains_source_but_hides_it_from_display() {
		let cause = crate::store::StoreError::Backend { message: "database unreachable".into() };
		let err = Error::internal("Create client failed.", cause.clone());

		assert_eq!(err.to_string(), "Create client failed.");

		let source = StdError::source(&err)
			.expect("Internal error should expose the underlying store error as its source.");

		assert_eq!(source.to_string(), cause.to_string());
	}

	#[test]
	fn policy_errors_map_to_invalid_argument() {
		let err: Error = PolicyError::CostTooLow { cost: 4, minimum: 12 }.into();

		assert!(matches!(err, Error::InvalidArgument { .. }));
		assert!(err.to_string().contains("minimum"));
	}
}
