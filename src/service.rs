//! Administrative service facade: typed requests in, adapter calls out, outcomes mapped onto
//! the small error taxonomy in [`crate::error`].

mod client;
mod password;
mod refresh;

pub use client::{CreateClientResponse, UpdateClientPatch};
pub use password::UpdatePasswordPatch;
pub use refresh::RefreshTokenSummary;

// self
use crate::{
	_prelude::*,
	policy::PasswordPolicy,
	store::AdminStore,
	subject::{Base64SubjectCodec, SubjectCodec},
};

/// Version string of the administrative interface; bumped whenever a call is added so callers
/// can detect feature availability.
pub const API_VERSION: &str = "v1alpha1";

/// Version information returned by [`AdminService::version`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
	/// Server (crate) version.
	pub server: String,
	/// Administrative interface version.
	pub api: String,
}

/// Administrative facade over an [`AdminStore`].
///
/// Owns no record state and caches nothing between calls, so it is safe for unbounded
/// concurrent invocation; the store's per-key optimistic concurrency control is the only
/// cross-call serialization mechanism.
#[derive(Clone)]
pub struct AdminService {
	store: Arc<dyn AdminStore>,
	policy: PasswordPolicy,
	subjects: Arc<dyn SubjectCodec>,
}
impl AdminService {
	/// Creates a facade with the default password policy and subject codec.
	pub fn new(store: Arc<dyn AdminStore>) -> Self {
		Self { store, policy: PasswordPolicy::default(), subjects: Arc::new(Base64SubjectCodec) }
	}

	/// Replaces the password-acceptance policy, e.g. for per-deployment tuning or tests.
	pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Replaces the identity-token subject codec.
	pub fn with_subject_codec(mut self, subjects: Arc<dyn SubjectCodec>) -> Self {
		self.subjects = subjects;

		self
	}

	/// Reports server and interface versions.
	pub fn version(&self) -> VersionInfo {
		VersionInfo { server: env!("CARGO_PKG_VERSION").into(), api: API_VERSION.into() }
	}
}
impl Debug for AdminService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminService").field("policy", &self.policy).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	#[test]
	fn version_reports_crate_and_interface_versions() {
		let service = AdminService::new(Arc::new(MemoryStore::default()));
		let version = service.version();

		assert_eq!(version.server, env!("CARGO_PKG_VERSION"));
		assert_eq!(version.api, API_VERSION);
	}
}
