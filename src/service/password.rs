//! Password registry operations, including policy enforcement and verification.

// self
use crate::{
	_prelude::*,
	record::{Password, PasswordSummary},
	service::AdminService,
	store::StoreError,
};

/// Sparse update for a password credential; at least one field must be supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdatePasswordPatch {
	/// Email key of the credential to update.
	pub email: String,
	/// Replacement hash; re-validated against the policy before the write is attempted.
	pub new_hash: Option<Vec<u8>>,
	/// Replacement username.
	pub new_username: Option<String>,
}

impl AdminService {
	/// Registers a password credential after validating the hash against the acceptance
	/// policy. An empty username is permitted; a missing user id or hash is not.
	pub async fn create_password(&self, password: Password) -> Result<()> {
		if password.user_id.is_empty() {
			return Err(Error::invalid_argument("No user id supplied."));
		}
		if password.hash.is_empty() {
			return Err(Error::invalid_argument("No password hash supplied."));
		}

		self.policy.validate(&password.hash)?;

		match self.store.create_password(password).await {
			Ok(()) => Ok(()),
			Err(StoreError::AlreadyExists) =>
				Err(Error::already_exists("Password credential already exists for this email.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to create password.");

				Err(Error::internal("Create password failed.", err))
			},
		}
	}

	/// Applies a sparse update to an existing credential; a patch carrying neither a new hash
	/// nor a new username is rejected before touching storage.
	pub async fn update_password(&self, patch: UpdatePasswordPatch) -> Result<()> {
		if patch.email.is_empty() {
			return Err(Error::invalid_argument("No email supplied."));
		}
		if patch.new_hash.is_none() && patch.new_username.is_none() {
			return Err(Error::invalid_argument("Nothing to update."));
		}
		if let Some(new_hash) = &patch.new_hash {
			self.policy.validate(new_hash)?;
		}

		let updater = |mut password: Password| {
			if let Some(new_hash) = patch.new_hash.clone() {
				password.hash = new_hash;
			}
			if let Some(new_username) = patch.new_username.clone() {
				password.username = new_username;
			}

			Ok(password)
		};

		match self.store.update_password(&patch.email, &updater).await {
			Ok(()) => Ok(()),
			Err(StoreError::NotFound) =>
				Err(Error::not_found("Cannot update password, email not found.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to update password.");

				Err(Error::internal("Update password failed.", err))
			},
		}
	}

	/// Deletes the credential registered under `email`.
	pub async fn delete_password(&self, email: &str) -> Result<()> {
		if email.is_empty() {
			return Err(Error::invalid_argument("No email supplied."));
		}

		match self.store.delete_password(email).await {
			Ok(()) => Ok(()),
			Err(StoreError::NotFound) =>
				Err(Error::not_found("Cannot delete password, email not found.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to delete password.");

				Err(Error::internal("Delete password failed.", err))
			},
		}
	}

	/// Lists credential identities only; the hash never leaves the store through this call.
	pub async fn list_passwords(&self) -> Result<Vec<PasswordSummary>> {
		let passwords = self.store.list_passwords().await.map_err(|err| {
			tracing::error!(error = %err, "Failed to list passwords.");

			Error::internal("List passwords failed.", err)
		})?;

		Ok(passwords.into_iter().map(PasswordSummary::from).collect())
	}

	/// Checks a plaintext password against the stored hash in constant time.
	///
	/// A failed comparison is a normal response carrying `false`, not an error; only a missing
	/// email or a storage failure surfaces as an error.
	pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
		if email.is_empty() {
			return Err(Error::invalid_argument("No email supplied."));
		}
		if password.is_empty() {
			return Err(Error::invalid_argument("No password to verify supplied."));
		}

		let stored = match self.store.get_password(email).await {
			Ok(stored) => stored,
			Err(StoreError::NotFound) =>
				return Err(Error::not_found("Cannot verify password, email not found.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to fetch password for verification.");

				return Err(Error::internal("Verify password failed.", err));
			},
		};
		// An unparsable stored hash counts as a failed comparison, not an error.
		let verified = std::str::from_utf8(&stored.hash)
			.ok()
			.and_then(|hash| bcrypt::verify(password, hash).ok())
			.unwrap_or(false);

		if !verified {
			tracing::debug!(email, "Password check failed.");
		}

		Ok(verified)
	}
}
