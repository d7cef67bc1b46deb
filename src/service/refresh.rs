//! Offline-session inspection and the two-phase refresh revocation protocol.
//!
//! Revocation coordinates two records with no multi-key transaction available: phase A
//! optimistically detaches the token reference from the session aggregate, phase B deletes
//! the standalone token record. When phase B fails, the reference is already gone and the
//! standalone record is left orphaned; the protocol deliberately reports an internal error
//! without compensating, prioritizing "the grant is no longer listed" over strict referential
//! cleanup. Reclaiming orphans is left to an external garbage-collection pass. Known
//! durability gap.

// self
use crate::{
	_prelude::*,
	record::{OfflineSession, RefreshTokenRef},
	service::AdminService,
	store::{SessionUpdate, StoreError},
	subject::IdTokenSubject,
};

/// Projection of a [`RefreshTokenRef`] returned by [`AdminService::list_refresh`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenSummary {
	/// Standalone token record id.
	pub id: String,
	/// Client the token was issued to.
	pub client_id: String,
	/// Creation time as Unix epoch seconds.
	pub created_at: i64,
	/// Last-used time as Unix epoch seconds.
	pub last_used: i64,
}
impl From<RefreshTokenRef> for RefreshTokenSummary {
	fn from(reference: RefreshTokenRef) -> Self {
		Self {
			id: reference.id,
			client_id: reference.client_id,
			created_at: reference.created_at.unix_timestamp(),
			last_used: reference.last_used.unix_timestamp(),
		}
	}
}

impl AdminService {
	/// Lists refresh-grant references for the user + connector pair addressed by the encoded
	/// subject.
	///
	/// A pair with no offline session has simply never obtained an offline grant; that yields
	/// an empty list, not an error. Ordering follows the session's refresh map.
	pub async fn list_refresh(&self, encoded_subject: &str) -> Result<Vec<RefreshTokenSummary>> {
		let subject = self.decode_subject(encoded_subject)?;
		let session =
			match self.store.get_offline_session(&subject.user_id, &subject.conn_id).await {
				Ok(session) => session,
				Err(StoreError::NotFound) => return Ok(Vec::new()),
				Err(err) => {
					tracing::error!(error = %err, "Failed to fetch offline session.");

					return Err(Error::internal("List refresh tokens failed.", err));
				},
			};

		Ok(session.refresh.into_values().map(RefreshTokenSummary::from).collect())
	}

	/// Phase A of the revocation protocol: optimistically detaches the reference issued to
	/// `client_id` from the subject's offline session and returns it.
	///
	/// The updater may run several times under contention; it derives everything from the
	/// session value it is handed and carries the detached reference out through
	/// [`SessionUpdate::detached`], which is rebuilt on every invocation. A missing map entry,
	/// or one with an empty token id, aborts the update without mutating.
	pub async fn detach_refresh(
		&self,
		subject: &IdTokenSubject,
		client_id: &str,
	) -> Result<RefreshTokenRef> {
		let updater = |mut session: OfflineSession| {
			let detached = match session.refresh.remove(client_id) {
				Some(reference) if !reference.id.is_empty() => reference,
				_ => return Err(StoreError::NotFound),
			};

			Ok(SessionUpdate { session, detached: Some(detached) })
		};
		let detached = match self
			.store
			.update_offline_session(&subject.user_id, &subject.conn_id, &updater)
			.await
		{
			Ok(detached) => detached,
			Err(StoreError::NotFound) =>
				return Err(Error::not_found(
					"Could not revoke refresh token, user id and client id match not found.",
				)),
			Err(err) => {
				tracing::error!(error = %err, "Failed to update offline session.");

				return Err(Error::internal("Revoke refresh token failed.", err));
			},
		};

		detached.ok_or_else(|| {
			Error::internal_invariant("Session updater committed without a detached reference.")
		})
	}

	/// Revokes the refresh grant issued to `client_id` for the pair addressed by the encoded
	/// subject: detach the reference (phase A), then delete the standalone record (phase B).
	///
	/// Phase A strictly precedes phase B; when phase A reports not-found, phase B never runs.
	/// A phase-B failure reports an internal error with the reference already gone from the
	/// session, leaving the standalone record orphaned (see the module docs).
	pub async fn revoke_refresh(&self, encoded_subject: &str, client_id: &str) -> Result<()> {
		let subject = self.decode_subject(encoded_subject)?;
		let detached = self.detach_refresh(&subject, client_id).await?;

		match self.store.delete_refresh(&detached.id).await {
			Ok(()) => Ok(()),
			Err(err) => {
				tracing::error!(
					token = %detached.id,
					error = %err,
					"Failed to delete refresh token after detaching its reference.",
				);

				Err(Error::internal("Delete refresh token failed.", err))
			},
		}
	}

	fn decode_subject(&self, encoded: &str) -> Result<IdTokenSubject> {
		self.subjects.unmarshal(encoded).map_err(|err| {
			tracing::error!(error = %err, "Failed to unmarshal identity-token subject.");

			Error::internal("Decode identity-token subject failed.", err)
		})
	}
}
