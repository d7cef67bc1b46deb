//! Storage contracts consumed by the administrative service.
//!
//! The backend offers per-entity primitives only: there are no multi-key transactions, and
//! the sole concurrency mechanism is an optimistic per-key read-modify-write that re-runs the
//! caller's mutation callback against a fresh value when a concurrent writer intervenes.

pub mod memory;

pub use memory::MemoryStore;

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	record::{Client, OfflineSession, Password, RefreshTokenRef},
};

const ID_LEN: usize = 32;

/// Future type returned by every [`AdminStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Mutation callback for client records.
///
/// The storage engine re-reads and retries the callback when a concurrent writer changed the
/// record since it was read, so a single logical update may invoke it several times.
/// Implementations must derive everything from the value they are handed and must not
/// accumulate state across invocations. Returning an error aborts the write without mutating.
pub type ClientUpdater<'a> = dyn Fn(Client) -> Result<Client, StoreError> + Send + Sync + 'a;
/// Mutation callback for password records; subject to the same retry contract as
/// [`ClientUpdater`].
pub type PasswordUpdater<'a> = dyn Fn(Password) -> Result<Password, StoreError> + Send + Sync + 'a;
/// Mutation callback for offline sessions; subject to the same retry contract as
/// [`ClientUpdater`].
pub type SessionUpdater<'a> =
	dyn Fn(OfflineSession) -> Result<SessionUpdate, StoreError> + Send + Sync + 'a;

/// Value produced by a [`SessionUpdater`] invocation.
///
/// Side-channel results ride alongside the new session value instead of being written into
/// captured state, so every retry rebuilds them from scratch and nothing accumulates across
/// invocations. The store hands the caller the `detached` slot of the invocation that
/// actually committed.
#[derive(Clone, Debug, Default)]
pub struct SessionUpdate {
	/// New session value to persist.
	pub session: OfflineSession,
	/// Reference detached by this invocation, carried back to the caller.
	pub detached: Option<RefreshTokenRef>,
}

/// Per-entity persistence contract implemented by admin storage backends.
pub trait AdminStore
where
	Self: Send + Sync,
{
	/// Persists a new client; reports [`StoreError::AlreadyExists`] on an id collision.
	fn create_client(&self, client: Client) -> StoreFuture<'_, ()>;

	/// Optimistically updates the client stored under `id`.
	fn update_client<'a>(
		&'a self,
		id: &'a str,
		updater: &'a ClientUpdater<'a>,
	) -> StoreFuture<'a, ()>;

	/// Deletes the client stored under `id`.
	fn delete_client<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;

	/// Lists all clients; ordering is whatever the backend provides.
	fn list_clients(&self) -> StoreFuture<'_, Vec<Client>>;

	/// Persists a new password; reports [`StoreError::AlreadyExists`] on an email collision.
	fn create_password(&self, password: Password) -> StoreFuture<'_, ()>;

	/// Optimistically updates the password stored under `email`.
	fn update_password<'a>(
		&'a self,
		email: &'a str,
		updater: &'a PasswordUpdater<'a>,
	) -> StoreFuture<'a, ()>;

	/// Deletes the password stored under `email`.
	fn delete_password<'a>(&'a self, email: &'a str) -> StoreFuture<'a, ()>;

	/// Fetches the password stored under `email`.
	fn get_password<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Password>;

	/// Lists all passwords; ordering is whatever the backend provides.
	fn list_passwords(&self) -> StoreFuture<'_, Vec<Password>>;

	/// Fetches the offline session aggregate for a user + connector pair.
	fn get_offline_session<'a>(
		&'a self,
		user_id: &'a str,
		conn_id: &'a str,
	) -> StoreFuture<'a, OfflineSession>;

	/// Optimistically updates the offline session for a user + connector pair, returning the
	/// side channel of the updater invocation that committed.
	fn update_offline_session<'a>(
		&'a self,
		user_id: &'a str,
		conn_id: &'a str,
		updater: &'a SessionUpdater<'a>,
	) -> StoreFuture<'a, Option<RefreshTokenRef>>;

	/// Deletes the standalone refresh token addressed by `token_id`.
	fn delete_refresh<'a>(&'a self, token_id: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`AdminStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The addressed record does not exist.
	#[error("Record not found.")]
	NotFound,
	/// A record with the same key already exists.
	#[error("Record already exists.")]
	AlreadyExists,
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Generates an unguessable identifier: 32 alphanumeric characters sampled from the thread
/// CSPRNG, roughly 190 bits of entropy.
pub fn new_id() -> String {
	rand::rng().sample_iter(Alphanumeric).take(ID_LEN).map(char::from).collect()
}
