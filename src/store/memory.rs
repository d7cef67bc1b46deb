//! Thread-safe in-memory [`AdminStore`] and the reference implementation of the
//! optimistic-update contract.
//!
//! Every entry carries a version counter. An update snapshots `(version, value)` under a
//! read lock, runs the caller's updater outside any lock, then commits under the write lock
//! only if the version is unchanged; otherwise it retries against a fresh snapshot, up to a
//! bounded attempt budget. Updaters therefore really do run more than once under contention.

// std
use std::hash::Hash;
// self
use crate::{
	_prelude::*,
	record::{Client, OfflineSession, Password, RefreshToken, RefreshTokenRef},
	store::{
		AdminStore, ClientUpdater, PasswordUpdater, SessionUpdater, StoreError, StoreFuture,
	},
};

const MAX_UPDATE_ATTEMPTS: usize = 8;

#[derive(Clone, Debug)]
struct Versioned<T> {
	version: u64,
	value: T,
}

type Table<K, T> = Arc<RwLock<HashMap<K, Versioned<T>>>>;

/// In-memory storage backend for tests, demos, and single-process deployments.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	clients: Table<String, Client>,
	passwords: Table<String, Password>,
	sessions: Table<(String, String), OfflineSession>,
	refresh_tokens: Table<String, RefreshToken>,
}
impl MemoryStore {
	/// Seeds an offline session, replacing any existing aggregate for the pair and bumping
	/// its version so in-flight optimistic updates restart.
	pub fn insert_offline_session(&self, session: OfflineSession) {
		let key = (session.user_id.clone(), session.conn_id.clone());

		Self::upsert(&self.sessions, key, session);
	}

	/// Seeds a standalone refresh token record.
	pub fn insert_refresh(&self, token: RefreshToken) {
		Self::upsert(&self.refresh_tokens, token.id.clone(), token);
	}

	/// Returns the standalone refresh token, if present.
	pub fn refresh_token(&self, token_id: &str) -> Option<RefreshToken> {
		self.refresh_tokens.read().get(token_id).map(|entry| entry.value.clone())
	}

	/// Returns the stored client record, if present.
	pub fn client(&self, id: &str) -> Option<Client> {
		self.clients.read().get(id).map(|entry| entry.value.clone())
	}

	/// Returns the offline session for the pair, if present.
	pub fn offline_session(&self, user_id: &str, conn_id: &str) -> Option<OfflineSession> {
		self.sessions
			.read()
			.get(&(user_id.to_owned(), conn_id.to_owned()))
			.map(|entry| entry.value.clone())
	}

	fn upsert<K, T>(table: &Table<K, T>, key: K, value: T)
	where
		K: Eq + Hash,
	{
		let mut guard = table.write();

		match guard.get_mut(&key) {
			Some(entry) => {
				entry.version += 1;
				entry.value = value;
			},
			None => {
				guard.insert(key, Versioned { version: 0, value });
			},
		}
	}

	fn insert_new<K, T>(table: &Table<K, T>, key: K, value: T) -> Result<(), StoreError>
	where
		K: Eq + Hash,
	{
		let mut guard = table.write();

		if guard.contains_key(&key) {
			return Err(StoreError::AlreadyExists);
		}

		guard.insert(key, Versioned { version: 0, value });

		Ok(())
	}

	fn remove<K, T>(table: &Table<K, T>, key: &K) -> Result<(), StoreError>
	where
		K: Eq + Hash,
	{
		table.write().remove(key).map(|_| ()).ok_or(StoreError::NotFound)
	}

	fn fetch<K, T>(table: &Table<K, T>, key: &K) -> Result<T, StoreError>
	where
		K: Eq + Hash,
		T: Clone,
	{
		table.read().get(key).map(|entry| entry.value.clone()).ok_or(StoreError::NotFound)
	}

	fn list<K, T>(table: &Table<K, T>) -> Vec<T>
	where
		T: Clone,
	{
		table.read().values().map(|entry| entry.value.clone()).collect()
	}

	fn update<K, T, R>(
		table: &Table<K, T>,
		key: &K,
		apply: impl Fn(T) -> Result<(T, R), StoreError>,
	) -> Result<R, StoreError>
	where
		K: Eq + Hash,
		T: Clone,
	{
		for _ in 0..MAX_UPDATE_ATTEMPTS {
			let (version, snapshot) = {
				let guard = table.read();
				let entry = guard.get(key).ok_or(StoreError::NotFound)?;

				(entry.version, entry.value.clone())
			};
			// Runs outside any lock and may race a concurrent writer; the version check below
			// detects that and retries against a fresh snapshot.
			let (next, out) = apply(snapshot)?;
			let mut guard = table.write();

			match guard.get_mut(key) {
				Some(entry) if entry.version == version => {
					entry.version += 1;
					entry.value = next;

					return Ok(out);
				},
				Some(_) => continue,
				None => return Err(StoreError::NotFound),
			}
		}

		Err(StoreError::Backend {
			message: format!("optimistic update gave up after {MAX_UPDATE_ATTEMPTS} attempts"),
		})
	}
}
impl AdminStore for MemoryStore {
	fn create_client(&self, client: Client) -> StoreFuture<'_, ()> {
		let table = self.clients.clone();

		Box::pin(async move { Self::insert_new(&table, client.id.clone(), client) })
	}

	fn update_client<'a>(
		&'a self,
		id: &'a str,
		updater: &'a ClientUpdater<'a>,
	) -> StoreFuture<'a, ()> {
		let table = self.clients.clone();
		let key = id.to_owned();

		Box::pin(async move {
			Self::update(&table, &key, |client| updater(client).map(|next| (next, ())))
		})
	}

	fn delete_client<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
		let table = self.clients.clone();
		let key = id.to_owned();

		Box::pin(async move { Self::remove(&table, &key) })
	}

	fn list_clients(&self) -> StoreFuture<'_, Vec<Client>> {
		let table = self.clients.clone();

		Box::pin(async move { Ok(Self::list(&table)) })
	}

	fn create_password(&self, password: Password) -> StoreFuture<'_, ()> {
		let table = self.passwords.clone();

		Box::pin(async move {
			Self::insert_new(&table, password.email.to_lowercase(), password)
		})
	}

	fn update_password<'a>(
		&'a self,
		email: &'a str,
		updater: &'a PasswordUpdater<'a>,
	) -> StoreFuture<'a, ()> {
		let table = self.passwords.clone();
		let key = email.to_lowercase();

		Box::pin(async move {
			Self::update(&table, &key, |password| updater(password).map(|next| (next, ())))
		})
	}

	fn delete_password<'a>(&'a self, email: &'a str) -> StoreFuture<'a, ()> {
		let table = self.passwords.clone();
		let key = email.to_lowercase();

		Box::pin(async move { Self::remove(&table, &key) })
	}

	fn get_password<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Password> {
		let table = self.passwords.clone();
		let key = email.to_lowercase();

		Box::pin(async move { Self::fetch(&table, &key) })
	}

	fn list_passwords(&self) -> StoreFuture<'_, Vec<Password>> {
		let table = self.passwords.clone();

		Box::pin(async move { Ok(Self::list(&table)) })
	}

	fn get_offline_session<'a>(
		&'a self,
		user_id: &'a str,
		conn_id: &'a str,
	) -> StoreFuture<'a, OfflineSession> {
		let table = self.sessions.clone();
		let key = (user_id.to_owned(), conn_id.to_owned());

		Box::pin(async move { Self::fetch(&table, &key) })
	}

	fn update_offline_session<'a>(
		&'a self,
		user_id: &'a str,
		conn_id: &'a str,
		updater: &'a SessionUpdater<'a>,
	) -> StoreFuture<'a, Option<RefreshTokenRef>> {
		let table = self.sessions.clone();
		let key = (user_id.to_owned(), conn_id.to_owned());

		Box::pin(async move {
			Self::update(&table, &key, |session| {
				updater(session).map(|update| (update.session, update.detached))
			})
		})
	}

	fn delete_refresh<'a>(&'a self, token_id: &'a str) -> StoreFuture<'a, ()> {
		let table = self.refresh_tokens.clone();
		let key = token_id.to_owned();

		Box::pin(async move { Self::remove(&table, &key) })
	}
}
