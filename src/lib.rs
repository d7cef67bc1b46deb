//! Administrative control plane for an identity provider: manage client registrations and
//! password credentials, and inspect or revoke refresh-token grants, over a storage backend
//! that offers only optimistic per-key updates.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod policy;
pub mod record;
pub mod service;
pub mod store;
pub mod subject;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{service::AdminService, store::MemoryStore};

	/// Constructs an [`AdminService`] backed by a fresh in-memory store, returning the store
	/// handle as well so tests can seed and inspect storage state directly.
	pub fn build_memory_admin() -> (AdminService, Arc<MemoryStore>) {
		let backend = Arc::new(MemoryStore::default());
		let service = AdminService::new(backend.clone());

		(service, backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use tokio as _;
