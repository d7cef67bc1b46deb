//! Domain records managed by the administrative control plane.
//!
//! All records are owned and versioned by the storage backend; the service facade holds no
//! cached copies between calls.

// self
use crate::_prelude::*;

/// OAuth-style client registration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
	/// Unique client identifier; generated at creation when left empty.
	pub id: String,
	/// Client secret; generated at creation when left empty. List operations return it
	/// unredacted, so callers must scope access to those operations.
	pub secret: String,
	/// Ordered redirect URIs permitted for this client.
	pub redirect_uris: Vec<String>,
	/// Ids of peer clients trusted to exchange tokens on behalf of this one.
	pub trusted_peers: Vec<String>,
	/// Marks a public client that cannot hold a secret (native or in-browser apps).
	pub public: bool,
	/// Display name shown on consent screens.
	pub name: String,
	/// Logo URL shown on consent screens.
	pub logo_url: String,
}

/// Local username/password credential keyed by email.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Password {
	/// Unique email key; stores match it case-insensitively.
	pub email: String,
	/// Optional display username; an empty value is permitted.
	pub username: String,
	/// Identity-provider user id this credential belongs to.
	pub user_id: String,
	/// Salted adaptive hash with an embedded cost parameter. Never logged and never returned
	/// by list operations.
	pub hash: Vec<u8>,
}
impl From<Password> for PasswordSummary {
	fn from(password: Password) -> Self {
		Self { email: password.email, username: password.username, user_id: password.user_id }
	}
}
impl Debug for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Password")
			.field("email", &self.email)
			.field("username", &self.username)
			.field("user_id", &self.user_id)
			.field("hash", &"<redacted>")
			.finish()
	}
}

/// Identity projection of a [`Password`] returned by list operations; carries no hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordSummary {
	/// Unique email key.
	pub email: String,
	/// Optional display username.
	pub username: String,
	/// Identity-provider user id.
	pub user_id: String,
}

/// Aggregate of refresh-grant references for one (user, connector) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineSession {
	/// User the grants belong to.
	pub user_id: String,
	/// Identity connector the user authenticated through.
	pub conn_id: String,
	/// Refresh-token references keyed by the client id each token was issued to.
	pub refresh: HashMap<String, RefreshTokenRef>,
}

/// Lightweight pointer to a refresh token, stored inside an [`OfflineSession`].
///
/// Every reference should have a corresponding standalone [`RefreshToken`] record; the
/// reverse does not hold, since a failed revocation can leave an orphaned standalone record
/// behind (see the service-level revocation docs).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRef {
	/// Standalone token record id.
	pub id: String,
	/// Client the token was issued to.
	pub client_id: String,
	/// Creation instant.
	pub created_at: OffsetDateTime,
	/// Instant the token last minted an access token.
	pub last_used: OffsetDateTime,
}

/// Standalone refresh token record, addressed by token id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
	/// Unique token id.
	pub id: String,
	/// Client the token was issued to.
	pub client_id: String,
	/// Creation instant.
	pub created_at: OffsetDateTime,
	/// Instant the token last minted an access token.
	pub last_used: OffsetDateTime,
}
