//! Opaque identity-token subject codec addressing a user + connector pair.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decoded subject embedded in identity tokens.
///
/// Decoded at most once per request that needs to address an offline session; never persisted
/// by this subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenSubject {
	/// User the subject addresses.
	pub user_id: String,
	/// Identity connector the user authenticated through.
	pub conn_id: String,
}

/// Errors produced by [`SubjectCodec`] implementations.
#[derive(Debug, ThisError)]
pub enum SubjectError {
	/// The encoded subject could not be decoded.
	#[error("Malformed identity-token subject.")]
	Decode {
		/// Underlying decoding failure.
		#[source]
		source: BoxError,
	},
	/// The subject could not be encoded.
	#[error("Unable to encode identity-token subject.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Marshal/unmarshal service for identity-token subjects, kept behind a trait so deployments
/// can swap in their token stack's own encoding.
pub trait SubjectCodec: Send + Sync {
	/// Encodes a subject into its opaque wire form.
	fn marshal(&self, subject: &IdTokenSubject) -> Result<String, SubjectError>;

	/// Decodes the opaque wire form back into a subject.
	fn unmarshal(&self, raw: &str) -> Result<IdTokenSubject, SubjectError>;
}

/// Default codec: JSON payload wrapped in unpadded URL-safe base64.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64SubjectCodec;
impl SubjectCodec for Base64SubjectCodec {
	fn marshal(&self, subject: &IdTokenSubject) -> Result<String, SubjectError> {
		let payload =
			serde_json::to_vec(subject).map_err(|err| SubjectError::Encode { source: err })?;

		Ok(URL_SAFE_NO_PAD.encode(payload))
	}

	fn unmarshal(&self, raw: &str) -> Result<IdTokenSubject, SubjectError> {
		let payload = URL_SAFE_NO_PAD
			.decode(raw)
			.map_err(|err| SubjectError::Decode { source: Box::new(err) })?;

		serde_json::from_slice(&payload)
			.map_err(|err| SubjectError::Decode { source: Box::new(err) })
	}
}
