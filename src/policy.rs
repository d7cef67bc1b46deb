//! Credential-strength policy enforced before a password hash is accepted into storage.

// crates.io
use bcrypt::HashParts;
// self
use crate::_prelude::*;

/// Recommended bcrypt cost, balancing hash strength and verification latency.
pub const RECOMMENDED_COST: u32 = 12;
/// Upper bound on accepted bcrypt cost: high enough for strong hashes, low enough that a
/// single verification cannot monopolize a server core.
pub const UPPER_BOUND_COST: u32 = 16;

/// Errors produced by [`PasswordPolicy::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum PolicyError {
	/// The hash could not be parsed as a bcrypt credential.
	#[error("Unable to parse the credential hash: {message}.")]
	MalformedCredential {
		/// Parser failure summary.
		message: String,
	},
	/// The embedded cost is below the minimum acceptable bound, making the hash too cheap to
	/// brute-force.
	#[error("Hash cost {cost} does not meet the minimum cost requirement {minimum}.")]
	CostTooLow {
		/// Cost embedded in the rejected hash.
		cost: u32,
		/// Minimum acceptable cost.
		minimum: u32,
	},
	/// The embedded cost exceeds the configured upper bound, making verification expensive
	/// enough to enable denial of service.
	#[error("Hash cost {cost} is above the upper bound {maximum}; recommended cost is {recommended}.")]
	CostTooHigh {
		/// Cost embedded in the rejected hash.
		cost: u32,
		/// Maximum acceptable cost.
		maximum: u32,
		/// Recommended operating cost.
		recommended: u32,
	},
}

/// Error returned when [`PasswordPolicy::new`] receives inconsistent bounds.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Policy bounds must satisfy min {min} <= recommended {recommended} < max {max}.")]
pub struct PolicyBoundsError {
	/// Rejected minimum cost.
	pub min: u32,
	/// Rejected recommended cost.
	pub recommended: u32,
	/// Rejected maximum cost.
	pub max: u32,
}

/// Acceptance bounds for bcrypt cost parameters.
///
/// The bounds are a per-deployment policy knob, not a cryptographic requirement; the default
/// rejects hashes cheaper than the algorithm's default cost and caps server-side CPU spend
/// per verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
	min_cost: u32,
	recommended_cost: u32,
	max_cost: u32,
}
impl PasswordPolicy {
	/// Builds a policy after checking `min_cost <= recommended_cost < max_cost`.
	pub fn new(min_cost: u32, recommended_cost: u32, max_cost: u32) -> Result<Self, PolicyBoundsError> {
		if min_cost > recommended_cost || recommended_cost >= max_cost {
			return Err(PolicyBoundsError { min: min_cost, recommended: recommended_cost, max: max_cost });
		}

		Ok(Self { min_cost, recommended_cost, max_cost })
	}

	/// Minimum acceptable cost.
	pub fn min_cost(&self) -> u32 {
		self.min_cost
	}

	/// Recommended operating cost.
	pub fn recommended_cost(&self) -> u32 {
		self.recommended_cost
	}

	/// Maximum acceptable cost.
	pub fn max_cost(&self) -> u32 {
		self.max_cost
	}

	/// Validates the cost embedded in a bcrypt hash against the policy bounds.
	///
	/// Side-effect free and deterministic; only the hash header is parsed, the key derivation
	/// itself never runs.
	pub fn validate(&self, hash: &[u8]) -> Result<(), PolicyError> {
		let text = std::str::from_utf8(hash)
			.map_err(|err| PolicyError::MalformedCredential { message: err.to_string() })?;
		let cost = HashParts::from_str(text)
			.map_err(|err| PolicyError::MalformedCredential { message: err.to_string() })?
			.get_cost();

		if cost < self.min_cost {
			return Err(PolicyError::CostTooLow { cost, minimum: self.min_cost });
		}
		if cost > self.max_cost {
			return Err(PolicyError::CostTooHigh {
				cost,
				maximum: self.max_cost,
				recommended: self.recommended_cost,
			});
		}

		Ok(())
	}
}
impl Default for PasswordPolicy {
	fn default() -> Self {
		Self {
			min_cost: bcrypt::DEFAULT_COST,
			recommended_cost: RECOMMENDED_COST,
			max_cost: UPPER_BOUND_COST,
		}
	}
}
