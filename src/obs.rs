//! Optional observability helpers for the authentication flow.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `okta_saml_broker.flow` with the `stage`
//!   field set to the protocol step being executed.
//! - Enable `metrics` to increment the `okta_saml_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`, and the
//!   `okta_saml_broker_duo_poll_total` counter for each Duo status response, labeled by
//!   `result`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Protocol steps observed by the broker.
///
/// Every transport and protocol error carries the stage that produced it so callers can tell
/// which round-trip of the flow failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Whole `authenticate` call.
	Authenticate,
	/// Username/password submission to `/api/v1/authn`.
	CredentialSubmission,
	/// Choosing one of the enrolled MFA factors.
	FactorSelection,
	/// Verify-link call that starts a factor challenge.
	FactorChallenge,
	/// Verify-link call that submits a one-time passcode.
	PasscodeVerification,
	/// Duo `/frame/web/v1/auth` call that issues the `sid`.
	DuoInitiation,
	/// Duo `/frame/prompt` call that starts a push or passcode transaction.
	DuoPrompt,
	/// Duo `/frame/status` call, including every poll.
	DuoStatus,
	/// Callback posting the Duo signature response back to Okta.
	DuoCallback,
	/// Verify-link call that trades the completed state token for a session token.
	SessionTokenRetrieval,
	/// `/login/sessionCookieRedirect` call that yields the SAML form.
	SessionExchange,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Authenticate => "authenticate",
			Stage::CredentialSubmission => "credential_submission",
			Stage::FactorSelection => "factor_selection",
			Stage::FactorChallenge => "factor_challenge",
			Stage::PasscodeVerification => "passcode_verification",
			Stage::DuoInitiation => "duo_initiation",
			Stage::DuoPrompt => "duo_prompt",
			Stage::DuoStatus => "duo_status",
			Stage::DuoCallback => "duo_callback",
			Stage::SessionTokenRetrieval => "session_token_retrieval",
			Stage::SessionExchange => "session_exchange",
		}
	}

	/// Human-readable description used in error messages.
	pub const fn description(self) -> &'static str {
		match self {
			Stage::Authenticate => "authentication",
			Stage::CredentialSubmission => "credential submission",
			Stage::FactorSelection => "MFA factor selection",
			Stage::FactorChallenge => "MFA factor challenge",
			Stage::PasscodeVerification => "passcode verification",
			Stage::DuoInitiation => "Duo session initiation",
			Stage::DuoPrompt => "Duo prompt",
			Stage::DuoStatus => "Duo status polling",
			Stage::DuoCallback => "Duo callback",
			Stage::SessionTokenRetrieval => "session token retrieval",
			Stage::SessionExchange => "session cookie redirect",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.description())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stage_labels_are_snake_case_and_descriptions_are_prose() {
		assert_eq!(Stage::DuoStatus.as_str(), "duo_status");
		assert_eq!(Stage::SessionExchange.to_string(), "session cookie redirect");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}
}
