//! Credential submission and the authn transaction state machine.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, OrgEndpoints, SessionToken, StateToken},
	error::ProtocolError,
	extract::json,
	flows::{
		Authenticator,
		wire::{AuthnRequest, AuthnResponse},
	},
	http::{self, AuthHttpClient},
	mfa::{self, MfaFactor},
	obs::Stage,
	progress::ProgressEvent,
};

/// Okta authn status that requires a factor before a session token is issued.
pub const MFA_REQUIRED: &str = "MFA_REQUIRED";
/// Path of the primary authentication endpoint.
pub const AUTHN_PATH: &str = "/api/v1/authn";

/// Next step after the credential submission.
#[derive(Debug)]
pub enum AuthnStep {
	/// A factor must be verified before a session token is issued.
	MfaRequired(MfaChallenge),
	/// The identity provider issued a session token directly.
	SessionIssued(SessionToken),
}
impl AuthnStep {
	pub(crate) fn from_response(response: AuthnResponse) -> Result<Self> {
		const STAGE: Stage = Stage::CredentialSubmission;

		if response.status.as_deref() != Some(MFA_REQUIRED) {
			return session_token(response).map(Self::SessionIssued);
		}

		let state_token = json::required(STAGE, "stateToken", response.state_token)?;
		let factors = response
			.embedded
			.and_then(|embedded| embedded.factors)
			.unwrap_or_default()
			.into_iter()
			.map(|factor| factor.into_factor())
			.collect();

		Ok(Self::MfaRequired(MfaChallenge { state_token: StateToken::new(state_token), factors }))
	}
}

/// Pending MFA requirement of one authentication attempt.
#[derive(Debug)]
pub struct MfaChallenge {
	/// State token that must accompany every verify request of this attempt.
	pub state_token: StateToken,
	/// Enrolled factors, in the order the identity provider listed them.
	pub factors: Vec<MfaFactor>,
}

/// Extracts the session token of a finished authn transaction.
pub(crate) fn session_token(response: AuthnResponse) -> Result<SessionToken> {
	match response.session_token {
		Some(token) if !token.is_empty() => Ok(SessionToken::new(token)),
		_ => Err(ProtocolError::MissingSessionToken { status: response.status }.into()),
	}
}

impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Posts username and password and classifies the response.
	pub async fn submit_credentials(
		&self,
		endpoints: &OrgEndpoints,
		credentials: &Credentials,
	) -> Result<AuthnStep> {
		const STAGE: Stage = Stage::CredentialSubmission;

		let url = endpoints.org_url(AUTHN_PATH)?;
		let request = http::json_post(
			STAGE,
			&url,
			&AuthnRequest {
				username: &credentials.username,
				password: credentials.password.expose(),
			},
		)?;
		let response = self.dispatch_json::<AuthnResponse>(STAGE, request).await?;

		AuthnStep::from_response(response)
	}

	/// Selects a factor, verifies it, and returns the session token it unlocks.
	pub async fn complete_mfa(
		&self,
		endpoints: &OrgEndpoints,
		challenge: &MfaChallenge,
	) -> Result<SessionToken> {
		let factor = mfa::select_factor(&challenge.factors, self.prompter.as_ref())?;

		self.emit(ProgressEvent::FactorSelected { label: factor.label() });
		self.verify_factor(endpoints, &challenge.state_token, factor).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::mfa::MfaKind;

	fn decode(body: &str) -> AuthnResponse {
		json::parse(Stage::CredentialSubmission, body.as_bytes()).expect("Test body should decode.")
	}

	#[test]
	fn success_status_carries_session_token() {
		let step = AuthnStep::from_response(decode(r#"{"status":"SUCCESS","sessionToken":"S"}"#))
			.expect("Session token should be extracted.");

		assert!(matches!(step, AuthnStep::SessionIssued(ref token) if token.expose() == "S"));
	}

	#[test]
	fn missing_session_token_names_the_status() {
		let err = AuthnStep::from_response(decode(r#"{"status":"LOCKED_OUT"}"#))
			.expect_err("No session token should fail.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::MissingSessionToken { ref status })
				if status.as_deref() == Some("LOCKED_OUT")
		));
	}

	#[test]
	fn mfa_required_keeps_factor_order() {
		let step = AuthnStep::from_response(decode(
			r#"{"status":"MFA_REQUIRED","stateToken":"st1","_embedded":{"factors":[
				{"id":"a","provider":"OKTA","factorType":"sms","_links":{"verify":{"href":"https://o/a"}}},
				{"id":"b","provider":"DUO","factorType":"web","_links":{"verify":{"href":"https://o/b"}}}
			]}}"#,
		))
		.expect("MFA response should decode.");
		let AuthnStep::MfaRequired(challenge) = step else {
			panic!("Expected an MFA challenge.");
		};

		assert_eq!(challenge.state_token.expose(), "st1");
		assert_eq!(
			challenge.factors.iter().map(|factor| factor.kind.clone()).collect::<Vec<_>>(),
			vec![MfaKind::SmsOtp, MfaKind::DuoPush]
		);
	}

	#[test]
	fn mfa_required_without_state_token_fails() {
		let err = AuthnStep::from_response(decode(r#"{"status":"MFA_REQUIRED"}"#))
			.expect_err("State token is required.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::MissingField { field: "stateToken", .. })
		));
	}
}
