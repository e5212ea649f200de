//! Factor verification through the factor's verify link.

// crates.io
use ::http::{HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::{OrgEndpoints, SessionToken, StateToken},
	flows::{
		Authenticator, authn,
		wire::{AuthnResponse, VerifyRequest},
	},
	http::{self, AuthHttpClient, HttpRequest},
	mfa::{MfaFactor, MfaKind},
	obs::Stage,
};

/// Text prompt used for SMS and TOTP passcodes.
pub const VERIFICATION_CODE_PROMPT: &str = "Enter verification code";

/// Header Okta expects (empty) on the post-Duo verify request.
pub const XSRF_HEADER: &str = "x-okta-xsrftoken";

impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Challenges `factor` and completes it according to its kind.
	pub(crate) async fn verify_factor(
		&self,
		endpoints: &OrgEndpoints,
		state_token: &StateToken,
		factor: &MfaFactor,
	) -> Result<SessionToken> {
		let verify_url = factor.require_verify_url(Stage::FactorChallenge)?;

		if factor.kind.uses_passcode() {
			// Only triggers delivery of the code; the reply (often a 403 for TOTP) is not inspected.
			self.dispatch(
				Stage::FactorChallenge,
				verify_request(Stage::FactorChallenge, &verify_url, state_token, None)?,
			)
			.await?;

			let code = self.prompter.text_required(VERIFICATION_CODE_PROMPT)?;
			let verified = self
				.post_verify(Stage::PasscodeVerification, &verify_url, state_token, Some(&code))
				.await?;

			return authn::session_token(verified);
		}

		match &factor.kind {
			MfaKind::DuoPush => {
				let challenge =
					self.post_verify(Stage::FactorChallenge, &verify_url, state_token, None).await?;

				self.verify_duo(endpoints, state_token, factor, &verify_url, challenge).await
			},
			kind => Err(Error::UnsupportedMfa { identifier: kind.identifier().to_owned() }),
		}
	}

	/// Posts `{stateToken[, passCode]}` to a verify link and decodes the transaction.
	pub(crate) async fn post_verify(
		&self,
		stage: Stage,
		verify_url: &Url,
		state_token: &StateToken,
		pass_code: Option<&str>,
	) -> Result<AuthnResponse> {
		self.dispatch_json(stage, verify_request(stage, verify_url, state_token, pass_code)?).await
	}

	/// Re-posts the state token once the factor completed out of band and reads the session
	/// token.
	pub(crate) async fn retrieve_session_token(
		&self,
		verify_url: &Url,
		state_token: &StateToken,
	) -> Result<SessionToken> {
		const STAGE: Stage = Stage::SessionTokenRetrieval;

		let mut request = verify_request(STAGE, verify_url, state_token, None)?;

		request.headers_mut().insert(HeaderName::from_static(XSRF_HEADER), HeaderValue::from_static(""));

		authn::session_token(self.dispatch_json(STAGE, request).await?)
	}
}

fn verify_request(
	stage: Stage,
	verify_url: &Url,
	state_token: &StateToken,
	pass_code: Option<&str>,
) -> Result<HttpRequest> {
	http::json_post(stage, verify_url, &VerifyRequest { state_token: state_token.expose(), pass_code })
}
