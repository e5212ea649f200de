//! Session token exchange for the SAML assertion.

// self
use crate::{
	_prelude::*,
	auth::{OrgEndpoints, SamlAssertion, SessionToken},
	error::ProtocolError,
	extract::html,
	flows::{Authenticator, common},
	http::{self, AuthHttpClient},
	obs::Stage,
};

/// Path that turns a session token into a session cookie and redirects to the app.
pub const SESSION_REDIRECT_PATH: &str = "/login/sessionCookieRedirect";

impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Follows the session cookie redirect to the entry URL and scrapes `SAMLResponse`.
	pub(crate) async fn exchange_session(
		&self,
		endpoints: &OrgEndpoints,
		session_token: &SessionToken,
	) -> Result<SamlAssertion> {
		const STAGE: Stage = Stage::SessionExchange;

		let mut url = endpoints.org_url(SESSION_REDIRECT_PATH)?;

		url.query_pairs_mut()
			.append_pair("checkAccountSetupComplete", "true")
			.append_pair("token", session_token.expose())
			.append_pair("redirectUrl", endpoints.entry());

		let response = self.dispatch_ok(STAGE, http::get(STAGE, &url)?).await?;
		let assertion = html::input_value(&common::body_text(&response), "SAMLResponse")
			.filter(|value| !value.is_empty())
			.ok_or(ProtocolError::MissingInput { stage: STAGE, name: "SAMLResponse" })?;

		Ok(SamlAssertion::new(assertion))
	}
}
