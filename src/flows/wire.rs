//! Partial wire shapes of the Okta authn API and the Duo frame API.
//!
//! Every field is optional; presence is enforced by the step that needs it so the error can
//! name the stage and field.

// self
use crate::{_prelude::*, mfa::MfaFactor};

/// `POST /api/v1/authn` body.
#[derive(Debug, Serialize)]
pub(crate) struct AuthnRequest<'a> {
	pub username: &'a str,
	pub password: &'a str,
}

/// Body posted to a factor verify link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyRequest<'a> {
	pub state_token: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pass_code: Option<&'a str>,
}

/// Okta authn transaction as returned by `/api/v1/authn` and verify links.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthnResponse {
	pub status: Option<String>,
	pub state_token: Option<String>,
	pub session_token: Option<String>,
	#[serde(rename = "_embedded")]
	pub embedded: Option<AuthnEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthnEmbedded {
	pub factors: Option<Vec<FactorWire>>,
	pub factor: Option<FactorWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FactorWire {
	pub id: Option<String>,
	pub provider: Option<String>,
	pub factor_type: Option<String>,
	#[serde(rename = "_links")]
	pub links: Option<Links>,
	#[serde(rename = "_embedded")]
	pub embedded: Option<FactorEmbedded>,
}
impl FactorWire {
	pub(crate) fn into_factor(self) -> MfaFactor {
		let verify_url = self.links.and_then(|links| links.verify).and_then(|link| link.href);

		MfaFactor::new(
			self.id.unwrap_or_default(),
			self.provider.unwrap_or_default(),
			self.factor_type.unwrap_or_default(),
			verify_url,
		)
	}
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
	pub verify: Option<Link>,
	pub complete: Option<Link>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Link {
	pub href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FactorEmbedded {
	pub verification: Option<DuoVerificationWire>,
}

/// `_embedded.factor._embedded.verification` of a Duo challenge.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DuoVerificationWire {
	pub host: Option<String>,
	pub signature: Option<String>,
	#[serde(rename = "_links")]
	pub links: Option<Links>,
}

/// Okta error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OktaErrorBody {
	pub error_code: Option<String>,
	pub error_summary: Option<String>,
}

/// Envelope shared by Duo frame endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct DuoEnvelope<T> {
	pub stat: Option<String>,
	pub response: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DuoPromptResponse {
	pub txid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DuoStatusResponse {
	pub result: Option<String>,
	pub cookie: Option<String>,
	pub status: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{extract::json, mfa::MfaKind, obs::Stage};

	#[test]
	fn mfa_required_response_decodes_factors() {
		let body = br#"{
			"status": "MFA_REQUIRED",
			"stateToken": "st1",
			"_embedded": {
				"user": { "id": "u1" },
				"factors": [{
					"id": "f1",
					"factorType": "sms",
					"provider": "OKTA",
					"profile": { "phoneNumber": "+1 XXX-XXX-0000" },
					"_links": { "verify": { "href": "https://acme.okta.com/api/v1/authn/factors/f1/verify" } }
				}]
			},
			"_links": { "cancel": { "href": "https://acme.okta.com/api/v1/authn/cancel" } }
		}"#;
		let response: AuthnResponse =
			json::parse(Stage::CredentialSubmission, body).expect("Authn body should decode.");
		let factor = response
			.embedded
			.and_then(|embedded| embedded.factors)
			.and_then(|factors| factors.into_iter().next())
			.expect("One factor should be present.")
			.into_factor();

		assert_eq!(response.state_token.as_deref(), Some("st1"));
		assert_eq!(factor.kind, MfaKind::SmsOtp);
		assert_eq!(
			factor.verify_url.as_deref(),
			Some("https://acme.okta.com/api/v1/authn/factors/f1/verify")
		);
	}

	#[test]
	fn verify_request_omits_absent_passcode() {
		let bare = serde_json::to_value(VerifyRequest { state_token: "st1", pass_code: None })
			.expect("Verify body should encode.");
		let with_code =
			serde_json::to_value(VerifyRequest { state_token: "st1", pass_code: Some("123456") })
				.expect("Verify body should encode.");

		assert_eq!(bare, serde_json::json!({ "stateToken": "st1" }));
		assert_eq!(with_code, serde_json::json!({ "stateToken": "st1", "passCode": "123456" }));
	}
}
