//! Duo Security web factor: relay session, push/passcode transaction, status polling, and the
//! signed callback that completes the Okta factor.

// self
use crate::{
	_prelude::*,
	auth::{OrgEndpoints, SessionToken, StateToken},
	error::{ConfigError, ProtocolError},
	extract::{html, json},
	flows::{
		Authenticator, common,
		wire::{AuthnResponse, DuoEnvelope, DuoPromptResponse, DuoStatusResponse},
	},
	http::{self, AuthHttpClient},
	mfa::MfaFactor,
	obs::{self, Stage},
	poll::PollStatus,
	progress::ProgressEvent,
	prompt,
};

/// Chooser prompt for the Duo transaction type.
pub const DUO_OPTION_PROMPT: &str = "Select a DUO MFA Option";
/// Text prompt for a Duo passcode.
pub const DUO_PASSCODE_PROMPT: &str = "Enter passcode";

/// Duo `tx` and `app` signature pair (`"TX|...:APP|..."`) issued by Okta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuoSignature {
	/// Transaction signature sent to the relay as `tx`.
	pub transaction: String,
	/// Application signature echoed back to Okta in `sig_response`.
	pub application: String,
}
impl DuoSignature {
	/// Builds the `sig_response` value from the relay cookie.
	pub fn sig_response(&self, cookie: &str) -> String {
		format!("{cookie}:{}", self.application)
	}
}
impl FromStr for DuoSignature {
	type Err = ProtocolError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (transaction, application) = s.split_once(':').ok_or(ProtocolError::MalformedSignature)?;

		Ok(Self { transaction: transaction.to_owned(), application: application.to_owned() })
	}
}

/// Duo challenge embedded in the factor challenge response.
///
/// The relay `sid`, transaction id, and signed cookie are produced by the later relay calls and
/// threaded alongside this value until the callback to Okta succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuoChallenge {
	/// Relay host, e.g. `api-1234.duosecurity.com`.
	pub host: String,
	/// Signature pair.
	pub signature: DuoSignature,
	/// Okta callback receiving the signed relay response.
	pub callback_url: String,
}
impl DuoChallenge {
	pub(crate) fn from_response(response: AuthnResponse) -> Result<Self> {
		const STAGE: Stage = Stage::FactorChallenge;

		let verification = response
			.embedded
			.and_then(|embedded| embedded.factor)
			.and_then(|factor| factor.embedded)
			.and_then(|embedded| embedded.verification)
			.unwrap_or_default();
		let host =
			json::required(STAGE, "_embedded.factor._embedded.verification.host", verification.host)?;
		let signature = json::required(
			STAGE,
			"_embedded.factor._embedded.verification.signature",
			verification.signature,
		)?
		.parse::<DuoSignature>()?;
		let callback_url = json::required(
			STAGE,
			"_embedded.factor._embedded.verification._links.complete.href",
			verification.links.and_then(|links| links.complete).and_then(|link| link.href),
		)?;

		Ok(Self { host, signature, callback_url })
	}
}

/// Transaction type offered by the Duo relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuoFactor {
	/// User types a passcode from the Duo app or a hardware token.
	Passcode,
	/// Duo pushes an approval request to the enrolled device.
	Push,
}
impl DuoFactor {
	/// Options in the order they are offered to the chooser.
	pub const ALL: [Self; 2] = [Self::Passcode, Self::Push];

	/// Label shown to the user and sent to the relay as `factor`.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Passcode => "Passcode",
			Self::Push => "Duo Push",
		}
	}
}

impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Completes a Duo factor whose challenge response is `challenge`.
	pub(crate) async fn verify_duo(
		&self,
		endpoints: &OrgEndpoints,
		state_token: &StateToken,
		factor: &MfaFactor,
		verify_url: &Url,
		challenge: AuthnResponse,
	) -> Result<SessionToken> {
		let duo = DuoChallenge::from_response(challenge)?;
		let sid = self.duo_initiate(endpoints, &duo).await?;
		let options = DuoFactor::ALL.iter().map(|f| f.label().to_owned()).collect::<Vec<_>>();
		let duo_factor = DuoFactor::ALL
			[prompt::checked_choice(self.prompter.as_ref(), DUO_OPTION_PROMPT, &options)?];
		let passcode = match duo_factor {
			DuoFactor::Passcode => Some(self.prompter.text_required(DUO_PASSCODE_PROMPT)?),
			DuoFactor::Push => None,
		};
		let txid = self
			.duo_prompt(endpoints, &duo.host, &sid, duo_factor, passcode.as_deref())
			.await?;
		let cookie = self.duo_await_cookie(endpoints, &duo.host, &sid, &txid).await?;

		self.duo_callback(&duo, factor, state_token, &cookie).await?;
		self.retrieve_session_token(verify_url, state_token).await
	}

	/// Opens the relay session and returns its `sid`.
	async fn duo_initiate(
		&self,
		endpoints: &OrgEndpoints,
		duo: &DuoChallenge,
	) -> Result<String> {
		const STAGE: Stage = Stage::DuoInitiation;

		let mut url = endpoints.relay_url(STAGE, &duo.host, "/frame/web/v1/auth")?;

		url.query_pairs_mut().append_pair("tx", &duo.signature.transaction);

		let parent = endpoints.org_url("/signin/verify/duo/web")?;
		let request = http::form_post(
			STAGE,
			&url,
			&[
				("parent", parent.as_str()),
				("java_version", ""),
				("flash_version", ""),
				("screen_resolution_width", "3008"),
				("screen_resolution_height", "1692"),
				("color_depth", "24"),
			],
		)?;
		let response = self.dispatch_ok(STAGE, request).await?;
		let document = common::body_text(&response);
		let sid = html::input_value(&document, "sid")
			.map(|sid| html::unescape(&sid).into_owned())
			.filter(|sid| !sid.is_empty())
			.ok_or(ProtocolError::MissingInput { stage: STAGE, name: "sid" })?;

		Ok(sid)
	}

	/// Starts a push or passcode transaction and returns its `txid`.
	async fn duo_prompt(
		&self,
		endpoints: &OrgEndpoints,
		host: &str,
		sid: &str,
		factor: DuoFactor,
		passcode: Option<&str>,
	) -> Result<String> {
		const STAGE: Stage = Stage::DuoPrompt;

		let url = endpoints.relay_url(STAGE, host, "/frame/prompt")?;
		let mut fields = vec![
			("sid", sid),
			("device", "phone1"),
			("factor", factor.label()),
			("out_of_date", "false"),
		];

		if let Some(passcode) = passcode {
			fields.push(("passcode", passcode));
		}

		let envelope = self
			.dispatch_json::<DuoEnvelope<DuoPromptResponse>>(
				STAGE,
				http::form_post(STAGE, &url, &fields)?,
			)
			.await?;

		ensure_stat_ok(STAGE, envelope.stat)?;

		json::required(STAGE, "response.txid", envelope.response.and_then(|r| r.txid))
	}

	/// Polls the relay until the transaction resolves and returns the signed cookie.
	async fn duo_await_cookie(
		&self,
		endpoints: &OrgEndpoints,
		host: &str,
		sid: &str,
		txid: &str,
	) -> Result<String> {
		const STAGE: Stage = Stage::DuoStatus;

		let url = endpoints.relay_url(STAGE, host, "/frame/status")?;
		let url = &url;

		self.poll_policy
			.run(
				self.sleeper.as_ref(),
				|attempt| async move {
					let request = http::form_post(STAGE, url, &[("sid", sid), ("txid", txid)])?;
					let envelope =
						self.dispatch_json::<DuoEnvelope<DuoStatusResponse>>(STAGE, request).await?;

					ensure_stat_ok(STAGE, envelope.stat)?;

					let status = envelope.response.unwrap_or_default();
					let result = status.result.unwrap_or_default();

					obs::trace_poll(attempt, &result);
					obs::record_duo_poll(&result);

					if let Some(message) = status.status {
						self.emit(ProgressEvent::DuoStatus { message });
					}

					match result.as_str() {
						"SUCCESS" => json::required(STAGE, "response.cookie", status.cookie)
							.map(PollStatus::Ready),
						"FAILURE" => Err(Error::DeviceAuthentication { stage: STAGE }),
						_ => Ok(PollStatus::Pending),
					}
				},
				|attempt| self.emit(ProgressEvent::DuoWaiting { attempt }),
			)
			.await
	}

	/// Posts the signed relay response to Okta's callback.
	async fn duo_callback(
		&self,
		duo: &DuoChallenge,
		factor: &MfaFactor,
		state_token: &StateToken,
		cookie: &str,
	) -> Result<()> {
		const STAGE: Stage = Stage::DuoCallback;

		let url = Url::parse(&duo.callback_url).map_err(|source| ConfigError::InvalidUrl {
			stage: STAGE,
			url: duo.callback_url.clone(),
			source,
		})?;
		let sig_response = duo.signature.sig_response(cookie);
		let request = http::form_post(
			STAGE,
			&url,
			&[
				("id", factor.id.as_str()),
				("stateToken", state_token.expose()),
				("sig_response", sig_response.as_str()),
			],
		)?;

		// The callback answers with an HTML page; only the follow-up verify call is decisive.
		self.dispatch(STAGE, request).await?;

		Ok(())
	}
}

/// Rejects relay envelopes whose `stat` is anything but `OK`.
fn ensure_stat_ok(stage: Stage, stat: Option<String>) -> Result<()> {
	match stat.as_deref() {
		Some("OK") => Ok(()),
		_ => Err(ProtocolError::UnexpectedStat { stage, stat: stat.unwrap_or_default() }.into()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_splits_on_first_colon() {
		let signature: DuoSignature =
			"TX|abc:APP|def:ghi".parse().expect("Signature should split.");

		assert_eq!(signature.transaction, "TX|abc");
		assert_eq!(signature.application, "APP|def:ghi");
		assert_eq!(signature.sig_response("AUTH|cookie"), "AUTH|cookie:APP|def:ghi");
		assert!(matches!("TX|abc".parse::<DuoSignature>(), Err(ProtocolError::MalformedSignature)));
	}

	#[test]
	fn challenge_reads_embedded_verification() {
		let response: AuthnResponse = json::parse(
			Stage::FactorChallenge,
			br#"{"status":"MFA_CHALLENGE","_embedded":{"factor":{"id":"d1","_embedded":{"verification":{
				"host":"api-1.duosecurity.com",
				"signature":"TX|t:APP|a",
				"_links":{"complete":{"href":"https://acme.okta.com/api/v1/authn/factors/d1/lifecycle/duoCallback"}}
			}}}}}"#,
		)
		.expect("Challenge should decode.");
		let duo = DuoChallenge::from_response(response).expect("Challenge should be complete.");

		assert_eq!(duo.host, "api-1.duosecurity.com");
		assert_eq!(duo.signature.transaction, "TX|t");
		assert!(duo.callback_url.ends_with("/duoCallback"));
	}

	#[test]
	fn challenge_requires_callback_link() {
		let response: AuthnResponse = json::parse(
			Stage::FactorChallenge,
			br#"{"_embedded":{"factor":{"_embedded":{"verification":{"host":"h","signature":"a:b"}}}}}"#,
		)
		.expect("Challenge should decode.");

		assert!(matches!(
			DuoChallenge::from_response(response),
			Err(Error::Protocol(ProtocolError::MissingField {
				field: "_embedded.factor._embedded.verification._links.complete.href",
				..
			}))
		));
	}

	#[test]
	fn duo_factor_labels_are_stable() {
		assert_eq!(DuoFactor::ALL.map(DuoFactor::label), ["Passcode", "Duo Push"]);
	}
}
