//! End-user credentials and the Okta org endpoints derived from them.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, obs::Stage};

/// Username, password, and target supplied once per authentication attempt.
///
/// `target` is the Okta hostname, optionally followed by the app embed path
/// (`acme.okta.com/home/amazon_aws/0oa1/272`). A scheme may be included; bare targets are
/// treated as `https://`.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Okta username.
	pub username: String,
	/// Okta password.
	pub password: Secret,
	/// Okta hostname plus optional app path.
	pub target: String,
}
impl Credentials {
	/// Creates credentials for the provided target.
	pub fn new(
		username: impl Into<String>,
		password: impl Into<Secret>,
		target: impl Into<String>,
	) -> Self {
		Self { username: username.into(), password: password.into(), target: target.into() }
	}

	/// Resolves the entry URL and org endpoints for [`Credentials::target`].
	pub fn endpoints(&self) -> Result<OrgEndpoints> {
		OrgEndpoints::from_target(&self.target)
	}
}

/// Endpoints of one Okta org, anchored on the caller's entry URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrgEndpoints {
	entry: String,
	entry_url: Url,
}
impl OrgEndpoints {
	/// Parses a target into org endpoints.
	///
	/// Targets without a leading `http://` or `https://` get `https://` prepended.
	pub fn from_target(target: &str) -> Result<Self> {
		let entry = if has_http_scheme(target) { target.to_owned() } else { format!("https://{target}") };
		let entry_url = Url::parse(&entry).map_err(|source| ConfigError::InvalidUrl {
			stage: Stage::Authenticate,
			url: entry.clone(),
			source,
		})?;

		if entry_url.host_str().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingHost { target: target.to_owned() }.into());
		}

		Ok(Self { entry, entry_url })
	}

	/// Entry URL exactly as derived from the target; used as the SAML `redirectUrl`.
	pub fn entry(&self) -> &str {
		&self.entry
	}

	/// Scheme shared by the org and the MFA relay.
	pub fn scheme(&self) -> &str {
		self.entry_url.scheme()
	}

	/// Absolute org URL for an API path such as `/api/v1/authn`.
	pub fn org_url(&self, path: &str) -> Result<Url> {
		self.entry_url.join(path).map_err(|source| {
			ConfigError::InvalidUrl { stage: Stage::Authenticate, url: path.to_owned(), source }
				.into()
		})
	}

	/// Absolute URL on an MFA relay host announced by the identity provider.
	pub fn relay_url(&self, stage: Stage, relay_host: &str, path: &str) -> Result<Url> {
		let raw = format!("{}://{relay_host}{path}", self.scheme());

		Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidUrl { stage, url: raw.clone(), source }.into())
	}
}

fn has_http_scheme(target: &str) -> bool {
	["http://", "https://"].iter().any(|scheme| {
		target.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bare_target_defaults_to_https_and_keeps_app_path() {
		let endpoints = OrgEndpoints::from_target("acme.okta.com/home/amazon_aws/0oa1/272")
			.expect("Bare target should resolve.");

		assert_eq!(endpoints.entry(), "https://acme.okta.com/home/amazon_aws/0oa1/272");
		assert_eq!(
			endpoints.org_url("/api/v1/authn").expect("Org URL should join.").as_str(),
			"https://acme.okta.com/api/v1/authn"
		);
	}

	#[test]
	fn explicit_scheme_and_port_carry_to_relay_urls() {
		let endpoints =
			OrgEndpoints::from_target("http://127.0.0.1:8080").expect("URL target should resolve.");

		assert_eq!(endpoints.entry(), "http://127.0.0.1:8080");
		assert_eq!(
			endpoints.org_url("/api/v1/authn").expect("Org URL should join.").as_str(),
			"http://127.0.0.1:8080/api/v1/authn"
		);
		assert_eq!(
			endpoints
				.relay_url(Stage::DuoPrompt, "api-1.duo.test:9000", "/frame/prompt")
				.expect("Relay URL should parse.")
				.as_str(),
			"http://api-1.duo.test:9000/frame/prompt"
		);
	}

	#[test]
	fn scheme_is_only_detected_as_a_prefix() {
		let endpoints = OrgEndpoints::from_target("acme.okta.com/home/aws/0oa1/272?fromURI=https://x")
			.expect("Embedded URL in the query should not count as a scheme.");

		assert_eq!(endpoints.entry(), "https://acme.okta.com/home/aws/0oa1/272?fromURI=https://x");
		assert_eq!(endpoints.scheme(), "https");

		let endpoints =
			OrgEndpoints::from_target("HTTPS://acme.okta.com").expect("Scheme match is case-insensitive.");

		assert_eq!(endpoints.entry(), "HTTPS://acme.okta.com");
	}

	#[test]
	fn target_without_host_is_rejected() {
		let err = OrgEndpoints::from_target("").expect_err("Empty target should fail.");

		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn credentials_debug_hides_password() {
		let credentials = Credentials::new("jane", "hunter2", "acme.okta.com");

		assert!(!format!("{credentials:?}").contains("hunter2"));
	}
}
