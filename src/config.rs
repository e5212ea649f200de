//! Transport configuration shared by reqwest-backed authenticators.

// self
use crate::_prelude::*;

/// HTTP client settings applied by [`ReqwestHttpClient::from_config`].
///
/// The cookie store is always enabled: Okta and Duo track the attempt through cookies, so a
/// client without one cannot complete the flow.
///
/// [`ReqwestHttpClient::from_config`]: crate::http::ReqwestHttpClient::from_config
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Skips TLS certificate verification. Only meant for lab setups behind intercepting proxies.
	pub accept_invalid_certs: bool,
	/// `User-Agent` header sent with every request.
	pub user_agent: Option<String>,
	/// Per-request timeout in seconds; `None` disables the timeout.
	pub request_timeout_secs: Option<u64>,
	/// Maximum number of redirects followed by the session cookie redirect.
	pub max_redirects: usize,
}
impl ClientConfig {
	/// Default `User-Agent` value.
	pub const DEFAULT_USER_AGENT: &'static str =
		concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

	/// Overrides the TLS verification toggle.
	pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
		self.accept_invalid_certs = accept;

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_request_timeout_secs(mut self, secs: Option<u64>) -> Self {
		self.request_timeout_secs = secs;

		self
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			accept_invalid_certs: false,
			user_agent: Some(Self::DEFAULT_USER_AGENT.to_owned()),
			request_timeout_secs: Some(30),
			max_redirects: 10,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn partial_documents_fill_defaults() {
		let config: ClientConfig = serde_json::from_str(r#"{"accept_invalid_certs":true}"#)
			.expect("Partial config should deserialize.");

		assert!(config.accept_invalid_certs);
		assert_eq!(config.user_agent.as_deref(), Some(ClientConfig::DEFAULT_USER_AGENT));
		assert_eq!(config.request_timeout_secs, Some(30));
		assert_eq!(config.max_redirects, 10);
	}

	#[test]
	fn builders_override_fields() {
		let config =
			ClientConfig::default().with_accept_invalid_certs(true).with_request_timeout_secs(None);

		assert!(config.accept_invalid_certs);
		assert_eq!(config.request_timeout_secs, None);
	}
}
