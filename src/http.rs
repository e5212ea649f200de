//! Transport primitives for the authentication flow.
//!
//! The flow depends on HTTP only through [`AuthHttpClient`]: a single `execute` call that takes
//! a fully built [`HttpRequest`] and yields the buffered [`HttpResponse`]. Implementations must
//! keep cookies across calls (Okta and Duo both track the attempt in cookies) and follow
//! redirects, since the session exchange ends on the application page after a redirect chain.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::{
	HeaderValue, Method,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
#[cfg(feature = "reqwest")] use crate::config::ClientConfig;
use crate::{_prelude::*, error::ConfigError, obs::Stage};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";
const ANY: &str = "text/html, application/json;q=0.9, */*;q=0.8";

/// Request type accepted by [`AuthHttpClient::execute`].
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Buffered response returned by [`AuthHttpClient::execute`].
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`AuthHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports able to drive the authentication flow.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back several
/// authenticators, and the futures they return must be `Send` so callers can spawn the flow
/// on multi-threaded executors.
pub trait AuthHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and buffers the response body.
	///
	/// Non-success statuses are returned as responses, not errors; only failures to obtain a
	/// response at all belong in [`AuthHttpClient::TransportError`].
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Builds a JSON `POST` request.
pub(crate) fn json_post<T>(stage: Stage, url: &Url, body: &T) -> Result<HttpRequest>
where
	T: ?Sized + Serialize,
{
	let body = serde_json::to_vec(body)
		.map_err(|source| ConfigError::RequestBody { stage, source })?;

	build(stage, Method::POST, url, Some(JSON), JSON, body)
}

/// Builds a `application/x-www-form-urlencoded` `POST` request.
pub(crate) fn form_post(stage: Stage, url: &Url, fields: &[(&str, &str)]) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(fields).finish();

	build(stage, Method::POST, url, Some(FORM), ANY, body.into_bytes())
}

/// Builds a bodiless `GET` request.
pub(crate) fn get(stage: Stage, url: &Url) -> Result<HttpRequest> {
	build(stage, Method::GET, url, None, ANY, Vec::new())
}

fn build(
	stage: Stage,
	method: Method,
	url: &Url,
	content_type: Option<&'static str>,
	accept: &'static str,
	body: Vec<u8>,
) -> Result<HttpRequest> {
	let mut builder = ::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(ACCEPT, HeaderValue::from_static(accept));

	if let Some(content_type) = content_type {
		builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(content_type));
	}

	Ok(builder.body(body).map_err(|source| ConfigError::HttpRequest { stage, source })?)
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built by this type always carry a cookie store. When wrapping a custom
/// [`ReqwestClient`] through [`ReqwestHttpClient::with_client`], enable
/// `cookie_store(true)` yourself or the Duo and session steps will fail.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client from [`ClientConfig::default`].
	pub fn new() -> Result<Self> {
		Self::from_config(&ClientConfig::default())
	}

	/// Builds a cookie-persisting client honoring `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		let mut builder = ReqwestClient::builder()
			.cookie_store(true)
			.redirect(reqwest::redirect::Policy::limited(config.max_redirects))
			.danger_accept_invalid_certs(config.accept_invalid_certs);

		if let Some(user_agent) = &config.user_agent {
			builder = builder.user_agent(user_agent);
		}
		if let Some(secs) = config.request_timeout_secs {
			builder = builder.timeout(std::time::Duration::from_secs(secs));
		}

		Ok(Self(builder.build().map_err(ConfigError::from)?))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AuthHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Test URL should parse.")
	}

	#[test]
	fn json_post_sets_content_type_and_body() {
		let request = json_post(
			Stage::CredentialSubmission,
			&url("https://acme.okta.com/api/v1/authn"),
			&serde_json::json!({ "username": "alice" }),
		)
		.expect("JSON request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://acme.okta.com/api/v1/authn");
		assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
		assert_eq!(request.headers()[ACCEPT], "application/json");
		assert_eq!(request.body(), br#"{"username":"alice"}"#);
	}

	#[test]
	fn form_post_encodes_fields_in_order() {
		let request = form_post(
			Stage::DuoPrompt,
			&url("https://api-1.duosecurity.com/frame/prompt"),
			&[("sid", "a|b=c"), ("factor", "Duo Push")],
		)
		.expect("Form request should build.");

		assert_eq!(request.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
		assert_eq!(request.body(), b"sid=a%7Cb%3Dc&factor=Duo+Push");
	}

	#[test]
	fn get_keeps_query_and_has_no_body() {
		let request = get(Stage::SessionExchange, &url("https://acme.okta.com/login?token=t%2B1"))
			.expect("GET request should build.");

		assert_eq!(request.method(), Method::GET);
		assert_eq!(request.uri().query(), Some("token=t%2B1"));
		assert!(request.body().is_empty());
		assert!(request.headers().get(CONTENT_TYPE).is_none());
	}
}
