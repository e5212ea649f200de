//! Broker-level error types shared across flows, transports, and extractors.

// self
use crate::{_prelude::*, obs::Stage};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used wherever a transport or collaborator supplies its own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider or MFA relay broke the expected protocol contract.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Interactive collaborator failed to produce an answer.
	#[error(transparent)]
	Prompt(#[from] crate::prompt::PromptError),

	/// The selected MFA factor is not one the broker can drive.
	#[error("Unsupported MFA provider: {identifier}.")]
	UnsupportedMfa {
		/// Upper-cased `"<provider> <factorType>"` identifier of the factor.
		identifier: String,
	},
	/// The MFA relay reported that the device denied or failed the challenge.
	#[error("Failed to authenticate the MFA device during {stage}.")]
	DeviceAuthentication {
		/// Stage that observed the failure.
		stage: Stage,
	},
	/// The configured poll bound elapsed before the device answered.
	#[error("MFA device did not answer within {attempts} status polls.")]
	PollExhausted {
		/// Number of status requests issued before giving up.
		attempts: u32,
	},
}

/// Configuration and request construction failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error("Unable to build the {stage} request.")]
	HttpRequest {
		/// Stage whose request could not be built.
		stage: Stage,
		/// Underlying builder failure.
		#[source]
		source: ::http::Error,
	},
	/// Request body could not be encoded.
	#[error("Unable to encode the {stage} request body.")]
	RequestBody {
		/// Stage whose body could not be encoded.
		stage: Stage,
		/// Underlying encoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// A URL supplied by the caller or the server could not be parsed.
	#[error("Invalid URL `{url}` during {stage}.")]
	InvalidUrl {
		/// Stage that attempted to parse the URL.
		stage: Stage,
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The entry URL has no host component to derive the Okta org from.
	#[error("Target `{target}` does not name a host.")]
	MissingHost {
		/// Target hostname as supplied by the caller.
		target: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during {stage}.")]
	Network {
		/// Stage whose request failed.
		stage: Stage,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(stage: Stage, src: impl Into<BoxError>) -> Self {
		Self::Network { stage, source: src.into() }
	}
}

/// Protocol-contract violations raised while reading provider responses.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Response body could not be decoded into the expected shape.
	#[error("Response to {stage} is not valid JSON at `{}`.", .source.path())]
	MalformedJson {
		/// Stage whose response failed to decode.
		stage: Stage,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A field the protocol requires was absent.
	#[error("Response to {stage} is missing `{field}`.")]
	MissingField {
		/// Stage whose response lacked the field.
		stage: Stage,
		/// Dotted path of the missing field.
		field: &'static str,
	},
	/// A named hidden input could not be located in an HTML document.
	#[error("Unable to locate the `{name}` input in the {stage} response.")]
	MissingInput {
		/// Stage whose HTML lacked the input.
		stage: Stage,
		/// `name` attribute that was searched for.
		name: &'static str,
	},
	/// The MFA relay answered with a `stat` other than `OK`.
	#[error("MFA relay returned stat `{stat}` during {stage}.")]
	UnexpectedStat {
		/// Stage that observed the value.
		stage: Stage,
		/// Raw `stat` value (empty when absent).
		stat: String,
	},
	/// The Duo signature did not contain the `TX:APP` separator.
	#[error("Duo signature is not a `TX:APP` pair.")]
	MalformedSignature,
	/// The identity provider or MFA relay rejected the request with a non-success status.
	#[error("Server rejected {stage} with HTTP {status}: {}.", .summary.as_deref().unwrap_or("no summary"))]
	Rejected {
		/// Stage whose request was rejected.
		stage: Stage,
		/// HTTP status code.
		status: u16,
		/// Okta `errorCode`, when present.
		code: Option<String>,
		/// Okta `errorSummary`, when present.
		summary: Option<String>,
	},
	/// The authentication response did not carry a session token.
	#[error("Authentication finished with status `{}` but no session token.", .status.as_deref().unwrap_or("unknown"))]
	MissingSessionToken {
		/// Okta `status` reported alongside the response, when present.
		status: Option<String>,
	},
}
