//! Okta SAML broker: exchange end-user credentials for a SAML assertion through Okta's
//! authentication API, with SMS, TOTP, and Duo push MFA handled end to end.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod flows;
pub mod http;
pub mod mfa;
pub mod obs;
pub mod poll;
pub mod progress;
pub mod prompt;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::Authenticator, http::ReqwestHttpClient, poll::PollPolicy, progress::ProgressLog,
		prompt::ScriptedPrompter,
	};

	/// Authenticator type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAuthenticator = Authenticator<ReqwestHttpClient>;

	/// Builds a cookie-persisting reqwest HTTP client that accepts the self-signed
	/// certificates produced by `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`Authenticator`] wired to the scripted prompter, a progress log, and a
	/// zero-interval poll policy so Duo polling tests never wait.
	pub fn build_reqwest_test_authenticator(
		prompter: ScriptedPrompter,
	) -> (ReqwestTestAuthenticator, Arc<ScriptedPrompter>, Arc<ProgressLog>) {
		let prompter = Arc::new(prompter);
		let progress = Arc::new(ProgressLog::default());
		let authenticator: ReqwestTestAuthenticator = Authenticator::with_http_client(
			test_reqwest_http_client(),
			prompter.clone() as Arc<dyn crate::prompt::Prompter>,
		)
		.with_progress(progress.clone())
		.with_poll_policy(PollPolicy::default().with_interval(Duration::ZERO));

		(authenticator, prompter, progress)
	}
}

mod _prelude {
	pub use std::{
		collections::VecDeque,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
