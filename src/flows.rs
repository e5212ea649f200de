//! Authentication flow orchestrated by [`Authenticator`].
//!
//! One call to [`Authenticator::authenticate`] walks the whole protocol:
//!
//! 1. submit username and password to `/api/v1/authn`;
//! 2. when MFA is required, pick a factor and verify it (SMS/TOTP passcode or Duo web);
//! 3. trade the resulting session token for the SAML form at `/login/sessionCookieRedirect`.
//!
//! Each step lives in its own module as an `impl` block on [`Authenticator`].

pub mod authn;
pub mod duo;

mod common;
mod session;
mod verify;
mod wire;

pub use authn::*;
pub use duo::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, SamlAssertion},
	http::AuthHttpClient,
	obs::{self, FlowOutcome, FlowSpan, Stage},
	poll::{PollPolicy, Sleeper, TokioSleeper},
	progress::{ProgressEvent, ProgressSink, StdoutProgress},
	prompt::Prompter,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient>;

/// Drives Okta authentication attempts end to end.
///
/// The authenticator owns the HTTP transport (whose cookie jar carries the attempt), the
/// prompter consulted for factor choice and passcodes, the progress sink, and the polling
/// policy used while waiting on Duo. Attempts on one authenticator are serialized because
/// they share the transport's cookie jar.
#[derive(Clone)]
pub struct Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	/// Source of factor choices and passcodes.
	pub prompter: Arc<dyn Prompter>,
	/// Receiver of progress events.
	pub progress: Arc<dyn ProgressSink>,
	/// Sleeper used between Duo status polls.
	pub sleeper: Arc<dyn Sleeper>,
	/// Interval and bound applied to Duo status polling.
	pub poll_policy: PollPolicy,
	attempt_guard: Arc<AsyncMutex<()>>,
}
impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Creates an authenticator that reuses the caller-provided transport.
	pub fn with_http_client(http_client: impl Into<Arc<C>>, prompter: Arc<dyn Prompter>) -> Self {
		Self {
			http_client: http_client.into(),
			prompter,
			progress: Arc::new(StdoutProgress),
			sleeper: Arc::new(TokioSleeper),
			poll_policy: PollPolicy::default(),
			attempt_guard: Default::default(),
		}
	}

	/// Replaces the progress sink (defaults to [`StdoutProgress`]).
	pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
		self.progress = progress;

		self
	}

	/// Replaces the sleeper used between polls (defaults to [`TokioSleeper`]).
	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.sleeper = sleeper;

		self
	}

	/// Replaces the Duo polling policy.
	pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
		self.poll_policy = policy;

		self
	}

	/// Authenticates `credentials` and returns the SAML assertion issued for the target app.
	///
	/// Concurrent calls on the same authenticator run one after another.
	pub async fn authenticate(&self, credentials: &Credentials) -> Result<SamlAssertion> {
		const STAGE: Stage = Stage::Authenticate;

		let span = FlowSpan::new(STAGE);

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _attempt = self.attempt_guard.lock().await;
				let endpoints = credentials.endpoints()?;
				let session_token = match self.submit_credentials(&endpoints, credentials).await? {
					AuthnStep::SessionIssued(token) => token,
					AuthnStep::MfaRequired(challenge) =>
						self.complete_mfa(&endpoints, &challenge).await?,
				};

				self.exchange_session(&endpoints, &session_token).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Failure),
		}

		result
	}

	pub(crate) fn emit(&self, event: ProgressEvent) {
		self.progress.emit(&event);
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient> {
	/// Creates an authenticator backed by a default cookie-persisting reqwest client.
	pub fn new(prompter: Arc<dyn Prompter>) -> Result<Self> {
		Ok(Self::with_http_client(ReqwestHttpClient::new()?, prompter))
	}
}
impl<C> Debug for Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("poll_policy", &self.poll_policy).finish()
	}
}
