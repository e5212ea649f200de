//! Shared helpers for flow steps (dispatch, status checks, body decoding).

// self
use crate::{
	_prelude::*,
	error::{ProtocolError, TransportError},
	extract::json,
	flows::{Authenticator, wire::OktaErrorBody},
	http::{AuthHttpClient, HttpRequest, HttpResponse},
	obs::{FlowSpan, Stage},
};

impl<C> Authenticator<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Sends one request inside a span tagged with `stage`.
	pub(crate) async fn dispatch(&self, stage: Stage, request: HttpRequest) -> Result<HttpResponse> {
		FlowSpan::new(stage)
			.instrument(self.http_client.execute(request))
			.await
			.map_err(|e| TransportError::network(stage, e).into())
	}

	/// Sends one request and rejects non-success statuses.
	pub(crate) async fn dispatch_ok(
		&self,
		stage: Stage,
		request: HttpRequest,
	) -> Result<HttpResponse> {
		let response = self.dispatch(stage, request).await?;

		ensure_success(stage, &response)?;

		Ok(response)
	}

	/// Sends one request and decodes its JSON body into `T`.
	pub(crate) async fn dispatch_json<T>(&self, stage: Stage, request: HttpRequest) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let response = self.dispatch_ok(stage, request).await?;

		json::parse(stage, response.body())
	}
}

/// Maps a non-success status to [`ProtocolError::Rejected`], surfacing Okta's error body.
pub(crate) fn ensure_success(stage: Stage, response: &HttpResponse) -> Result<()> {
	let status = response.status();

	if status.is_success() {
		return Ok(());
	}

	let body = serde_json::from_slice::<OktaErrorBody>(response.body()).unwrap_or_default();

	Err(ProtocolError::Rejected {
		stage,
		status: status.as_u16(),
		code: body.error_code,
		summary: body.error_summary,
	}
	.into())
}

/// Reads a response body as (lossy) UTF-8 text.
pub(crate) fn body_text(response: &HttpResponse) -> std::borrow::Cow<'_, str> {
	String::from_utf8_lossy(response.body())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			::http::StatusCode::from_u16(status).expect("Test status should be valid.");

		response
	}

	#[test]
	fn success_statuses_pass() {
		assert!(ensure_success(Stage::CredentialSubmission, &response(200, "{}")).is_ok());
	}

	#[test]
	fn okta_error_bodies_are_surfaced() {
		let err = ensure_success(
			Stage::CredentialSubmission,
			&response(
				401,
				r#"{"errorCode":"E0000004","errorSummary":"Authentication failed","errorCauses":[]}"#,
			),
		)
		.expect_err("401 should be rejected.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::Rejected {
				stage: Stage::CredentialSubmission,
				status: 401,
				ref code,
				..
			}) if code.as_deref() == Some("E0000004")
		));
		assert_eq!(
			err.to_string(),
			"Server rejected credential submission with HTTP 401: Authentication failed."
		);
	}

	#[test]
	fn non_json_error_bodies_still_reject() {
		let err = ensure_success(Stage::SessionExchange, &response(502, "<html>bad gateway</html>"))
			.expect_err("502 should be rejected.");

		assert_eq!(
			err.to_string(),
			"Server rejected session cookie redirect with HTTP 502: no summary."
		);
	}
}
