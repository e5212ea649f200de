//! SAML assertion returned by a successful authentication.

// crates.io
use base64::{DecodeError, Engine as _, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Base64-encoded SAML response scraped from the `SAMLResponse` form field.
///
/// The broker never interprets the assertion; [`SamlAssertion::decode`] is provided for callers
/// that need the raw XML.
#[derive(Clone, PartialEq, Eq)]
pub struct SamlAssertion(String);
impl SamlAssertion {
	/// Wraps an encoded assertion.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the encoded assertion exactly as the identity provider emitted it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the encoded assertion.
	pub fn into_inner(self) -> String {
		self.0
	}

	/// Decodes the standard-alphabet base64 payload into raw XML bytes.
	pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
		let compact = self.0.split_ascii_whitespace().collect::<String>();

		STANDARD.decode(compact)
	}
}
impl Debug for SamlAssertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SamlAssertion").field("len", &self.0.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decode_ignores_line_breaks() {
		let assertion = SamlAssertion::new("YXNz\nZXJ0aW9u");

		assert_eq!(
			assertion.decode().expect("Wrapped base64 should decode successfully."),
			b"assertion"
		);
		assert_eq!(format!("{assertion:?}"), "SamlAssertion { len: 13 }");
	}
}
