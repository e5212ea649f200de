//! Opaque tokens issued by the identity provider during one authentication attempt.

// self
use crate::_prelude::*;

macro_rules! def_token {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq)]
		pub struct $name(String);
		impl $name {
			/// Wraps a token value returned by the identity provider.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the raw token. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
	};
}

def_token!(
	StateToken,
	"Short-lived token identifying one in-progress authentication attempt.\n\nIt is issued by \
	 the first `/api/v1/authn` response and must accompany every verify and callback request \
	 of the same attempt unmodified."
);
def_token!(SessionToken, "One-time token exchanged for an Okta session cookie.");

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_debug_redacts() {
		let token = StateToken::new("00abc");

		assert_eq!(format!("{token:?}"), "StateToken(\"<redacted>\")");
		assert_eq!(token.expose(), "00abc");
		assert_eq!(format!("{:?}", SessionToken::new("x")), "SessionToken(\"<redacted>\")");
	}
}
