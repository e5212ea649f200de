//! MFA factor classification and selection.

// self
use crate::{
	_prelude::*,
	error::ProtocolError,
	obs::Stage,
	prompt::{self, Prompter},
};

/// Chooser prompt shown when more than one factor is enrolled.
pub const FACTOR_PROMPT: &str = "Select which MFA option to use";

/// Factor families the flow knows how to drive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MfaKind {
	/// Duo Security web factor (`DUO WEB`), approved by push or passcode.
	DuoPush,
	/// Okta SMS one-time passcode (`OKTA SMS`).
	SmsOtp,
	/// Google Authenticator TOTP (`GOOGLE TOKEN:SOFTWARE:TOTP`).
	TotpOtp,
	/// Any other factor; carries the upper-cased identifier.
	Unsupported(String),
}
impl MfaKind {
	/// Identifier of the Duo web factor.
	pub const DUO_WEB: &'static str = "DUO WEB";
	/// Identifier of the Okta SMS factor.
	pub const OKTA_SMS: &'static str = "OKTA SMS";
	/// Identifier of the Google TOTP factor.
	pub const GOOGLE_TOTP: &'static str = "GOOGLE TOKEN:SOFTWARE:TOTP";

	/// Builds the upper-cased `"<provider> <factorType>"` identifier.
	pub fn identifier_of(provider: &str, factor_type: &str) -> String {
		format!("{provider} {factor_type}").to_uppercase()
	}

	/// Classifies a factor from its provider and type, case-insensitively.
	pub fn from_parts(provider: &str, factor_type: &str) -> Self {
		Self::from_identifier(Self::identifier_of(provider, factor_type))
	}

	/// Classifies an already upper-cased identifier.
	pub fn from_identifier(identifier: String) -> Self {
		match identifier.as_str() {
			Self::DUO_WEB => Self::DuoPush,
			Self::OKTA_SMS => Self::SmsOtp,
			Self::GOOGLE_TOTP => Self::TotpOtp,
			_ => Self::Unsupported(identifier),
		}
	}

	/// Returns the upper-cased identifier this kind was classified from.
	pub fn identifier(&self) -> &str {
		match self {
			Self::DuoPush => Self::DUO_WEB,
			Self::SmsOtp => Self::OKTA_SMS,
			Self::TotpOtp => Self::GOOGLE_TOTP,
			Self::Unsupported(identifier) => identifier,
		}
	}

	/// Human-readable label presented to the user.
	pub fn label(&self) -> String {
		match self {
			Self::DuoPush => "DUO MFA authentication".into(),
			Self::SmsOtp => "SMS MFA authentication".into(),
			Self::TotpOtp => "TOTP MFA authentication".into(),
			Self::Unsupported(identifier) => format!("UNSUPPORTED: {identifier}"),
		}
	}

	/// Whether the flow can complete this factor.
	pub fn is_supported(&self) -> bool {
		!matches!(self, Self::Unsupported(_))
	}

	/// Whether the factor is verified with a user-typed passcode.
	pub fn uses_passcode(&self) -> bool {
		matches!(self, Self::SmsOtp | Self::TotpOtp)
	}
}
impl Display for MfaKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.identifier())
	}
}

/// One factor enrolled for the user, as advertised by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MfaFactor {
	/// Factor id used in the Duo callback.
	pub id: String,
	/// Raw provider name, e.g. `OKTA`.
	pub provider: String,
	/// Raw factor type, e.g. `sms`.
	pub factor_type: String,
	/// `_links.verify.href`, when advertised.
	pub verify_url: Option<String>,
	/// Classification derived from provider and type.
	pub kind: MfaKind,
}
impl MfaFactor {
	/// Builds a factor and classifies it.
	pub fn new(
		id: impl Into<String>,
		provider: impl Into<String>,
		factor_type: impl Into<String>,
		verify_url: Option<String>,
	) -> Self {
		let provider = provider.into();
		let factor_type = factor_type.into();
		let kind = MfaKind::from_parts(&provider, &factor_type);

		Self { id: id.into(), provider, factor_type, verify_url, kind }
	}

	/// Label presented to the user.
	pub fn label(&self) -> String {
		self.kind.label()
	}

	/// Returns the verify URL or a protocol error naming the missing link.
	pub fn require_verify_url(&self, stage: Stage) -> Result<Url> {
		let raw = self
			.verify_url
			.as_deref()
			.filter(|href| !href.is_empty())
			.ok_or(ProtocolError::MissingField { stage, field: "_links.verify.href" })?;

		Url::parse(raw).map_err(|source| {
			crate::error::ConfigError::InvalidUrl { stage, url: raw.to_owned(), source }.into()
		})
	}
}

/// Picks the factor to verify.
///
/// A single factor is chosen without prompting; several factors are offered to the chooser in
/// the order received, labelled with [`MfaKind::label`]. Choosing an unsupported factor fails
/// with [`Error::UnsupportedMfa`] before any network traffic.
pub fn select_factor<'a>(factors: &'a [MfaFactor], prompter: &dyn Prompter) -> Result<&'a MfaFactor> {
	let factor = match factors {
		[] => {
			return Err(ProtocolError::MissingField {
				stage: Stage::FactorSelection,
				field: "_embedded.factors",
			}
			.into());
		},
		[only] => only,
		_ => {
			let labels = factors.iter().map(MfaFactor::label).collect::<Vec<_>>();

			&factors[prompt::checked_choice(prompter, FACTOR_PROMPT, &labels)?]
		},
	};

	if !factor.kind.is_supported() {
		return Err(Error::UnsupportedMfa { identifier: factor.kind.identifier().to_owned() });
	}

	Ok(factor)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::prompt::ScriptedPrompter;

	fn factor(provider: &str, factor_type: &str) -> MfaFactor {
		MfaFactor::new(
			format!("id-{factor_type}"),
			provider,
			factor_type,
			Some(format!("https://acme.okta.com/verify/{factor_type}")),
		)
	}

	#[test]
	fn classification_is_case_insensitive() {
		assert_eq!(MfaKind::from_parts("duo", "web"), MfaKind::DuoPush);
		assert_eq!(MfaKind::from_parts("OKTA", "sms"), MfaKind::SmsOtp);
		assert_eq!(MfaKind::from_parts("Google", "token:software:totp"), MfaKind::TotpOtp);
		assert_eq!(
			MfaKind::from_parts("OKTA", "push"),
			MfaKind::Unsupported("OKTA PUSH".into())
		);
	}

	#[test]
	fn labels_match_factor_families() {
		assert_eq!(MfaKind::DuoPush.label(), "DUO MFA authentication");
		assert_eq!(MfaKind::SmsOtp.label(), "SMS MFA authentication");
		assert_eq!(MfaKind::TotpOtp.label(), "TOTP MFA authentication");
		assert_eq!(MfaKind::from_parts("okta", "push").label(), "UNSUPPORTED: OKTA PUSH");
		assert_eq!(MfaKind::TotpOtp.to_string(), MfaKind::GOOGLE_TOTP);
	}

	#[test]
	fn single_factor_is_selected_without_prompting() {
		let prompter = ScriptedPrompter::default();
		let factors = [factor("OKTA", "sms")];
		let chosen = select_factor(&factors, &prompter).expect("Single factor should be chosen.");

		assert_eq!(chosen.kind, MfaKind::SmsOtp);
		assert!(prompter.chooser_calls().is_empty());
	}

	#[test]
	fn several_factors_are_offered_in_order() {
		let prompter = ScriptedPrompter::default().with_choice(1);
		let factors = [factor("OKTA", "sms"), factor("GOOGLE", "token:software:totp")];
		let chosen = select_factor(&factors, &prompter).expect("Second factor should be chosen.");
		let calls = prompter.chooser_calls();

		assert_eq!(chosen.kind, MfaKind::TotpOtp);
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].prompt, FACTOR_PROMPT);
		assert_eq!(calls[0].options, vec!["SMS MFA authentication", "TOTP MFA authentication"]);
	}

	#[test]
	fn unsupported_choice_is_rejected() {
		let prompter = ScriptedPrompter::default().with_choice(0);
		let factors = [factor("OKTA", "push"), factor("OKTA", "sms")];
		let err = select_factor(&factors, &prompter).expect_err("Push is unsupported.");

		assert!(matches!(err, Error::UnsupportedMfa { ref identifier } if identifier == "OKTA PUSH"));
		assert_eq!(err.to_string(), "Unsupported MFA provider: OKTA PUSH.");
	}

	#[test]
	fn empty_factor_list_is_a_protocol_error() {
		let err = select_factor(&[], &ScriptedPrompter::default()).expect_err("No factors.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::MissingField { field: "_embedded.factors", .. })
		));
	}

	#[test]
	fn verify_url_is_required() {
		let mut sms = factor("OKTA", "sms");

		assert!(sms.require_verify_url(Stage::FactorChallenge).is_ok());

		sms.verify_url = None;

		assert!(matches!(
			sms.require_verify_url(Stage::FactorChallenge),
			Err(Error::Protocol(ProtocolError::MissingField { field: "_links.verify.href", .. }))
		));
	}
}
