//! Minimal HTML form scraping for the two documents the flow has to read: the Duo frame that
//! carries the `sid` and the Okta app page that carries the `SAMLResponse`.
//!
//! Only `<input>` tags are inspected. Attribute values are entity-decoded the way an HTML
//! parser would decode them.

// std
use std::{borrow::Cow, sync::LazyLock};
// crates.io
use regex::Regex;

static INPUT_TAG: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)<input\b(?:[^>"']|"[^"]*"|'[^']*')*>"#)
		.expect("Input tag pattern should compile.")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
		.expect("Attribute pattern should compile.")
});

/// Returns the decoded `value` of the first `<input>` whose `name` equals `name`.
///
/// An input that has the name but no `value` attribute yields an empty string, matching how
/// browsers submit such fields.
pub fn input_value(document: &str, name: &str) -> Option<String> {
	INPUT_TAG.find_iter(document).find_map(|tag| {
		let mut matched = false;
		let mut value = None;

		for attr in ATTRIBUTE.captures_iter(tag.as_str()) {
			let raw = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4));
			let raw = raw.map(|m| m.as_str()).unwrap_or_default();

			match attr[1].to_ascii_lowercase().as_str() {
				"name" => matched = unescape(raw) == name,
				"value" if value.is_none() => value = Some(unescape(raw).into_owned()),
				_ => {},
			}
		}

		matched.then(|| value.unwrap_or_default())
	})
}

/// Decodes HTML character references (`&amp;`, `&#39;`, `&#x2B;`, ...).
///
/// Only `amp`, `lt`, `gt`, `quot`, `apos` and `nbsp` are recognised by name; any code point
/// may be written numerically. A reference must end in `;` within its first 12 characters.
/// Unknown names, legacy references without the `;` (`&amp` alone) and out-of-range code
/// points are kept verbatim. Okta and Duo only emit the recognised forms in hidden inputs.
pub fn unescape(input: &str) -> Cow<'_, str> {
	if !input.contains('&') {
		return Cow::Borrowed(input);
	}

	let mut out = String::with_capacity(input.len());
	let mut rest = input;

	while let Some(start) = rest.find('&') {
		out.push_str(&rest[..start]);
		rest = &rest[start..];

		match decode_reference(rest) {
			Some((ch, consumed)) => {
				out.push(ch);
				rest = &rest[consumed..];
			},
			None => {
				out.push('&');
				rest = &rest[1..];
			},
		}
	}

	out.push_str(rest);

	Cow::Owned(out)
}

// `input` starts with `&`; returns the decoded char and the byte length of the reference.
fn decode_reference(input: &str) -> Option<(char, usize)> {
	const MAX_REFERENCE_LEN: usize = 12;

	let end = input.char_indices().take(MAX_REFERENCE_LEN).find(|(_, c)| *c == ';')?.0;
	let body = &input[1..end];
	let ch = if let Some(numeric) = body.strip_prefix('#') {
		let code = match numeric.strip_prefix(['x', 'X']) {
			Some(hex) => u32::from_str_radix(hex, 16).ok()?,
			None => numeric.parse::<u32>().ok()?,
		};

		char::from_u32(code)?
	} else {
		match body {
			"amp" => '&',
			"lt" => '<',
			"gt" => '>',
			"quot" => '"',
			"apos" => '\'',
			"nbsp" => '\u{a0}',
			_ => return None,
		}
	};

	Some((ch, end + 1))
}
