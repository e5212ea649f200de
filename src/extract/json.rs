//! Typed decoding of provider JSON bodies.
//!
//! Okta and Duo responses are read through partial `serde` structures whose fields are all
//! optional, so unknown or absent fields never fail decoding. Missing required values are
//! reported afterwards through [`required`], which names the dotted path that was expected.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ProtocolError, obs::Stage};

/// Decodes `body` into `T`, reporting the failing JSON path on error.
pub fn parse<T>(stage: Stage, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ProtocolError::MalformedJson { stage, source }.into())
}

/// Unwraps an optional field, failing with [`ProtocolError::MissingField`] when absent or empty.
pub fn required(stage: Stage, field: &'static str, value: Option<String>) -> Result<String> {
	match value {
		Some(value) if !value.is_empty() => Ok(value),
		_ => Err(ProtocolError::MissingField { stage, field }.into()),
	}
}
