//! Secure token secret wrapper that redacts sensitive material.

// crates.io
use ::http::HeaderValue;
// self
use crate::{_prelude::*, error::AuthError};

/// Redacted secret wrapper keeping SSTs, TTs, and passwords out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Converts the secret into a sensitive header value.
	pub fn to_header_value(&self) -> Result<HeaderValue, AuthError> {
		let mut value =
			HeaderValue::from_str(&self.0).map_err(|_| AuthError::InvalidHeaderValue)?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
