//! Classification of `401` responses into GoodData authentication challenges.

// crates.io
use ::http::{StatusCode, header::WWW_AUTHENTICATE};
// self
use crate::{_prelude::*, http::HttpResponse};

/// `WWW-Authenticate` marker requesting a super-secure token.
pub const COOKIE_GDC_AUTH_SST: &str = "cookie=GDCAuthSST";
/// `WWW-Authenticate` marker requesting a temporary token.
pub const COOKIE_GDC_AUTH_TT: &str = "cookie=GDCAuthTT";

/// Authentication challenge carried by a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Challenge {
	/// The server wants a (new) super-secure token.
	Sst,
	/// The server wants a (new) temporary token.
	Tt,
	/// Not a GoodData challenge; the response is handed back untouched.
	None,
}
impl Challenge {
	/// Classifies a response.
	///
	/// Only `401` responses carrying a recognized `WWW-Authenticate` value count as challenges.
	/// Header values are inspected in order and the first recognized one wins.
	pub fn classify(response: &HttpResponse) -> Self {
		if response.status() != StatusCode::UNAUTHORIZED {
			return Self::None;
		}

		response
			.headers()
			.get_all(WWW_AUTHENTICATE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.find_map(Self::from_header_value)
			.unwrap_or(Self::None)
	}

	/// Returns `true` for [`Challenge::Sst`] and [`Challenge::Tt`].
	pub const fn is_challenge(self) -> bool {
		!matches!(self, Self::None)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Sst => "sst",
			Self::Tt => "tt",
			Self::None => "none",
		}
	}

	fn from_header_value(value: &str) -> Option<Self> {
		if value.contains(COOKIE_GDC_AUTH_SST) {
			Some(Self::Sst)
		} else if value.contains(COOKIE_GDC_AUTH_TT) {
			Some(Self::Tt)
		} else {
			None
		}
	}
}
impl Display for Challenge {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
