//! Token extraction from login and token endpoint bodies.
//!
//! Both endpoints answer with a single wrapper object holding a `token` field, e.g.
//! `{"userLogin":{"profile":"...","token":"<SST>","state":"..."}}` and
//! `{"userToken":{"token":"<TT>"}}`. Fields next to `token` are ignored, but the document
//! itself must consist of the wrapper key alone.

// self
use crate::{_prelude::*, auth::TokenSecret, error::AuthError};

const SST_ENTITY: &str = "userLogin";
const TT_ENTITY: &str = "userToken";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UserLogin {
	#[serde(rename = "userLogin")]
	entity: TokenField,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UserToken {
	#[serde(rename = "userToken")]
	entity: TokenField,
}

#[derive(Deserialize)]
struct TokenField {
	token: String,
}

/// Extracts the super-secure token from a login response body.
pub fn extract_sst(body: &[u8]) -> Result<TokenSecret, AuthError> {
	let parsed: UserLogin = parse(body, SST_ENTITY)?;

	non_empty(parsed.entity, SST_ENTITY)
}

/// Extracts the temporary token from a token endpoint response body.
pub fn extract_tt(body: &[u8]) -> Result<TokenSecret, AuthError> {
	let parsed: UserToken = parse(body, TT_ENTITY)?;

	non_empty(parsed.entity, TT_ENTITY)
}

fn parse<T>(body: &[u8], entity: &'static str) -> Result<T, AuthError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| AuthError::MalformedTokenBody { entity, source })
}

fn non_empty(field: TokenField, entity: &'static str) -> Result<TokenSecret, AuthError> {
	if field.token.trim().is_empty() {
		return Err(AuthError::EmptyToken { entity });
	}

	Ok(TokenSecret::new(field.token))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn extracts_sst_among_sibling_fields() {
		let body = br#"{
			"userLogin" : {
				"profile" : "/gdc/account/profile/1",
				"token" : "nbWW7peskrKbSMYj",
				"state" : "/gdc/account/login/1"
			}
		}"#;
		let sst = extract_sst(body).expect("SST fixture should parse.");

		assert_eq!(sst.expose(), "nbWW7peskrKbSMYj");
	}

	#[test]
	fn extracts_tt() {
		let tt = extract_tt(br#"{"userToken":{"token":"nbWW7peskrKbSMYj"}}"#)
			.expect("TT fixture should parse.");

		assert_eq!(tt.expose(), "nbWW7peskrKbSMYj");
	}

	#[test]
	fn empty_object_and_garbage_fail_for_both() {
		for body in [&b"{}"[..], &b"not json"[..], &b""[..]] {
			assert!(matches!(extract_sst(body), Err(AuthError::MalformedTokenBody { .. })));
			assert!(matches!(extract_tt(body), Err(AuthError::MalformedTokenBody { .. })));
		}
	}

	#[test]
	fn wrapper_keys_are_not_interchangeable() {
		let err = extract_sst(br#"{"userToken":{"token":"abc"}}"#)
			.expect_err("A TT body must not yield an SST.");

		assert!(matches!(err, AuthError::MalformedTokenBody { entity: "userLogin", .. }));
	}

	#[test]
	fn extra_top_level_keys_are_rejected() {
		let err = extract_tt(br#"{"userToken":{"token":"x"},"evil":1}"#)
			.expect_err("Only the wrapper key may appear at the top level.");

		assert!(matches!(err, AuthError::MalformedTokenBody { entity: "userToken", .. }));
		assert!(extract_sst(br#"{"userLogin":{"token":"x"},"userToken":{"token":"y"}}"#).is_err());
	}

	#[test]
	fn null_or_empty_token_fails() {
		let err = extract_tt(br#"{"userToken":{"token":null}}"#)
			.expect_err("A null token must be rejected.");

		match err {
			AuthError::MalformedTokenBody { source, .. } =>
				assert_eq!(source.path().to_string(), "userToken.token"),
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert!(matches!(
			extract_tt(br#"{"userToken":{"token":""}}"#),
			Err(AuthError::EmptyToken { entity: "userToken" })
		));
	}
}
