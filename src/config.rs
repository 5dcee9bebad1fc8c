//! Validated client configuration and its builder.

// self
use crate::{_prelude::*, error::ConfigError};

/// Default path of the temporary-token endpoint on the authentication host.
pub const DEFAULT_TOKEN_PATH: &str = "/gdc/account/token";
/// Default number of challenge/refresh cycles a single request may go through.
pub const DEFAULT_MAX_REFRESH_CYCLES: u32 = 3;

/// Immutable configuration consumed by [`AuthenticatedClient`](crate::client::AuthenticatedClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Origin serving the login and token endpoints.
	pub auth_host: Url,
	/// Path of the temporary-token endpoint.
	pub token_path: String,
	/// Upper bound on challenge/refresh/retry cycles per request.
	pub max_refresh_cycles: u32,
}
impl ClientConfig {
	/// Creates a new builder for the provided authentication host.
	pub fn builder(auth_host: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(auth_host)
	}

	/// Absolute URL of the temporary-token endpoint.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		Ok(self.auth_host.join(&self.token_path)?)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.auth_host.host_str().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingHost { url: self.auth_host.to_string() });
		}

		validate_path("token", &self.token_path)?;

		if self.max_refresh_cycles == 0 {
			return Err(ConfigError::ZeroRefreshCycles);
		}

		Ok(())
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Origin serving the login and token endpoints.
	pub auth_host: Url,
	/// Path of the temporary-token endpoint.
	pub token_path: String,
	/// Upper bound on challenge/refresh/retry cycles per request.
	pub max_refresh_cycles: u32,
	/// Accepts a plain `http` authentication host (local development and tests).
	pub allow_insecure_http: bool,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the authentication host and default settings.
	pub fn new(auth_host: Url) -> Self {
		Self {
			auth_host,
			token_path: DEFAULT_TOKEN_PATH.into(),
			max_refresh_cycles: DEFAULT_MAX_REFRESH_CYCLES,
			allow_insecure_http: false,
		}
	}

	/// Overrides the temporary-token endpoint path.
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.token_path = path.into();

		self
	}

	/// Overrides the challenge/refresh cycle ceiling.
	pub fn max_refresh_cycles(mut self, cycles: u32) -> Self {
		self.max_refresh_cycles = cycles;

		self
	}

	/// Accepts an `http://` authentication host.
	pub fn allow_insecure_http(mut self) -> Self {
		self.allow_insecure_http = true;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	///
	/// The authentication host is reduced to its origin; any path, query, or fragment is dropped.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		match self.auth_host.scheme() {
			"https" => {},
			"http" if self.allow_insecure_http => {},
			_ => return Err(ConfigError::InsecureAuthHost { url: self.auth_host.to_string() }),
		}

		let mut auth_host = self.auth_host;

		auth_host.set_path("/");
		auth_host.set_query(None);
		auth_host.set_fragment(None);

		let config = ClientConfig {
			auth_host,
			token_path: self.token_path,
			max_refresh_cycles: self.max_refresh_cycles,
		};

		config.validate()?;

		Ok(config)
	}
}

pub(crate) fn validate_path(endpoint: &'static str, path: &str) -> Result<(), ConfigError> {
	if !path.starts_with('/') {
		return Err(ConfigError::RelativeEndpointPath { endpoint, path: path.into() });
	}
	if path.parse::<::http::Uri>().is_err() {
		return Err(ConfigError::InvalidEndpointPath { endpoint, path: path.into() });
	}

	Ok(())
}
