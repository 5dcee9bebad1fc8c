//! Client-level error types shared across the transport, strategies, and refresh protocol.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// [`AuthenticatedClient::execute`](crate::client::AuthenticatedClient::execute) only ever
/// returns [`Error::Transport`] (and [`Error::Config`] for requests it cannot rebuild);
/// authentication failures are folded into synthetic `401` responses instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, malformed request).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Authentication protocol failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
}
impl From<url::ParseError> for Error {
	fn from(e: url::ParseError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// URL could not be parsed.
	#[error("URL is invalid.")]
	InvalidUrl(#[from] url::ParseError),
	/// Authentication host lacks a host component.
	#[error("Authentication host `{url}` has no host component.")]
	MissingHost {
		/// Offending URL.
		url: String,
	},
	/// Authentication host uses an unsupported scheme.
	#[error("Authentication host must use HTTPS: {url}.")]
	InsecureAuthHost {
		/// Offending URL.
		url: String,
	},
	/// Endpoint paths are joined onto the authentication origin and must be absolute.
	#[error("The {endpoint} path must start with `/`: {path}.")]
	RelativeEndpointPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// At least one challenge/refresh cycle must be permitted.
	#[error("The refresh cycle ceiling must be at least 1.")]
	ZeroRefreshCycles,
	/// Endpoint path is not a valid request target.
	#[error("The {endpoint} path is not a valid URI: {path}.")]
	InvalidEndpointPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// Request carries a URI that cannot be turned into a target.
	#[error("Request URI `{uri}` is not absolute.")]
	RelativeRequestUri {
		/// Offending URI.
		uri: String,
	},
}

/// Transport-level failures (network, IO, request construction).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while executing the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request could not be converted into the transport's representation.
	#[error("Request could not be prepared for the transport.")]
	InvalidRequest {
		/// Conversion failure.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while executing the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a request conversion failure.
	pub fn invalid_request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::InvalidRequest { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() {
			Self::invalid_request(e)
		} else {
			Self::network(e)
		}
	}
}

/// Authentication protocol failures.
///
/// These never escape [`AuthenticatedClient::execute`](crate::client::AuthenticatedClient::execute);
/// their `Display` text becomes the body of the synthetic `401` response.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token response body did not match the expected `{"<entity>":{"token":...}}` shape.
	#[error("Unable to login. Malformed {entity} response body.")]
	MalformedTokenBody {
		/// Wrapper key that was expected.
		entity: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token field was present but empty.
	#[error("Unable to login. Empty token in {entity} response body.")]
	EmptyToken {
		/// Wrapper key that carried the empty token.
		entity: &'static str,
	},
	/// Token contains characters that cannot travel in an HTTP header.
	#[error("Token cannot be used as an HTTP header value.")]
	InvalidHeaderValue,
	/// Login endpoint rejected the credentials or failed.
	#[error("Unable to login: {status}.")]
	LoginRejected {
		/// HTTP status code returned by the login endpoint.
		status: u16,
	},
	/// Token endpoint answered with a status other than 200/401.
	#[error("Unable to obtain TT, HTTP status: {status}.")]
	TokenEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
	},
	/// A freshly obtained SST was rejected by the token endpoint.
	#[error("Unable to obtain TT after successfully obtained SST.")]
	TtNotIssued,
	/// The remote service kept challenging after repeated refreshes.
	#[error("Authentication challenge persisted after {cycles} refresh cycles.")]
	ChallengePersisted {
		/// Number of completed challenge/refresh cycles.
		cycles: u32,
	},
	/// Strategy-specific failure reported by a custom [`SstStrategy`](crate::strategy::SstStrategy).
	#[error("Unable to obtain SST: {reason}.")]
	Strategy {
		/// Strategy-supplied reason string.
		reason: String,
	},
}
