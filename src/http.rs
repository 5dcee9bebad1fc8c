//! Transport primitives for the authenticated client.
//!
//! The module exposes [`HttpTransport`], the client's only dependency on an HTTP stack, plus
//! the default [`ReqwestTransport`]. Requests and responses use the `http` crate types with
//! fully buffered bodies so a challenged request can be re-issued verbatim.

// crates.io
use ::http::{Request, Response, Uri};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Buffered request handed to transports.
pub type HttpRequest = Request<Vec<u8>>;
/// Buffered response returned by transports.
pub type HttpResponse = Response<Vec<u8>>;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing requests against a target origin.
///
/// `target` is the origin (scheme, host, port) the request is addressed to; the request URI
/// may be relative (`/gdc/projects`) or absolute. Implementations must not follow
/// authentication challenges themselves: a `401` must be returned as a response, while network
/// or I/O failures are reported as [`TransportError`]. Implementations are shared across tasks,
/// so they must be `Send + Sync + 'static`, and their futures must be `Send`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` against `target`.
	fn execute<'a>(&'a self, target: &'a Url, request: HttpRequest) -> TransportFuture<'a>;
}

/// Resolves the URL a request should be sent to.
///
/// Absolute request URIs win; relative ones are joined onto `target`.
pub fn resolve_url(target: &Url, uri: &Uri) -> Result<Url, TransportError> {
	if uri.scheme().is_some() && uri.authority().is_some() {
		return Url::parse(&uri.to_string()).map_err(TransportError::invalid_request);
	}

	let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

	target.join(path).map_err(TransportError::invalid_request)
}

/// Derives the target origin from an absolute request URI.
pub fn target_of(uri: &Uri) -> Result<Url, ConfigError> {
	match (uri.scheme_str(), uri.authority()) {
		(Some(scheme), Some(authority)) => Ok(Url::parse(&format!("{scheme}://{authority}/"))?),
		_ => Err(ConfigError::RelativeRequestUri { uri: uri.to_string() }),
	}
}

/// Rebuilds a buffered request so the original can be replayed after a refresh.
pub(crate) fn duplicate_request(request: &HttpRequest) -> HttpRequest {
	let mut copy = Request::new(request.body().clone());

	*copy.method_mut() = request.method().clone();
	*copy.uri_mut() = request.uri().clone();
	*copy.version_mut() = request.version();
	*copy.headers_mut() = request.headers().clone();

	copy
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The client is used both for caller requests and for the login/token endpoint calls made
/// during a refresh, so connection pooling and TLS settings are shared.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn send(&self, target: &Url, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let url = resolve_url(target, request.uri())?;

		*request.uri_mut() = url.as_str().parse::<Uri>().map_err(TransportError::invalid_request)?;

		let response = self.0.execute(request.try_into()?).await?;
		let status = response.status();
		let version = response.version();
		let headers = response.headers().to_owned();
		let mut converted = Response::new(response.bytes().await?.to_vec());

		*converted.status_mut() = status;
		*converted.version_mut() = version;
		*converted.headers_mut() = headers;

		Ok(converted)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute<'a>(&'a self, target: &'a Url, request: HttpRequest) -> TransportFuture<'a> {
		Box::pin(self.send(target, request))
	}
}
