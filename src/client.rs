//! Authenticated client that decorates an [`HttpTransport`] with GoodData session handling.
//!
//! Every request carries the current temporary token. When the response is a GoodData
//! challenge, the client runs the single-flight refresh protocol and replays the original
//! request against the refreshed session. Authentication failures come back as synthetic `401`
//! responses; only transport failures surface as errors.

mod metrics;
mod refresh;

pub use metrics::RefreshMetrics;

// crates.io
use ::http::{HeaderValue, Response, StatusCode, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::{Challenge, TT_HEADER, TokenSecret},
	config::ClientConfig,
	error::AuthError,
	http::{self, HttpRequest, HttpResponse, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::{Session, SessionSnapshot},
	strategy::SstStrategy,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticatedClient = AuthenticatedClient<ReqwestTransport>;

/// Response extension attached to synthetic `401` responses produced by a failed refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthFailure {
	/// Message of the authentication error that ended the refresh.
	pub reason: String,
}

/// HTTP client that maintains one GoodData identity across concurrent requests.
///
/// Clones share the same session, transport, and metrics.
pub struct AuthenticatedClient<T>
where
	T: HttpTransport,
{
	/// Transport used for caller requests and for token/login calls.
	pub transport: Arc<T>,
	/// Strategy producing fresh super-secure tokens.
	pub strategy: Arc<dyn SstStrategy>,
	/// Validated client configuration.
	pub config: ClientConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	session: Arc<Session>,
}
impl<T> AuthenticatedClient<T>
where
	T: HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		strategy: Arc<dyn SstStrategy>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			strategy,
			config,
			refresh_metrics: Default::default(),
			session: Default::default(),
		}
	}

	/// Seeds the session with a super-secure token the caller already holds.
	///
	/// A TT challenge then only hits the token endpoint; the strategy is consulted once the seed
	/// turns out to be stale.
	///
	/// Call this while building the client, before taking any clones: it installs a fresh
	/// session, so clones made earlier keep the old one and no longer share tokens with `self`.
	pub fn with_initial_sst(mut self, sst: impl Into<String>) -> Self {
		self.session = Arc::new(Session::with_sst(TokenSecret::new(sst)));

		self
	}

	/// Executes `request` against `target`, transparently handling GoodData challenges.
	///
	/// Returns the first non-challenge response. A refresh that fails for authentication reasons
	/// yields a synthetic `401` (body and [`AuthFailure`] extension carry the reason) without
	/// replaying the request; the same happens once `max_refresh_cycles` challenges have been
	/// answered without success. Transport failures are returned as errors.
	pub async fn execute(&self, target: &Url, request: HttpRequest) -> Result<HttpResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run(target, request)).await;

		obs::record_flow_result(
			KIND,
			matches!(&result, Ok(response) if response.extensions().get::<AuthFailure>().is_none()),
		);

		result
	}

	/// Executes a request whose URI is absolute, using its origin as the target.
	pub async fn execute_uri(&self, request: HttpRequest) -> Result<HttpResponse> {
		let target = http::target_of(request.uri())?;

		self.execute(&target, request).await
	}

	/// Executes `request` and hands the final response to `handler`.
	pub async fn execute_with<F, R>(
		&self,
		target: &Url,
		request: HttpRequest,
		handler: F,
	) -> Result<R>
	where
		F: FnOnce(HttpResponse) -> R,
	{
		self.execute(target, request).await.map(handler)
	}

	/// Returns a secret-free view of the current session.
	pub async fn session_snapshot(&self) -> SessionSnapshot {
		self.session.snapshot().await
	}

	async fn run(&self, target: &Url, request: HttpRequest) -> Result<HttpResponse> {
		let mut cycles = 0;

		loop {
			let (response, generation) =
				self.dispatch(target, http::duplicate_request(&request)).await?;
			let challenge = Challenge::classify(&response);

			if !challenge.is_challenge() {
				return Ok(response);
			}

			obs::flow_event(FlowKind::Request, challenge.as_str());
			drop(response);

			if cycles == self.config.max_refresh_cycles {
				return Ok(unauthorized_response(&AuthError::ChallengePersisted { cycles }));
			}

			cycles += 1;

			if let refresh::RefreshOutcome::Failed(err) = self.refresh(challenge, generation).await? {
				return Ok(unauthorized_response(&err));
			}
		}
	}

	/// Sends one request under a shared permit, returning the response and the session
	/// generation the request was issued under.
	async fn dispatch(&self, target: &Url, mut request: HttpRequest) -> Result<(HttpResponse, u64)> {
		let pair = self.session.read().await;

		if let Some(tt) = pair.tt.as_ref() {
			request.headers_mut().insert(TT_HEADER, tt.to_header_value()?);
		}

		let generation = pair.generation;
		let response = self.transport.execute(target, request).await;

		drop(pair);

		Ok((response?, generation))
	}
}
#[cfg(feature = "reqwest")]
impl AuthenticatedClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, strategy: Arc<dyn SstStrategy>) -> Self {
		Self::with_transport(config, strategy, ReqwestTransport::default())
	}
}
impl<T> Clone for AuthenticatedClient<T>
where
	T: HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			strategy: Arc::clone(&self.strategy),
			config: self.config.clone(),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
			session: Arc::clone(&self.session),
		}
	}
}
impl<T> Debug for AuthenticatedClient<T>
where
	T: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatedClient")
			.field("auth_host", &self.config.auth_host.as_str())
			.field("token_path", &self.config.token_path)
			.field("max_refresh_cycles", &self.config.max_refresh_cycles)
			.finish()
	}
}

/// Builds the synthetic `401` returned when authentication cannot be restored.
pub fn unauthorized_response(err: &AuthError) -> HttpResponse {
	let reason = err.to_string();
	let mut response = Response::new(reason.clone().into_bytes());

	*response.status_mut() = StatusCode::UNAUTHORIZED;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
	response.extensions_mut().insert(AuthFailure { reason });

	response
}
