//! Session refresh protocol with a single-flight gate and generation-based de-duplication.
//!
//! A challenged request enters the protocol with the session generation it was dispatched
//! under. Tasks queue on the session's refresh gate; the first one through takes the
//! exclusive permit and refreshes, and every later task whose request predates that refresh
//! finds a newer generation and simply replays its request.
//!
//! Under the exclusive permit a TT challenge with a known SST first tries the token endpoint
//! alone. A `401` there means the SST is stale, which (like an SST challenge or a missing SST)
//! leads to a full re-authentication through the [`SstStrategy`](crate::strategy::SstStrategy)
//! followed by exactly one more token endpoint call.

// crates.io
use ::http::{HeaderValue, StatusCode, Uri, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::{self, Challenge, SST_HEADER, TokenSecret},
	client::AuthenticatedClient,
	error::{AuthError, TransportError},
	http::{HttpRequest, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::TokenPair,
};

/// Result of one pass through the refresh protocol.
#[derive(Debug)]
pub(crate) enum RefreshOutcome {
	/// This task refreshed the session.
	Refreshed,
	/// Another task completed a refresh after the challenged request was sent.
	Joined,
	/// Authentication could not be restored.
	Failed(AuthError),
}

/// Result of a single token endpoint call.
#[derive(Debug)]
pub(crate) enum TtRefresh {
	/// The endpoint issued a new temporary token.
	Refreshed(TokenSecret),
	/// The endpoint rejected the super-secure token.
	SstStale,
	/// The endpoint failed in a way a new SST cannot fix.
	Fatal(AuthError),
}

type Attempt = Result<TokenSecret, AuthError>;

impl<T> AuthenticatedClient<T>
where
	T: HttpTransport,
{
	/// Restores the session after `challenge` was observed on a request dispatched under
	/// `observed_generation`.
	///
	/// Transport failures propagate without advancing the generation, so queued tasks will try
	/// again themselves.
	pub(crate) async fn refresh(
		&self,
		challenge: Challenge,
		observed_generation: u64,
	) -> Result<RefreshOutcome> {
		const KIND: FlowKind = FlowKind::TtRefresh;

		self.refresh_metrics.record_attempt();

		let _gate = self.session.enter_refresh().await;
		let mut pair = self.session.write().await;

		if pair.generation != observed_generation {
			self.refresh_metrics.record_joined();
			obs::record_flow_outcome(KIND, FlowOutcome::Joined);
			obs::flow_event(KIND, "joined a refresh completed by another request");

			return Ok(RefreshOutcome::Joined);
		}

		let span = FlowSpan::new(KIND, "refresh");

		match span.instrument(self.reauthenticate(challenge, &mut pair)).await {
			Ok(Ok(tt)) => {
				pair.complete(Some(tt));
				self.refresh_metrics.record_success();

				Ok(RefreshOutcome::Refreshed)
			},
			Ok(Err(err)) => {
				pair.complete(None);
				self.refresh_metrics.record_failure();
				obs::record_flow_result(KIND, false);
				obs::flow_failure(KIND, &err);

				Ok(RefreshOutcome::Failed(err))
			},
			Err(err) => {
				self.refresh_metrics.record_failure();
				obs::record_flow_result(KIND, false);
				obs::flow_failure(KIND, &err);

				Err(err)
			},
		}
	}

	async fn reauthenticate(&self, challenge: Challenge, pair: &mut TokenPair) -> Result<Attempt> {
		if challenge == Challenge::Tt {
			if let Some(sst) = pair.sst.clone() {
				match self.refresh_tt(&sst).await? {
					TtRefresh::Refreshed(tt) => return Ok(Ok(tt)),
					TtRefresh::SstStale => {
						obs::flow_event(FlowKind::TtRefresh, "sst rejected; re-authenticating");

						pair.sst = None;
					},
					TtRefresh::Fatal(err) => return Ok(Err(err)),
				}
			}
		}

		let sst = match self.obtain_sst().await {
			Ok(sst) => sst,
			Err(Error::Auth(err)) => return Ok(Err(err)),
			Err(err) => return Err(err),
		};

		pair.sst = Some(sst.clone());

		Ok(match self.refresh_tt(&sst).await? {
			TtRefresh::Refreshed(tt) => Ok(tt),
			TtRefresh::SstStale => Err(AuthError::TtNotIssued),
			TtRefresh::Fatal(err) => Err(err),
		})
	}

	async fn obtain_sst(&self) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::SstLogin;

		let span = FlowSpan::new(KIND, "obtain_sst");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_login();

		let result = span
			.instrument(self.strategy.obtain_sst(self.transport.as_ref(), &self.config.auth_host))
			.await;

		obs::record_flow_result(KIND, result.is_ok());

		result
	}

	/// Calls the token endpoint with `sst` and classifies the answer.
	pub(crate) async fn refresh_tt(&self, sst: &TokenSecret) -> Result<TtRefresh> {
		const KIND: FlowKind = FlowKind::TtRefresh;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_tt_refresh();

		let sst_value = match sst.to_header_value() {
			Ok(value) => value,
			Err(err) => return Ok(TtRefresh::Fatal(err)),
		};
		let mut request = HttpRequest::new(Vec::new());

		*request.uri_mut() = self
			.config
			.token_endpoint()?
			.as_str()
			.parse::<Uri>()
			.map_err(TransportError::invalid_request)?;
		request.headers_mut().insert(SST_HEADER, sst_value);
		request.headers_mut().insert(ACCEPT, HeaderValue::from_static("application/json"));

		let response = self.transport.execute(&self.config.auth_host, request).await?;
		let outcome = match response.status() {
			StatusCode::OK => match auth::extract_tt(response.body())
				.and_then(|tt| tt.to_header_value().map(|_| tt))
			{
				Ok(tt) => TtRefresh::Refreshed(tt),
				Err(err) => TtRefresh::Fatal(err),
			},
			StatusCode::UNAUTHORIZED => TtRefresh::SstStale,
			status => TtRefresh::Fatal(AuthError::TokenEndpoint { status: status.as_u16() }),
		};

		obs::record_flow_result(KIND, matches!(outcome, TtRefresh::Refreshed(_)));

		Ok(outcome)
	}
}
