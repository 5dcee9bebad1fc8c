#![allow(dead_code)]

//! In-process GoodData auth server used by integration tests.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use gooddata_http_client::{
	auth::{SST_HEADER, TT_HEADER},
	client::AuthenticatedClient,
	config::ClientConfig,
	error::TransportError,
	http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
	strategy::{LOGIN_PATH, LoginStrategy, SstStrategy},
	url::Url,
};
use http::{Method, Response, StatusCode, header::WWW_AUTHENTICATE};
use parking_lot::Mutex;

pub const TOKEN_PATH: &str = "/gdc/account/token";
pub const API_PATH: &str = "/gdc/projects";
pub const SST_CHALLENGE: &str = "GoodData realm=\"GoodData API\" cookie=GDCAuthSST";
pub const TT_CHALLENGE: &str = "GoodData realm=\"GoodData API\" cookie=GDCAuthTT";

#[derive(Debug, Default)]
struct ServerState {
	valid_sst: Option<String>,
	valid_tt: Option<String>,
	issued_ssts: usize,
	issued_tts: usize,
	login_status: Option<u16>,
	token_status: Option<u16>,
	token_io_failure: bool,
	reject_fresh_ssts: bool,
	always_challenge: bool,
	plain_unauthorized: bool,
	missing_tt_is_tt_challenge: bool,
	login_body_override: Option<&'static str>,
	token_body_override: Option<&'static str>,
}

/// Scripted transport that behaves like the GoodData login/token/API endpoints.
///
/// - Login issues `sst-<n>`; the token endpoint issues `tt-<n>` for the current SST.
/// - API calls without a TT get an SST challenge; calls with a wrong TT get a TT challenge.
#[derive(Debug, Default)]
pub struct FakeGoodData {
	state: Mutex<ServerState>,
	latency: Duration,
	pub login_calls: AtomicUsize,
	pub token_calls: AtomicUsize,
	pub api_calls: AtomicUsize,
	pub api_tt_headers: Mutex<Vec<Option<String>>>,
	pub api_targets: Mutex<Vec<String>>,
}
impl FakeGoodData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a delay to every call so concurrent requests interleave.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;

		self
	}

	/// Invalidates the current temporary token.
	pub fn expire_tt(&self) {
		self.state.lock().valid_tt = None;
	}

	/// Invalidates both tokens, forcing a full login.
	pub fn expire_sst(&self) {
		let mut state = self.state.lock();

		state.valid_tt = None;
		state.valid_sst = None;
	}

	pub fn fail_logins_with(&self, status: u16) {
		self.state.lock().login_status = Some(status);
	}

	pub fn fail_token_endpoint_with(&self, status: u16) {
		self.state.lock().token_status = Some(status);
	}

	pub fn fail_token_endpoint_io(&self, fail: bool) {
		self.state.lock().token_io_failure = fail;
	}

	/// Logins succeed but the token endpoint never accepts the issued SSTs.
	pub fn reject_fresh_ssts(&self) {
		self.state.lock().reject_fresh_ssts = true;
	}

	/// API calls always answer with a TT challenge.
	pub fn always_challenge(&self) {
		self.state.lock().always_challenge = true;
	}

	/// API calls answer with a bare `401` (no `WWW-Authenticate`).
	pub fn plain_unauthorized(&self) {
		self.state.lock().plain_unauthorized = true;
	}

	/// API calls without a TT get a TT challenge instead of an SST challenge.
	pub fn challenge_missing_tt_as_tt(&self) {
		self.state.lock().missing_tt_is_tt_challenge = true;
	}

	/// Successful logins answer with `body` instead of a `userLogin` document.
	pub fn answer_logins_with_body(&self, body: &'static str) {
		self.state.lock().login_body_override = Some(body);
	}

	/// Accepted token requests answer with `body` instead of a `userToken` document.
	pub fn answer_token_requests_with_body(&self, body: &'static str) {
		self.state.lock().token_body_override = Some(body);
	}

	/// Pretends an SST was issued out of band, returning it.
	pub fn issue_sst_out_of_band(&self) -> String {
		let mut state = self.state.lock();

		state.issued_ssts += 1;

		let sst = format!("sst-{}", state.issued_ssts);

		state.valid_sst = Some(sst.clone());

		sst
	}

	pub fn logins(&self) -> usize {
		self.login_calls.load(Ordering::SeqCst)
	}

	pub fn token_refreshes(&self) -> usize {
		self.token_calls.load(Ordering::SeqCst)
	}

	pub fn api_requests(&self) -> usize {
		self.api_calls.load(Ordering::SeqCst)
	}

	fn login(&self, request: &HttpRequest) -> HttpResponse {
		self.login_calls.fetch_add(1, Ordering::SeqCst);

		let mut state = self.state.lock();

		if let Some(status) = state.login_status {
			return respond(status, None, b"{}".to_vec());
		}

		let body: serde_json::Value =
			serde_json::from_slice(request.body()).expect("Login body should be JSON.");

		assert!(body["postUserLogin"]["login"].is_string(), "Login body must carry a login.");
		assert_eq!(body["postUserLogin"]["verify_level"], 2);

		if let Some(body) = state.login_body_override {
			return respond(200, None, body.as_bytes().to_vec());
		}

		state.issued_ssts += 1;

		let sst = format!("sst-{}", state.issued_ssts);

		if !state.reject_fresh_ssts {
			state.valid_sst = Some(sst.clone());
		}

		respond(
			200,
			None,
			format!(
				"{{\"userLogin\":{{\"profile\":\"/gdc/account/profile/1\",\"token\":\"{sst}\",\"state\":\"/gdc/account/login/1\"}}}}"
			)
			.into_bytes(),
		)
	}

	fn token(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
		self.token_calls.fetch_add(1, Ordering::SeqCst);

		let mut state = self.state.lock();

		if state.token_io_failure {
			return Err(TransportError::Io(std::io::Error::new(
				std::io::ErrorKind::ConnectionReset,
				"token endpoint reset the connection",
			)));
		}
		if let Some(status) = state.token_status {
			return Ok(respond(status, None, Vec::new()));
		}

		let presented = header(request, SST_HEADER);

		if presented.is_none() || presented != state.valid_sst {
			return Ok(respond(401, Some(SST_CHALLENGE), Vec::new()));
		}

		if let Some(body) = state.token_body_override {
			return Ok(respond(200, None, body.as_bytes().to_vec()));
		}

		state.issued_tts += 1;

		let tt = format!("tt-{}", state.issued_tts);

		state.valid_tt = Some(tt.clone());

		Ok(respond(200, None, format!("{{\"userToken\":{{\"token\":\"{tt}\"}}}}").into_bytes()))
	}

	fn api(&self, target: &Url, request: &HttpRequest) -> HttpResponse {
		self.api_calls.fetch_add(1, Ordering::SeqCst);

		let presented = header(request, TT_HEADER);

		self.api_tt_headers.lock().push(presented.clone());
		self.api_targets.lock().push(target.to_string());

		let state = self.state.lock();

		if state.plain_unauthorized {
			return respond(401, None, b"go away".to_vec());
		}
		if state.always_challenge {
			return respond(401, Some(TT_CHALLENGE), Vec::new());
		}

		match presented {
			None if state.missing_tt_is_tt_challenge => respond(401, Some(TT_CHALLENGE), Vec::new()),
			None => respond(401, Some(SST_CHALLENGE), Vec::new()),
			Some(tt) if Some(&tt) == state.valid_tt.as_ref() =>
				respond(200, None, format!("projects for {tt}").into_bytes()),
			Some(_) => respond(401, Some(TT_CHALLENGE), Vec::new()),
		}
	}
}
impl HttpTransport for FakeGoodData {
	fn execute<'a>(&'a self, target: &'a Url, request: HttpRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			if !self.latency.is_zero() {
				tokio::time::sleep(self.latency).await;
			}

			let path = request.uri().path().to_owned();

			match (request.method().clone(), path.as_str()) {
				(Method::POST, LOGIN_PATH) => Ok(self.login(&request)),
				(Method::GET, TOKEN_PATH) => self.token(&request),
				_ => Ok(self.api(target, &request)),
			}
		})
	}
}

fn header(request: &HttpRequest, name: &str) -> Option<String> {
	request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
}

fn respond(status: u16, challenge: Option<&str>, body: Vec<u8>) -> HttpResponse {
	let mut builder = Response::builder().status(StatusCode::from_u16(status).expect("Status fixture should be valid."));

	if let Some(challenge) = challenge {
		builder = builder.header(WWW_AUTHENTICATE, challenge);
	}

	builder.body(body).expect("Response fixture should build.")
}

pub fn auth_host() -> Url {
	Url::parse("https://secure.gooddata.test").expect("Auth host fixture should parse.")
}

pub fn api_request() -> HttpRequest {
	http::Request::builder()
		.uri(API_PATH)
		.header("Accept", "application/json")
		.body(Vec::new())
		.expect("API request fixture should build.")
}

pub fn config(max_refresh_cycles: u32) -> ClientConfig {
	ClientConfig::builder(auth_host())
		.max_refresh_cycles(max_refresh_cycles)
		.build()
		.expect("Client configuration fixture should build.")
}

pub fn login_strategy() -> Arc<dyn SstStrategy> {
	Arc::new(LoginStrategy::new("user@example.com", "s3cr3t"))
}

/// Client wired to a fresh fake server with the login strategy and default settings.
pub fn client(server: Arc<FakeGoodData>) -> AuthenticatedClient<FakeGoodData> {
	AuthenticatedClient::with_transport(config(3), login_strategy(), server)
}
