//! Super-secure token acquisition strategies.
//!
//! The refresh protocol calls [`SstStrategy::obtain_sst`] whenever it needs a brand-new SST.
//! Strategies receive the client's transport so login calls share its connection pool and TLS
//! settings. Authentication failures must be reported as [`Error::Auth`]; transport failures as
//! [`Error::Transport`].

// crates.io
use ::http::{
	Method, Request, StatusCode,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{self, TokenSecret},
	config,
	error::{AuthError, ConfigError},
	http::HttpTransport,
};

/// Default path of the login endpoint on the authentication host.
pub const LOGIN_PATH: &str = "/gdc/account/login";

/// Boxed future returned by [`SstStrategy::obtain_sst`].
pub type SstFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Pluggable capability yielding a fresh super-secure token.
pub trait SstStrategy
where
	Self: Send + Sync,
{
	/// Obtains a new SST, talking to `auth_host` through `transport` when needed.
	fn obtain_sst<'a>(
		&'a self,
		transport: &'a dyn HttpTransport,
		auth_host: &'a Url,
	) -> SstFuture<'a>;
}

/// Strategy that returns a super-secure token the caller already holds.
#[derive(Clone, Debug)]
pub struct StaticSstStrategy(TokenSecret);
impl StaticSstStrategy {
	/// Wraps a pre-supplied super-secure token.
	pub fn new(sst: impl Into<String>) -> Self {
		Self(TokenSecret::new(sst))
	}
}
impl SstStrategy for StaticSstStrategy {
	fn obtain_sst<'a>(
		&'a self,
		_transport: &'a dyn HttpTransport,
		_auth_host: &'a Url,
	) -> SstFuture<'a> {
		let sst = self.0.clone();

		Box::pin(async move { Ok(sst) })
	}
}

/// Verification level asking the server to hand out tokens in headers/bodies, not cookies.
const VERIFY_LEVEL: u8 = 2;

#[derive(Serialize)]
struct LoginRequest<'a> {
	#[serde(rename = "postUserLogin")]
	post_user_login: LoginBody<'a>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
	login: &'a str,
	password: &'a str,
	remember: u8,
	verify_level: u8,
}

/// Strategy that logs in with user credentials.
#[derive(Clone)]
pub struct LoginStrategy {
	login: String,
	password: TokenSecret,
	login_path: String,
}
impl LoginStrategy {
	/// Creates a strategy posting `login`/`password` to [`LOGIN_PATH`].
	pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
		Self { login: login.into(), password: TokenSecret::new(password), login_path: LOGIN_PATH.into() }
	}

	/// Overrides the login endpoint path (must start with `/`).
	pub fn with_login_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
		let path = path.into();

		config::validate_path("login", &path)?;

		self.login_path = path;

		Ok(self)
	}

	/// Login name used by the strategy.
	pub fn login(&self) -> &str {
		&self.login
	}

	fn login_body(&self) -> Result<Vec<u8>> {
		let body = LoginRequest {
			post_user_login: LoginBody {
				login: &self.login,
				password: self.password.expose(),
				remember: 0,
				verify_level: VERIFY_LEVEL,
			},
		};

		serde_json::to_vec(&body)
			.map_err(|e| AuthError::Strategy { reason: format!("login body not serializable: {e}") }.into())
	}

	async fn post_login(&self, transport: &dyn HttpTransport, auth_host: &Url) -> Result<TokenSecret> {
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.login_path.as_str())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.body(self.login_body()?)
			.map_err(|e| AuthError::Strategy { reason: format!("login request not buildable: {e}") })?;
		let response = transport.execute(auth_host, request).await?;

		if response.status() != StatusCode::OK {
			return Err(AuthError::LoginRejected { status: response.status().as_u16() }.into());
		}

		Ok(auth::extract_sst(response.body())?)
	}
}
impl Debug for LoginStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginStrategy")
			.field("login", &self.login)
			.field("password", &self.password)
			.field("login_path", &self.login_path)
			.finish()
	}
}
impl SstStrategy for LoginStrategy {
	fn obtain_sst<'a>(
		&'a self,
		transport: &'a dyn HttpTransport,
		auth_host: &'a Url,
	) -> SstFuture<'a> {
		Box::pin(self.post_login(transport, auth_host))
	}
}
