//! Demonstrates an authenticated client that logs in against a mocked GoodData host, obtains a
//! temporary token, and reuses it for follow-up requests.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use gooddata_http_client::{
	client::AuthenticatedClient,
	config::ClientConfig,
	strategy::{LoginStrategy, SstStrategy},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/gdc/account/login");
			then.status(200).header("content-type", "application/json").body(
				"{\"userLogin\":{\"profile\":\"/gdc/account/profile/demo\",\"token\":\"demo-sst\",\"state\":\"/gdc/account/login/demo\"}}",
			);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/gdc/account/token").header("x-gdc-authsst", "demo-sst");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"userToken\":{\"token\":\"demo-tt\"}}");
		})
		.await;
	let challenge_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/gdc/md").header_missing("x-gdc-authtt");
			then.status(401)
				.header("www-authenticate", "GoodData realm=\"GoodData API\" cookie=GDCAuthSST");
		})
		.await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/gdc/md").header("x-gdc-authtt", "demo-tt");
			then.status(200).header("content-type", "application/json").body("{\"about\":{}}");
		})
		.await;
	let auth_host = Url::parse(&server.base_url())?;
	let config = ClientConfig::builder(auth_host.clone()).allow_insecure_http().build()?;
	let strategy: Arc<dyn SstStrategy> = Arc::new(LoginStrategy::new("demo@example.com", "demo"));
	let client = AuthenticatedClient::new(config, strategy);

	for attempt in 1..=2 {
		let request = http::Request::builder().uri("/gdc/md").body(Vec::new())?;
		let response = client.execute(&auth_host, request).await?;

		println!(
			"Request {attempt}: status {} body {}.",
			response.status(),
			String::from_utf8_lossy(response.body())
		);
	}

	println!("Session: {:?}.", client.session_snapshot().await);
	println!("Logins performed: {}.", client.refresh_metrics.logins());

	login_mock.assert_async().await;
	token_mock.assert_async().await;
	challenge_mock.assert_async().await;
	api_mock.assert_calls_async(2).await;

	Ok(())
}
