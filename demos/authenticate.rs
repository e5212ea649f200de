//! Authenticates against a real Okta org from the terminal and prints the SAML assertion.
//!
//! ```sh
//! OKTA_TARGET=acme.okta.com/home/amazon_aws/0oa1/272 OKTA_USERNAME=alice \
//! 	cargo run --example authenticate --features dialoguer
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use dialoguer::Password;
// self
use okta_saml_broker::{
	auth::Credentials, config::ClientConfig, flows::Authenticator, http::ReqwestHttpClient,
	prompt::TerminalPrompter,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let target = env::var("OKTA_TARGET").wrap_err("OKTA_TARGET must name the Okta app URL.")?;
	let username = env::var("OKTA_USERNAME").wrap_err("OKTA_USERNAME must be set.")?;
	let password = Password::new().with_prompt("Okta password").interact()?;
	let http_client = ReqwestHttpClient::from_config(&ClientConfig::default())?;
	let authenticator =
		<Authenticator<ReqwestHttpClient>>::with_http_client(http_client, Arc::new(TerminalPrompter));
	let assertion =
		authenticator.authenticate(&Credentials::new(username, password, target)).await?;

	println!("{}", assertion.expose());

	Ok(())
}
