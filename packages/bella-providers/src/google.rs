//! Outbound identity-assertion verification. The provider consumes a signed
//! Google id token and returns the asserted email/name/picture; everything
//! else about the OAuth exchange happens outside this service.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct IdentityAssertion {
	pub email: String,
	pub name: String,
	pub picture: Option<String>,
}

pub async fn verify(
	cfg: &bella_config::IdentityProviderConfig,
	id_token: &str,
) -> Result<IdentityAssertion> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/tokeninfo", cfg.api_base);
	let res = client.get(url).query(&[("id_token", id_token)]).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_tokeninfo(json, &cfg.client_id)
}

fn parse_tokeninfo(json: Value, client_id: &str) -> Result<IdentityAssertion> {
	let aud = json
		.get("aud")
		.and_then(|v| v.as_str())
		.ok_or_else(|| eyre::eyre!("Identity assertion is missing an audience."))?;

	if aud != client_id {
		return Err(eyre::eyre!("Identity assertion audience does not match the client id."));
	}

	let email = json
		.get("email")
		.and_then(|v| v.as_str())
		.filter(|v| !v.trim().is_empty())
		.ok_or_else(|| eyre::eyre!("Identity assertion is missing an email."))?
		.to_string();
	let name = json
		.get("name")
		.and_then(|v| v.as_str())
		.filter(|v| !v.trim().is_empty())
		.unwrap_or(email.as_str())
		.to_string();
	let picture = json.get("picture").and_then(|v| v.as_str()).map(str::to_string);

	Ok(IdentityAssertion { email, name, picture })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_full_assertion() {
		let json = serde_json::json!({
			"aud": "client-1",
			"email": "member@example.com",
			"name": "Member",
			"picture": "https://example.com/p.png",
		});
		let parsed = parse_tokeninfo(json, "client-1").expect("parse failed");

		assert_eq!(parsed.email, "member@example.com");
		assert_eq!(parsed.name, "Member");
		assert_eq!(parsed.picture.as_deref(), Some("https://example.com/p.png"));
	}

	#[test]
	fn falls_back_to_email_for_missing_name() {
		let json = serde_json::json!({ "aud": "client-1", "email": "member@example.com" });
		let parsed = parse_tokeninfo(json, "client-1").expect("parse failed");

		assert_eq!(parsed.name, "member@example.com");
		assert_eq!(parsed.picture, None);
	}

	#[test]
	fn rejects_audience_mismatch() {
		let json = serde_json::json!({ "aud": "other", "email": "member@example.com" });

		assert!(parse_tokeninfo(json, "client-1").is_err());
	}

	#[test]
	fn rejects_missing_email() {
		let json = serde_json::json!({ "aud": "client-1" });

		assert!(parse_tokeninfo(json, "client-1").is_err());
	}
}
