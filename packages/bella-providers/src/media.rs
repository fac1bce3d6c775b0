//! Opaque object-store client. Uploads must succeed before a creation
//! pipeline proceeds; `delete` is the compensation call used when entity
//! persistence fails after an upload.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use uuid::Uuid;

pub async fn upload(
	cfg: &bella_config::MediaProviderConfig,
	prefix: &str,
	file_name: &str,
	bytes: Vec<u8>,
) -> Result<String> {
	let object = object_name(file_name);
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/{prefix}/{object}", cfg.api_base);

	client.put(url).bearer_auth(&cfg.api_key).body(bytes).send().await?.error_for_status()?;

	Ok(format!("{}/{prefix}/{object}", cfg.public_base_url))
}

pub async fn delete(cfg: &bella_config::MediaProviderConfig, public_url: &str) -> Result<()> {
	let path = store_path(&cfg.public_base_url, public_url)?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

	client
		.delete(format!("{}{path}", cfg.api_base))
		.bearer_auth(&cfg.api_key)
		.send()
		.await?
		.error_for_status()?;

	Ok(())
}

fn store_path(public_base_url: &str, public_url: &str) -> Result<String> {
	public_url
		.strip_prefix(public_base_url)
		.filter(|path| path.starts_with('/'))
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("URL {public_url:?} is not served from the media store."))
}

fn object_name(file_name: &str) -> String {
	let sanitized: String = file_name
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '-' })
		.collect();

	format!("{}-{sanitized}", Uuid::new_v4().simple())
}
