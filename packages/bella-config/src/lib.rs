mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Auth, Config, IdentityProviderConfig, MediaProviderConfig, Postgres, Providers, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn normalize(cfg: &mut Config) {
	trim_trailing_slash(&mut cfg.providers.identity.api_base);
	trim_trailing_slash(&mut cfg.providers.media.api_base);
	trim_trailing_slash(&mut cfg.providers.media.public_base_url);
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.jwt_secret.len() < 32 {
		return Err(Error::Validation {
			message: "auth.jwt_secret must be at least 32 bytes.".to_string(),
		});
	}
	if cfg.auth.access_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "auth.access_ttl_days must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.refresh_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "auth.refresh_ttl_days must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.admin_access_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "auth.admin_access_ttl_days must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.identity.client_id.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.identity.client_id must be non-empty.".to_string(),
		});
	}
	if cfg.providers.identity.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.identity.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.media.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.media.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn trim_trailing_slash(value: &mut String) {
	while value.ends_with('/') {
		value.pop();
	}
}
