use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub auth: Auth,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
	/// HS256 signing secret shared by the access and refresh credentials.
	pub jwt_secret: String,
	pub access_ttl_days: i64,
	pub refresh_ttl_days: i64,
	/// Admin accounts get a longer-lived access credential.
	pub admin_access_ttl_days: i64,
	pub admin_profile_img: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub identity: IdentityProviderConfig,
	pub media: MediaProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct IdentityProviderConfig {
	pub api_base: String,
	pub client_id: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct MediaProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub public_base_url: String,
	pub timeout_ms: u64,
}
