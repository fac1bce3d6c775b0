//! Self-contained session credentials. Each credential encodes the owning
//! member id, an expiry, and whether it is the access or the refresh half of
//! the pair, verifiable without a storage round-trip.

use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
	Access,
	Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	sub: MemberId,
	exp: i64,
	kind: CredentialKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
	#[error("Credential is expired.")]
	Expired,
	#[error("Credential is malformed.")]
	Malformed,
	#[error("Credential is not of the expected kind.")]
	WrongKind,
	#[error("Failed to sign credential.")]
	Signing,
}

pub fn issue(
	secret: &str,
	member_id: MemberId,
	kind: CredentialKind,
	ttl: Duration,
	now: OffsetDateTime,
) -> Result<String, CredentialError> {
	let claims = Claims { sub: member_id, exp: (now + ttl).unix_timestamp(), kind };

	encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
		.map_err(|_| CredentialError::Signing)
}

/// Decodes a presented credential and extracts the embedded member id.
/// A credential of the wrong kind never resolves; an access credential must
/// not be usable to refresh a pair and vice versa.
pub fn resolve_member_id(
	secret: &str,
	raw: &str,
	expected: CredentialKind,
) -> Result<MemberId, CredentialError> {
	let validation = Validation::new(Algorithm::HS256);
	let data = decode::<Claims>(raw, &DecodingKey::from_secret(secret.as_bytes()), &validation)
		.map_err(|err| match err.kind() {
			ErrorKind::ExpiredSignature => CredentialError::Expired,
			_ => CredentialError::Malformed,
		})?;

	if data.claims.kind != expected {
		return Err(CredentialError::WrongKind);
	}

	Ok(data.claims.sub)
}
