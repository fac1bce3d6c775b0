use time::{Duration, OffsetDateTime};

use bella_domain::credential::{self, CredentialKind};
use bella_providers::IdentityAssertion;
use bella_storage::{
	members,
	models::{Admin, Member, TokenPair},
	tokens,
};

use crate::{BellaService, Entity, Error, Result};

const ROLE_USER: &str = "ROLE_USER";
const ROLE_ADMIN: &str = "ROLE_ADMIN";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionTokens {
	pub access_token: String,
	#[serde(with = "time::serde::rfc3339")]
	pub access_expires_at: OffsetDateTime,
	pub refresh_token: String,
	#[serde(with = "time::serde::rfc3339")]
	pub refresh_expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionResponse {
	pub member_id: i64,
	pub login_email: String,
	pub nickname: String,
	pub profile_img: String,
	pub authorities: Vec<String>,
	pub tokens: SessionTokens,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AdminCreateRequest {
	pub login_id: String,
	pub password: String,
	pub hospital_id: Option<i64>,
	pub hospital_name: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AdminResponse {
	pub member_id: i64,
	pub admin_login_id: String,
	pub hospital_id: Option<i64>,
	pub hospital_name: String,
	pub tokens: SessionTokens,
}

impl BellaService {
	/// Verifies an external identity assertion and routes to signup or
	/// signin depending on whether the email is already taken.
	pub async fn login(&self, id_token: &str) -> Result<SessionResponse> {
		let assertion =
			self.providers.identity.verify(&self.cfg.providers.identity, id_token).await?;

		if self.is_email_available(&assertion.email).await? {
			self.sign_up(assertion).await
		} else {
			self.sign_in(assertion).await
		}
	}

	/// Creates a member for a verified assertion and issues a fresh pair.
	/// Duplicate emails are NOT checked here; callers go through
	/// `is_email_available` first, and a concurrent signup race can mint two
	/// members with the same email (storage-level uniqueness is the only
	/// remedy).
	pub async fn sign_up(&self, assertion: IdentityAssertion) -> Result<SessionResponse> {
		let now = OffsetDateTime::now_utc();
		let member = Member {
			member_id: mint_member_id(now),
			login_email: assertion.email,
			nickname: assertion.name,
			profile_img: assertion.picture.unwrap_or_default(),
			phone: None,
			ban: false,
			sign_out: false,
			created_at: now,
		};
		let pair = self.issue_pair(member.member_id, self.cfg.auth.access_ttl_days, now)?;
		let authorities = vec![ROLE_USER.to_string()];
		let mut tx = self.db.pool.begin().await?;

		members::insert(&mut *tx, &member, &authorities).await?;
		tokens::upsert_pair(&mut *tx, &pair).await?;

		tx.commit().await?;

		tracing::info!(member_id = member.member_id, "Signed up a new member.");

		Ok(session_response(member, authorities, pair))
	}

	/// Returns the stored credential pair attached to the member projection.
	/// A member without a pair is an inconsistent state surfaced as the same
	/// not-found outcome as an unknown email.
	pub async fn sign_in(&self, assertion: IdentityAssertion) -> Result<SessionResponse> {
		let member = members::find_by_email(&self.db.pool, &assertion.email)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Member, &assertion.email))?;
		let pair = tokens::find_pair(&self.db.pool, member.member_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Member, member.member_id))?;
		let authorities = members::authorities_for(&self.db.pool, member.member_id).await?;

		Ok(session_response(member, authorities, pair))
	}

	/// True iff no member holds this email yet.
	pub async fn is_email_available(&self, email: &str) -> Result<bool> {
		Ok(!members::email_exists(&self.db.pool, email).await?)
	}

	/// Mints an admin member with clinic-management credentials and a pair
	/// whose access half lives as long as the refresh half. No duplicate
	/// check is performed.
	pub async fn create_admin(&self, req: AdminCreateRequest) -> Result<AdminResponse> {
		let now = OffsetDateTime::now_utc();
		let member_id = mint_member_id(now);
		let member = Member {
			member_id,
			login_email: req.login_id.clone(),
			nickname: req.hospital_name.clone(),
			profile_img: self.cfg.auth.admin_profile_img.clone(),
			phone: None,
			ban: false,
			sign_out: false,
			created_at: now,
		};
		let pair = self.issue_pair(member_id, self.cfg.auth.admin_access_ttl_days, now)?;
		let admin = Admin {
			member_id,
			admin_login_id: req.login_id,
			admin_password: req.password,
			hospital_id: req.hospital_id,
			hospital_name: req.hospital_name,
		};
		let mut tx = self.db.pool.begin().await?;

		members::insert(&mut *tx, &member, &[ROLE_ADMIN.to_string()]).await?;
		tokens::upsert_pair(&mut *tx, &pair).await?;
		members::insert_admin(&mut *tx, &admin).await?;

		tx.commit().await?;

		tracing::info!(member_id, "Created an admin member.");

		Ok(AdminResponse {
			member_id,
			admin_login_id: admin.admin_login_id,
			hospital_id: admin.hospital_id,
			hospital_name: admin.hospital_name,
			tokens: session_tokens(pair),
		})
	}

	/// Validates a refresh credential and overwrites the member's pair.
	pub async fn refresh_session(&self, refresh_credential: &str) -> Result<SessionResponse> {
		let member_id = credential::resolve_member_id(
			&self.cfg.auth.jwt_secret,
			refresh_credential,
			CredentialKind::Refresh,
		)?;
		let member = members::find_by_id(&self.db.pool, member_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Member, member_id))?;
		let authorities = members::authorities_for(&self.db.pool, member_id).await?;
		let access_days = if authorities.iter().any(|role| role == ROLE_ADMIN) {
			self.cfg.auth.admin_access_ttl_days
		} else {
			self.cfg.auth.access_ttl_days
		};
		let pair = self.issue_pair(member_id, access_days, OffsetDateTime::now_utc())?;
		let mut tx = self.db.pool.begin().await?;

		tokens::upsert_pair(&mut *tx, &pair).await?;

		tx.commit().await?;

		Ok(session_response(member, authorities, pair))
	}

	/// Decodes a presented access credential into the embedded member id.
	pub fn resolve_member_id(&self, raw_credential: &str) -> Result<i64> {
		Ok(credential::resolve_member_id(
			&self.cfg.auth.jwt_secret,
			raw_credential,
			CredentialKind::Access,
		)?)
	}

	fn issue_pair(
		&self,
		member_id: i64,
		access_days: i64,
		now: OffsetDateTime,
	) -> Result<TokenPair> {
		let secret = &self.cfg.auth.jwt_secret;
		let access_ttl = Duration::days(access_days);
		let refresh_ttl = Duration::days(self.cfg.auth.refresh_ttl_days);
		let access_token =
			credential::issue(secret, member_id, CredentialKind::Access, access_ttl, now)
				.map_err(|err| Error::Provider { message: err.to_string() })?;
		let refresh_token =
			credential::issue(secret, member_id, CredentialKind::Refresh, refresh_ttl, now)
				.map_err(|err| Error::Provider { message: err.to_string() })?;

		Ok(TokenPair {
			member_id,
			access_token,
			access_expires_at: now + access_ttl,
			refresh_token,
			refresh_expires_at: now + refresh_ttl,
			issued_at: now,
		})
	}
}

fn mint_member_id(now: OffsetDateTime) -> i64 {
	(now.unix_timestamp_nanos() / 1_000_000) as i64
}

fn session_response(
	member: Member,
	authorities: Vec<String>,
	pair: TokenPair,
) -> SessionResponse {
	SessionResponse {
		member_id: member.member_id,
		login_email: member.login_email,
		nickname: member.nickname,
		profile_img: member.profile_img,
		authorities,
		tokens: session_tokens(pair),
	}
}

fn session_tokens(pair: TokenPair) -> SessionTokens {
	SessionTokens {
		access_token: pair.access_token,
		access_expires_at: pair.access_expires_at,
		refresh_token: pair.refresh_token,
		refresh_expires_at: pair.refresh_expires_at,
	}
}
