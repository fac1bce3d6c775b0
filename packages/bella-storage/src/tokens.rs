use sqlx::{PgConnection, PgPool};

use crate::{Result, models::TokenPair};

/// Reissue overwrites the member's live pair; token storage is keyed by
/// member id and never append-only.
pub async fn upsert_pair(conn: &mut PgConnection, pair: &TokenPair) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO tokens (
	member_id,
	access_token,
	access_expires_at,
	refresh_token,
	refresh_expires_at,
	issued_at
)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (member_id) DO UPDATE
SET
	access_token = EXCLUDED.access_token,
	access_expires_at = EXCLUDED.access_expires_at,
	refresh_token = EXCLUDED.refresh_token,
	refresh_expires_at = EXCLUDED.refresh_expires_at,
	issued_at = EXCLUDED.issued_at",
	)
	.bind(pair.member_id)
	.bind(pair.access_token.as_str())
	.bind(pair.access_expires_at)
	.bind(pair.refresh_token.as_str())
	.bind(pair.refresh_expires_at)
	.bind(pair.issued_at)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn find_pair(pool: &PgPool, member_id: i64) -> Result<Option<TokenPair>> {
	sqlx::query_as::<_, TokenPair>("SELECT * FROM tokens WHERE member_id = $1")
		.bind(member_id)
		.fetch_optional(pool)
		.await
}
