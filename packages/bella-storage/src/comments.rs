use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use crate::{Result, models::Comment};

pub async fn insert(
	conn: &mut PgConnection,
	post_id: i64,
	member_id: i64,
	content: &str,
	now: OffsetDateTime,
) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO comments (post_id, member_id, content, deleted, created_at, updated_at)
VALUES ($1, $2, $3, FALSE, $4, $4)
RETURNING comment_id",
	)
	.bind(post_id)
	.bind(member_id)
	.bind(content)
	.bind(now)
	.fetch_one(&mut *conn)
	.await
}

pub async fn find_by_id(pool: &PgPool, comment_id: i64) -> Result<Option<Comment>> {
	sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE comment_id = $1")
		.bind(comment_id)
		.fetch_optional(pool)
		.await
}

pub async fn update_content(
	conn: &mut PgConnection,
	comment_id: i64,
	content: &str,
	now: OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE comments
SET content = $1, updated_at = $2
WHERE comment_id = $3 AND deleted = FALSE",
	)
	.bind(content)
	.bind(now)
	.bind(comment_id)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected())
}

pub async fn soft_delete(
	conn: &mut PgConnection,
	comment_id: i64,
	now: OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE comments
SET deleted = TRUE, updated_at = $1
WHERE comment_id = $2 AND deleted = FALSE",
	)
	.bind(now)
	.bind(comment_id)
	.execute(&mut *conn)
	.await?;

	Ok(result.rows_affected())
}

/// Like is a toggle keyed by (comment, member); returns the new state.
pub async fn toggle_like(
	conn: &mut PgConnection,
	comment_id: i64,
	member_id: i64,
	now: OffsetDateTime,
) -> Result<bool> {
	let deleted =
		sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND member_id = $2")
			.bind(comment_id)
			.bind(member_id)
			.execute(&mut *conn)
			.await?
			.rows_affected();

	if deleted > 0 {
		return Ok(false);
	}

	sqlx::query(
		"\
INSERT INTO comment_likes (comment_id, member_id, created_at)
VALUES ($1, $2, $3)
ON CONFLICT DO NOTHING",
	)
	.bind(comment_id)
	.bind(member_id)
	.bind(now)
	.execute(&mut *conn)
	.await?;

	Ok(true)
}

pub async fn like_count(pool: &PgPool, comment_id: i64) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1")
		.bind(comment_id)
		.fetch_one(pool)
		.await
}

pub async fn by_post(pool: &PgPool, post_id: i64) -> Result<Vec<Comment>> {
	sqlx::query_as::<_, Comment>(
		"\
SELECT *
FROM comments
WHERE post_id = $1 AND deleted = FALSE
ORDER BY comment_id ASC",
	)
	.bind(post_id)
	.fetch_all(pool)
	.await
}
