use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::Result;

pub async fn insert(
	conn: &mut PgConnection,
	image_url: &str,
	member_id: i64,
	now: OffsetDateTime,
) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO images (image_url, member_id, created_at)
VALUES ($1, $2, $3)
RETURNING image_id",
	)
	.bind(image_url)
	.bind(member_id)
	.bind(now)
	.fetch_one(&mut *conn)
	.await
}
