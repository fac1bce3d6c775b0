use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use crate::{Result, models::Review};

pub struct NewReview<'a> {
	pub hospital_id: i64,
	pub doctor_id: Option<i64>,
	pub member_id: i64,
	pub category_id: Option<i64>,
	pub title: &'a str,
	pub content: &'a str,
	pub rate: f32,
	pub created_at: OffsetDateTime,
}

pub async fn insert(conn: &mut PgConnection, review: NewReview<'_>) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO reviews (
	hospital_id,
	doctor_id,
	member_id,
	category_id,
	title,
	content,
	rate,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
RETURNING review_id",
	)
	.bind(review.hospital_id)
	.bind(review.doctor_id)
	.bind(review.member_id)
	.bind(review.category_id)
	.bind(review.title)
	.bind(review.content)
	.bind(review.rate)
	.bind(review.created_at)
	.fetch_one(&mut *conn)
	.await
}

pub async fn link_image(
	conn: &mut PgConnection,
	review_id: i64,
	image_id: i64,
	role: &str,
	position: i32,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO review_images (review_id, image_id, role, position)
VALUES ($1, $2, $3, $4)",
	)
	.bind(review_id)
	.bind(image_id)
	.bind(role)
	.bind(position)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn find_by_id(pool: &PgPool, review_id: i64) -> Result<Option<Review>> {
	sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE review_id = $1")
		.bind(review_id)
		.fetch_optional(pool)
		.await
}

pub async fn image_urls_for(pool: &PgPool, review_id: i64, role: &str) -> Result<Vec<String>> {
	sqlx::query_scalar::<_, String>(
		"\
SELECT i.image_url
FROM images i
JOIN review_images ri ON ri.image_id = i.image_id
WHERE ri.review_id = $1 AND ri.role = $2
ORDER BY ri.position ASC",
	)
	.bind(review_id)
	.bind(role)
	.fetch_all(pool)
	.await
}

pub async fn count_for_hospital(pool: &PgPool, hospital_id: i64) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE hospital_id = $1")
		.bind(hospital_id)
		.fetch_one(pool)
		.await
}

pub async fn count_for_doctor(pool: &PgPool, doctor_id: i64) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE doctor_id = $1")
		.bind(doctor_id)
		.fetch_one(pool)
		.await
}

pub async fn counts_by_hospital(pool: &PgPool) -> Result<Vec<(i64, i64)>> {
	sqlx::query_as::<_, (i64, i64)>(
		"SELECT hospital_id, COUNT(*) FROM reviews GROUP BY hospital_id",
	)
	.fetch_all(pool)
	.await
}

pub async fn by_hospital(pool: &PgPool, hospital_id: i64) -> Result<Vec<Review>> {
	sqlx::query_as::<_, Review>(
		"SELECT * FROM reviews WHERE hospital_id = $1 ORDER BY review_id ASC",
	)
	.bind(hospital_id)
	.fetch_all(pool)
	.await
}

/// `category_id = None` lists every review.
pub async fn by_category(pool: &PgPool, category_id: Option<i64>) -> Result<Vec<Review>> {
	match category_id {
		None =>
			sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY review_id ASC")
				.fetch_all(pool)
				.await,
		Some(category_id) =>
			sqlx::query_as::<_, Review>(
				"SELECT * FROM reviews WHERE category_id = $1 ORDER BY review_id ASC",
			)
			.bind(category_id)
			.fetch_all(pool)
			.await,
	}
}

pub async fn search_by_title(pool: &PgPool, query: &str) -> Result<Vec<Review>> {
	sqlx::query_as::<_, Review>(
		"SELECT * FROM reviews WHERE title LIKE $1 ORDER BY review_id ASC",
	)
	.bind(format!("%{query}%"))
	.fetch_all(pool)
	.await
}
