use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use crate::{
	Result,
	models::{Career, Category, Doctor, IntroLink},
};

pub struct NewDoctor<'a> {
	pub doctor_name: &'a str,
	pub doctor_image: Option<&'a str>,
	pub hospital_id: i64,
	pub description: &'a str,
	pub sequence: i64,
	pub admin_id: i64,
	pub created_at: OffsetDateTime,
}

/// Persists a doctor with its aggregate rating zeroed.
pub async fn insert(conn: &mut PgConnection, doctor: NewDoctor<'_>) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO doctors (
	doctor_name,
	doctor_image,
	hospital_id,
	description,
	sequence,
	total_rate,
	admin_id,
	created_at
)
VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
RETURNING doctor_id",
	)
	.bind(doctor.doctor_name)
	.bind(doctor.doctor_image)
	.bind(doctor.hospital_id)
	.bind(doctor.description)
	.bind(doctor.sequence)
	.bind(doctor.admin_id)
	.bind(doctor.created_at)
	.fetch_one(&mut *conn)
	.await
}

pub async fn add_career(
	conn: &mut PgConnection,
	doctor_id: i64,
	career_name: &str,
	career_date: &str,
	position: i32,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO careers (doctor_id, career_name, career_date, position)
VALUES ($1, $2, $3, $4)",
	)
	.bind(doctor_id)
	.bind(career_name)
	.bind(career_date)
	.bind(position)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn add_intro_link(
	conn: &mut PgConnection,
	doctor_id: i64,
	link_url: &str,
	position: i32,
) -> Result<()> {
	sqlx::query("INSERT INTO intro_links (doctor_id, link_url, position) VALUES ($1, $2, $3)")
		.bind(doctor_id)
		.bind(link_url)
		.bind(position)
		.execute(&mut *conn)
		.await?;

	Ok(())
}

pub async fn link_category(
	conn: &mut PgConnection,
	doctor_id: i64,
	category_id: i64,
) -> Result<()> {
	sqlx::query("INSERT INTO doctor_categories (doctor_id, category_id) VALUES ($1, $2)")
		.bind(doctor_id)
		.bind(category_id)
		.execute(&mut *conn)
		.await?;

	Ok(())
}

pub async fn find_by_id(pool: &PgPool, doctor_id: i64) -> Result<Option<Doctor>> {
	sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE doctor_id = $1")
		.bind(doctor_id)
		.fetch_optional(pool)
		.await
}

pub async fn by_hospital(pool: &PgPool, hospital_id: i64) -> Result<Vec<Doctor>> {
	sqlx::query_as::<_, Doctor>(
		"SELECT * FROM doctors WHERE hospital_id = $1 ORDER BY doctor_id ASC",
	)
	.bind(hospital_id)
	.fetch_all(pool)
	.await
}

pub async fn category_ids_for(pool: &PgPool, doctor_id: i64) -> Result<Vec<i64>> {
	sqlx::query_scalar::<_, i64>(
		"\
SELECT category_id
FROM doctor_categories
WHERE doctor_id = $1
ORDER BY category_id ASC",
	)
	.bind(doctor_id)
	.fetch_all(pool)
	.await
}

pub async fn categories_for(pool: &PgPool, doctor_id: i64) -> Result<Vec<Category>> {
	sqlx::query_as::<_, Category>(
		"\
SELECT c.*
FROM categories c
JOIN doctor_categories dc ON dc.category_id = c.category_id
WHERE dc.doctor_id = $1
ORDER BY c.category_id ASC",
	)
	.bind(doctor_id)
	.fetch_all(pool)
	.await
}

pub async fn careers_for(pool: &PgPool, doctor_id: i64) -> Result<Vec<Career>> {
	sqlx::query_as::<_, Career>(
		"SELECT * FROM careers WHERE doctor_id = $1 ORDER BY position ASC",
	)
	.bind(doctor_id)
	.fetch_all(pool)
	.await
}

pub async fn intro_links_for(pool: &PgPool, doctor_id: i64) -> Result<Vec<IntroLink>> {
	sqlx::query_as::<_, IntroLink>(
		"SELECT * FROM intro_links WHERE doctor_id = $1 ORDER BY position ASC",
	)
	.bind(doctor_id)
	.fetch_all(pool)
	.await
}
