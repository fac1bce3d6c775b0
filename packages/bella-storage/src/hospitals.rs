use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use bella_domain::ranking::SortMode;

use crate::{
	Result,
	models::{Hospital, Image, Infra},
};

pub struct NewHospital<'a> {
	pub hospital_name: &'a str,
	pub location: &'a str,
	pub description: &'a str,
	pub video_link: Option<&'a str>,
	pub sequence: i64,
	pub admin_id: i64,
	pub created_at: OffsetDateTime,
}

/// Persists a hospital with staff counters zeroed and `deleted = false`.
pub async fn insert(conn: &mut PgConnection, hospital: NewHospital<'_>) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"\
INSERT INTO hospitals (
	hospital_name,
	location,
	description,
	video_link,
	sequence,
	total_rate,
	view_count,
	anesthesiologists,
	plastic_surgeons,
	dermatologists,
	deleted,
	admin_id,
	created_at
)
VALUES ($1, $2, $3, $4, $5, 0, 0, 0, 0, 0, FALSE, $6, $7)
RETURNING hospital_id",
	)
	.bind(hospital.hospital_name)
	.bind(hospital.location)
	.bind(hospital.description)
	.bind(hospital.video_link)
	.bind(hospital.sequence)
	.bind(hospital.admin_id)
	.bind(hospital.created_at)
	.fetch_one(&mut *conn)
	.await
}

pub async fn link_image(
	conn: &mut PgConnection,
	hospital_id: i64,
	image_id: i64,
	role: &str,
	position: i32,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO hospital_images (hospital_id, image_id, role, position)
VALUES ($1, $2, $3, $4)",
	)
	.bind(hospital_id)
	.bind(image_id)
	.bind(role)
	.bind(position)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn link_infra(conn: &mut PgConnection, hospital_id: i64, infra_id: i64) -> Result<()> {
	sqlx::query("INSERT INTO hospital_infras (hospital_id, infra_id) VALUES ($1, $2)")
		.bind(hospital_id)
		.bind(infra_id)
		.execute(&mut *conn)
		.await?;

	Ok(())
}

/// All non-deleted hospitals in listing order. Hospital id breaks metric ties
/// so the ordering is total.
pub async fn list_ordered(pool: &PgPool, sort: SortMode) -> Result<Vec<Hospital>> {
	let order = match sort {
		SortMode::Rating => "total_rate DESC, hospital_id ASC",
		SortMode::Views => "view_count DESC, hospital_id ASC",
	};

	sqlx::query_as::<_, Hospital>(&format!(
		"SELECT * FROM hospitals WHERE deleted = FALSE ORDER BY {order}"
	))
	.fetch_all(pool)
	.await
}

pub async fn find_by_id(pool: &PgPool, hospital_id: i64) -> Result<Option<Hospital>> {
	sqlx::query_as::<_, Hospital>("SELECT * FROM hospitals WHERE hospital_id = $1")
		.bind(hospital_id)
		.fetch_optional(pool)
		.await
}

pub async fn search_by_name(pool: &PgPool, query: &str) -> Result<Vec<Hospital>> {
	sqlx::query_as::<_, Hospital>(
		"\
SELECT *
FROM hospitals
WHERE deleted = FALSE AND hospital_name LIKE $1
ORDER BY hospital_id ASC",
	)
	.bind(format!("%{query}%"))
	.fetch_all(pool)
	.await
}

pub async fn search_by_description(pool: &PgPool, query: &str) -> Result<Vec<Hospital>> {
	sqlx::query_as::<_, Hospital>(
		"\
SELECT *
FROM hospitals
WHERE deleted = FALSE AND description LIKE $1
ORDER BY hospital_id ASC",
	)
	.bind(format!("%{query}%"))
	.fetch_all(pool)
	.await
}

pub async fn images_for(pool: &PgPool, hospital_id: i64, role: &str) -> Result<Vec<Image>> {
	sqlx::query_as::<_, Image>(
		"\
SELECT i.image_id, i.image_url, i.member_id, i.created_at
FROM images i
JOIN hospital_images hi ON hi.image_id = i.image_id
WHERE hi.hospital_id = $1 AND hi.role = $2
ORDER BY hi.position ASC",
	)
	.bind(hospital_id)
	.bind(role)
	.fetch_all(pool)
	.await
}

pub async fn first_banner_url(pool: &PgPool, hospital_id: i64) -> Result<Option<String>> {
	sqlx::query_scalar::<_, String>(
		"\
SELECT i.image_url
FROM images i
JOIN hospital_images hi ON hi.image_id = i.image_id
WHERE hi.hospital_id = $1 AND hi.role = 'banner'
ORDER BY hi.position ASC
LIMIT 1",
	)
	.bind(hospital_id)
	.fetch_optional(pool)
	.await
}

pub async fn infras_for(pool: &PgPool, hospital_id: i64) -> Result<Vec<Infra>> {
	sqlx::query_as::<_, Infra>(
		"\
SELECT f.infra_id, f.label
FROM infras f
JOIN hospital_infras hf ON hf.infra_id = f.infra_id
WHERE hf.hospital_id = $1
ORDER BY f.infra_id ASC",
	)
	.bind(hospital_id)
	.fetch_all(pool)
	.await
}
