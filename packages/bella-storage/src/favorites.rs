use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;

use crate::Result;

pub async fn hospital_exists(pool: &PgPool, hospital_id: i64, member_id: i64) -> Result<bool> {
	sqlx::query_scalar::<_, bool>(
		"\
SELECT EXISTS (
	SELECT 1
	FROM hospital_favorites
	WHERE hospital_id = $1 AND member_id = $2
)",
	)
	.bind(hospital_id)
	.bind(member_id)
	.fetch_one(pool)
	.await
}

pub async fn doctor_exists(pool: &PgPool, doctor_id: i64, member_id: i64) -> Result<bool> {
	sqlx::query_scalar::<_, bool>(
		"\
SELECT EXISTS (
	SELECT 1
	FROM doctor_favorites
	WHERE doctor_id = $1 AND member_id = $2
)",
	)
	.bind(doctor_id)
	.bind(member_id)
	.fetch_one(pool)
	.await
}

pub async fn hospital_ids_for_member(pool: &PgPool, member_id: i64) -> Result<Vec<i64>> {
	sqlx::query_scalar::<_, i64>(
		"SELECT hospital_id FROM hospital_favorites WHERE member_id = $1",
	)
	.bind(member_id)
	.fetch_all(pool)
	.await
}

/// Flips the join fact and reports the new state; last write wins under
/// concurrent toggles.
pub async fn toggle_hospital(
	conn: &mut PgConnection,
	hospital_id: i64,
	member_id: i64,
	now: OffsetDateTime,
) -> Result<bool> {
	let deleted = sqlx::query(
		"DELETE FROM hospital_favorites WHERE hospital_id = $1 AND member_id = $2",
	)
	.bind(hospital_id)
	.bind(member_id)
	.execute(&mut *conn)
	.await?
	.rows_affected();

	if deleted > 0 {
		return Ok(false);
	}

	sqlx::query(
		"\
INSERT INTO hospital_favorites (hospital_id, member_id, created_at)
VALUES ($1, $2, $3)
ON CONFLICT DO NOTHING",
	)
	.bind(hospital_id)
	.bind(member_id)
	.bind(now)
	.execute(&mut *conn)
	.await?;

	Ok(true)
}

pub async fn toggle_doctor(
	conn: &mut PgConnection,
	doctor_id: i64,
	member_id: i64,
	now: OffsetDateTime,
) -> Result<bool> {
	let deleted =
		sqlx::query("DELETE FROM doctor_favorites WHERE doctor_id = $1 AND member_id = $2")
			.bind(doctor_id)
			.bind(member_id)
			.execute(&mut *conn)
			.await?
			.rows_affected();

	if deleted > 0 {
		return Ok(false);
	}

	sqlx::query(
		"\
INSERT INTO doctor_favorites (doctor_id, member_id, created_at)
VALUES ($1, $2, $3)
ON CONFLICT DO NOTHING",
	)
	.bind(doctor_id)
	.bind(member_id)
	.bind(now)
	.execute(&mut *conn)
	.await?;

	Ok(true)
}
