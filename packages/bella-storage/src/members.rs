use sqlx::{PgConnection, PgPool};

use crate::{
	Result,
	models::{Admin, Member},
};

pub async fn insert(conn: &mut PgConnection, member: &Member, authorities: &[String]) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO members (
	member_id,
	login_email,
	nickname,
	profile_img,
	phone,
	ban,
	sign_out,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(member.member_id)
	.bind(member.login_email.as_str())
	.bind(member.nickname.as_str())
	.bind(member.profile_img.as_str())
	.bind(member.phone.as_deref())
	.bind(member.ban)
	.bind(member.sign_out)
	.bind(member.created_at)
	.execute(&mut *conn)
	.await?;

	for authority in authorities {
		sqlx::query(
			"\
INSERT INTO member_authorities (member_id, authority_name)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
		)
		.bind(member.member_id)
		.bind(authority.as_str())
		.execute(&mut *conn)
		.await?;
	}

	Ok(())
}

/// Looks up a member by login email. Should duplicate emails exist, the
/// earliest-minted member wins deterministically.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Member>> {
	sqlx::query_as::<_, Member>(
		"\
SELECT *
FROM members
WHERE login_email = $1
ORDER BY member_id ASC
LIMIT 1",
	)
	.bind(email)
	.fetch_optional(pool)
	.await
}

pub async fn find_by_id(pool: &PgPool, member_id: i64) -> Result<Option<Member>> {
	sqlx::query_as::<_, Member>("SELECT * FROM members WHERE member_id = $1")
		.bind(member_id)
		.fetch_optional(pool)
		.await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
	sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM members WHERE login_email = $1)")
		.bind(email)
		.fetch_one(pool)
		.await
}

pub async fn authorities_for(pool: &PgPool, member_id: i64) -> Result<Vec<String>> {
	sqlx::query_scalar::<_, String>(
		"\
SELECT authority_name
FROM member_authorities
WHERE member_id = $1
ORDER BY authority_name ASC",
	)
	.bind(member_id)
	.fetch_all(pool)
	.await
}

pub async fn insert_admin(conn: &mut PgConnection, admin: &Admin) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO admins (member_id, admin_login_id, admin_password, hospital_id, hospital_name)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(admin.member_id)
	.bind(admin.admin_login_id.as_str())
	.bind(admin.admin_password.as_str())
	.bind(admin.hospital_id)
	.bind(admin.hospital_name.as_str())
	.execute(&mut *conn)
	.await?;

	Ok(())
}
