use sqlx::{PgConnection, PgPool};

use crate::{
	Result,
	models::{Category, Infra},
};

pub async fn find_infra(pool: &PgPool, infra_id: i64) -> Result<Option<Infra>> {
	sqlx::query_as::<_, Infra>("SELECT * FROM infras WHERE infra_id = $1")
		.bind(infra_id)
		.fetch_optional(pool)
		.await
}

pub async fn find_category(pool: &PgPool, category_id: i64) -> Result<Option<Category>> {
	sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE category_id = $1")
		.bind(category_id)
		.fetch_optional(pool)
		.await
}

pub async fn insert_infra(conn: &mut PgConnection, label: &str) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("INSERT INTO infras (label) VALUES ($1) RETURNING infra_id")
		.bind(label)
		.fetch_one(&mut *conn)
		.await
}

pub async fn insert_category(conn: &mut PgConnection, label: &str) -> Result<i64> {
	sqlx::query_scalar::<_, i64>(
		"INSERT INTO categories (label) VALUES ($1) RETURNING category_id",
	)
	.bind(label)
	.fetch_one(&mut *conn)
	.await
}
