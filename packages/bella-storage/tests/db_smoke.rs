use time::OffsetDateTime;

use bella_config::Postgres;
use bella_domain::ranking::SortMode;
use bella_storage::{db::Db, favorites, hospitals, members, models, tokens};
use bella_testkit::TestDatabase;

async fn bootstrap() -> Option<(TestDatabase, Db)> {
	let Some(base_dsn) = bella_testkit::env_dsn() else {
		eprintln!("Skipping storage tests; set BELLA_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, db))
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some((test_db, db)) = bootstrap().await else {
		return;
	};

	// A second bootstrap against the same database must be a no-op.
	db.ensure_schema().await.expect("Failed to re-ensure schema.");

	for table in ["members", "tokens", "hospitals", "doctors", "comment_likes"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "missing table {table}");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn token_upsert_overwrites_the_pair() {
	let Some((test_db, db)) = bootstrap().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();
	let member = models::Member {
		member_id: 11,
		login_email: "amy@example.com".to_string(),
		nickname: "Amy".to_string(),
		profile_img: String::new(),
		phone: None,
		ban: false,
		sign_out: false,
		created_at: now,
	};
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");

	members::insert(&mut conn, &member, &["ROLE_USER".to_string()])
		.await
		.expect("Failed to insert member.");

	let pair = |access: &str| models::TokenPair {
		member_id: 11,
		access_token: access.to_string(),
		access_expires_at: now + time::Duration::days(10),
		refresh_token: "refresh-a".to_string(),
		refresh_expires_at: now + time::Duration::days(365),
		issued_at: now,
	};

	tokens::upsert_pair(&mut conn, &pair("access-a")).await.expect("Failed to upsert pair.");
	tokens::upsert_pair(&mut conn, &pair("access-b")).await.expect("Failed to upsert pair.");

	drop(conn);

	let stored = tokens::find_pair(&db.pool, 11)
		.await
		.expect("Failed to find pair.")
		.expect("Expected a stored pair.");

	assert_eq!(stored.access_token, "access-b");

	assert!(
		members::email_exists(&db.pool, "amy@example.com")
			.await
			.expect("Failed to check email.")
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn listing_orders_by_metric_then_id() {
	let Some((test_db, db)) = bootstrap().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let mut ids = Vec::new();

	for name in ["a", "b", "c"] {
		let id = hospitals::insert(&mut conn, hospitals::NewHospital {
			hospital_name: name,
			location: "Seoul",
			description: "clinic",
			video_link: None,
			sequence: 0,
			admin_id: 1,
			created_at: now,
		})
		.await
		.expect("Failed to insert hospital.");

		ids.push(id);
	}

	// a and b share the top rating; b leads on views.
	sqlx::query("UPDATE hospitals SET total_rate = 4.5 WHERE hospital_id IN ($1, $2)")
		.bind(ids[0])
		.bind(ids[1])
		.execute(&mut *conn)
		.await
		.expect("Failed to set ratings.");
	sqlx::query("UPDATE hospitals SET view_count = 100 WHERE hospital_id = $1")
		.bind(ids[1])
		.execute(&mut *conn)
		.await
		.expect("Failed to set views.");

	drop(conn);

	let by_rating = hospitals::list_ordered(&db.pool, SortMode::Rating)
		.await
		.expect("Failed to list by rating.");

	assert_eq!(
		by_rating.iter().map(|h| h.hospital_id).collect::<Vec<_>>(),
		[ids[0], ids[1], ids[2]]
	);

	let by_views = hospitals::list_ordered(&db.pool, SortMode::Views)
		.await
		.expect("Failed to list by views.");

	assert_eq!(by_views[0].hospital_id, ids[1]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn favorite_toggle_flips_the_join_fact() {
	let Some((test_db, db)) = bootstrap().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");

	let first = favorites::toggle_hospital(&mut conn, 7, 11, now)
		.await
		.expect("Failed to toggle favorite.");

	assert!(first);

	let second = favorites::toggle_hospital(&mut conn, 7, 11, now)
		.await
		.expect("Failed to toggle favorite.");

	assert!(!second);

	drop(conn);

	assert!(
		!favorites::hospital_exists(&db.pool, 7, 11)
			.await
			.expect("Failed to check favorite.")
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
