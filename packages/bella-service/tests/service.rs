use std::sync::Arc;

use bella_config::{
	Auth, Config, IdentityProviderConfig, MediaProviderConfig, Postgres, Providers, Service,
	Storage,
};
use bella_providers::IdentityAssertion;
use bella_service::{
	AddDoctorRequest, AddHospitalRequest, AddReviewRequest, BellaService, BoxFuture, Error,
	IdentityVerifier, ListHospitalsRequest, MediaStore, SearchHospitalsRequest,
};
use bella_storage::db::Db;
use bella_testkit::TestDatabase;

/// Treats the id token as `email|name` so each test can mint identities
/// without a live verifier.
struct StubIdentity;
impl IdentityVerifier for StubIdentity {
	fn verify<'a>(
		&'a self,
		_cfg: &'a IdentityProviderConfig,
		id_token: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<IdentityAssertion>> {
		Box::pin(async move {
			let (email, name) = id_token.split_once('|').unwrap_or((id_token, id_token));

			Ok(IdentityAssertion {
				email: email.to_string(),
				name: name.to_string(),
				picture: None,
			})
		})
	}
}

struct StubMedia;
impl MediaStore for StubMedia {
	fn upload<'a>(
		&'a self,
		_cfg: &'a MediaProviderConfig,
		prefix: &'a str,
		file_name: &'a str,
		_bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(format!("https://cdn.test/{prefix}/{file_name}")) })
	}

	fn delete<'a>(
		&'a self,
		_cfg: &'a MediaProviderConfig,
		_public_url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move { Ok(()) })
	}
}

fn test_config(dsn: &str) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres { dsn: dsn.to_string(), pool_max_conns: 2 },
		},
		auth: Auth {
			jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
			access_ttl_days: 10,
			refresh_ttl_days: 365,
			admin_access_ttl_days: 365,
			admin_profile_img: "https://cdn.test/admin.png".to_string(),
		},
		providers: Providers {
			identity: IdentityProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				client_id: "test-client".to_string(),
				timeout_ms: 1_000,
			},
			media: MediaProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				public_base_url: "https://cdn.test".to_string(),
				timeout_ms: 1_000,
			},
		},
	}
}

async fn test_service() -> Option<(TestDatabase, BellaService)> {
	let base_dsn = match bella_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping service tests; set BELLA_PG_DSN to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let config = test_config(test_db.dsn());
	let db = Db::connect(&config.storage.postgres).await.expect("Failed to connect.");

	db.ensure_schema().await.expect("Failed to bootstrap schema.");

	let providers =
		bella_service::Providers::new(Arc::new(StubIdentity), Arc::new(StubMedia));
	let service = BellaService::with_providers(config, db, providers);

	Some((test_db, service))
}

/// Member ids are minted from the clock; space out consecutive signups.
async fn settle() {
	tokio::time::sleep(std::time::Duration::from_millis(2)).await;
}

async fn seed_hospital(service: &BellaService, name: &str, description: &str) -> i64 {
	let admin = service
		.create_admin(bella_service::AdminCreateRequest {
			login_id: format!("admin-{name}"),
			password: "hunter2".to_string(),
			hospital_id: None,
			hospital_name: name.to_string(),
		})
		.await
		.expect("Failed to create admin.");
	let viewer = service.resolve_viewer(Some(&admin.tokens.access_token));
	let response = service
		.add_hospital(
			&viewer,
			AddHospitalRequest {
				hospital_name: name.to_string(),
				location: "Seoul".to_string(),
				description: description.to_string(),
				video_link: None,
				sequence: 0,
				infra_ids: vec![],
			},
			vec![],
			vec![],
			vec![],
		)
		.await
		.expect("Failed to create hospital.");

	settle().await;

	response.hospital_id
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn sign_up_then_sign_in_returns_same_member() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let first = service.login("amy@example.com|Amy").await.expect("Failed to sign up.");
	let second = service.login("amy@example.com|Amy").await.expect("Failed to sign in.");

	assert_eq!(first.member_id, second.member_id);
	assert_eq!(second.login_email, "amy@example.com");
	assert!(second.tokens.access_expires_at > time::OffsetDateTime::now_utc());
	assert!(second.tokens.refresh_expires_at > second.tokens.access_expires_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn refresh_overwrites_the_stored_pair() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let session = service.login("bob@example.com|Bob").await.expect("Failed to sign up.");
	let refreshed = service
		.refresh_session(&session.tokens.refresh_token)
		.await
		.expect("Failed to refresh.");

	assert_eq!(refreshed.member_id, session.member_id);

	let relogin = service.login("bob@example.com|Bob").await.expect("Failed to sign in.");

	assert_eq!(relogin.tokens.access_token, refreshed.tokens.access_token);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn favorite_toggle_flips_is_mine() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Glow Clinic", "Dermatology.").await;
	let session = service.login("viewer@example.com|Viewer").await.expect("Failed to login.");
	let viewer = service.resolve_viewer(Some(&session.tokens.access_token));
	let anonymous = service.resolve_viewer(None);
	let request = ListHospitalsRequest { category: 0, sort: 0 };

	let toggled = service
		.toggle_hospital_favorite(&viewer, hospital_id)
		.await
		.expect("Failed to toggle favorite.");

	assert!(toggled.favorited);

	let listing = service.list_hospitals(&viewer, request).await.expect("Failed to list.");

	assert!(listing.hospitals.iter().all(|h| h.hospital_id != hospital_id || h.is_mine));

	let anonymous_listing =
		service.list_hospitals(&anonymous, request).await.expect("Failed to list.");

	assert!(anonymous_listing.hospitals.iter().all(|h| !h.is_mine));

	let toggled = service
		.toggle_hospital_favorite(&viewer, hospital_id)
		.await
		.expect("Failed to toggle favorite.");

	assert!(!toggled.favorited);

	let listing = service.list_hospitals(&viewer, request).await.expect("Failed to list.");

	assert!(listing.hospitals.iter().all(|h| !h.is_mine));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn category_filter_emits_one_summary_per_matching_doctor() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Lift Clinic", "Plastic surgery.").await;
	let lifting = service.create_category("lifting").await.expect("Failed to create tag.");
	let other = service.create_category("botox").await.expect("Failed to create tag.");
	let admin = service
		.create_admin(bella_service::AdminCreateRequest {
			login_id: "doctor-admin".to_string(),
			password: "hunter2".to_string(),
			hospital_id: Some(hospital_id),
			hospital_name: "Lift Clinic".to_string(),
		})
		.await
		.expect("Failed to create admin.");
	let viewer = service.resolve_viewer(Some(&admin.tokens.access_token));

	for (name, category_ids) in [
		("Dr. One", vec![lifting.id]),
		("Dr. Two", vec![lifting.id, other.id]),
		("Dr. Three", vec![lifting.id]),
		("Dr. Four", vec![other.id]),
	] {
		service
			.add_doctor(
				&viewer,
				AddDoctorRequest {
					doctor_name: name.to_string(),
					hospital_id,
					description: "Board certified.".to_string(),
					sequence: 0,
					career_names: vec![],
					career_dates: vec![],
					intro_links: vec![],
					category_ids,
				},
				None,
			)
			.await
			.expect("Failed to create doctor.");
	}

	let unfiltered = service
		.list_hospitals(&viewer, ListHospitalsRequest { category: 0, sort: 0 })
		.await
		.expect("Failed to list.");

	assert_eq!(
		unfiltered.hospitals.iter().filter(|h| h.hospital_id == hospital_id).count(),
		1
	);

	let filtered = service
		.list_hospitals(&viewer, ListHospitalsRequest { category: lifting.id, sort: 0 })
		.await
		.expect("Failed to list.");

	// Three doctors carry the tag, so the hospital surfaces three times.
	assert_eq!(
		filtered.hospitals.iter().filter(|h| h.hospital_id == hospital_id).count(),
		3
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn search_unions_name_and_description_hits_once_each() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	seed_hospital(&service, "glow clinic", "Dermatology.").await;
	seed_hospital(&service, "glow derma", "We make skin glow.").await;
	seed_hospital(&service, "plain clinic", "The glow specialists.").await;
	seed_hospital(&service, "other clinic", "Nothing to see.").await;

	let viewer = service.resolve_viewer(None);
	let found = service
		.search_hospitals(&viewer, SearchHospitalsRequest { query: "glow".to_string() })
		.await
		.expect("Failed to search.");

	assert_eq!(found.hospitals.len(), 3);
	assert!(found.hospitals.iter().all(|h| !h.is_mine));

	let missing = service
		.search_hospitals(&viewer, SearchHospitalsRequest { query: "zzz".to_string() })
		.await;

	assert!(matches!(missing, Err(Error::NoResults)));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn detail_with_zero_reviews_returns_empty_sequences() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Quiet Clinic", "No reviews yet.").await;
	let viewer = service.resolve_viewer(None);
	let detail =
		service.hospital_detail(&viewer, hospital_id).await.expect("Failed to load detail.");

	assert_eq!(detail.hospital_id, hospital_id);
	assert!(detail.reviews.is_empty());
	assert_eq!(detail.review_num, 0);
	assert!(!detail.is_mine);

	let missing = service.hospital_detail(&viewer, 424_242).await;

	assert!(matches!(missing, Err(Error::NotFound { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn add_hospital_with_unknown_infra_persists_nothing() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let admin = service
		.create_admin(bella_service::AdminCreateRequest {
			login_id: "lone-admin".to_string(),
			password: "hunter2".to_string(),
			hospital_id: None,
			hospital_name: "Vapor Clinic".to_string(),
		})
		.await
		.expect("Failed to create admin.");
	let viewer = service.resolve_viewer(Some(&admin.tokens.access_token));
	let result = service
		.add_hospital(
			&viewer,
			AddHospitalRequest {
				hospital_name: "Vapor Clinic".to_string(),
				location: "Seoul".to_string(),
				description: "Never persisted.".to_string(),
				video_link: None,
				sequence: 0,
				infra_ids: vec![999],
			},
			vec!["https://cdn.test/hospital/a.png".to_string()],
			vec![],
			vec![],
		)
		.await;

	assert!(matches!(result, Err(Error::NotFound { .. })));

	let hospitals: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hospitals")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count hospitals.");
	let images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count images.");

	assert_eq!(hospitals, 0);
	assert_eq!(images, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn rejected_viewer_fails_aggregations() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let viewer = service.resolve_viewer(Some("not-a-credential"));
	let result =
		service.list_hospitals(&viewer, ListHospitalsRequest { category: 0, sort: 0 }).await;

	assert!(matches!(result, Err(Error::InvalidCredential)));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn mismatched_career_sequences_fail_before_writing() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Career Clinic", "Dermatology.").await;
	let session = service.login("carol@example.com|Carol").await.expect("Failed to login.");
	let viewer = service.resolve_viewer(Some(&session.tokens.access_token));
	let result = service
		.add_doctor(
			&viewer,
			AddDoctorRequest {
				doctor_name: "Dr. Zip".to_string(),
				hospital_id,
				description: "Board certified.".to_string(),
				sequence: 0,
				career_names: vec!["Residency".to_string(), "Fellowship".to_string()],
				career_dates: vec!["2019".to_string()],
				intro_links: vec![],
				category_ids: vec![],
			},
			None,
		)
		.await;

	assert!(matches!(result, Err(Error::Precondition { .. })));

	let doctors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to count doctors.");

	assert_eq!(doctors, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

async fn seed_review(
	service: &BellaService,
	viewer: &bella_domain::viewer::ViewerContext,
	hospital_id: i64,
	category_id: Option<i64>,
	title: &str,
	before_urls: Vec<String>,
	after_urls: Vec<String>,
) -> i64 {
	service
		.add_review(
			viewer,
			AddReviewRequest {
				hospital_id,
				doctor_id: None,
				category_id,
				title: title.to_string(),
				content: "Very satisfied.".to_string(),
				rate: 4.5,
			},
			before_urls,
			after_urls,
		)
		.await
		.expect("Failed to create review.")
		.review_id
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn review_detail_returns_media_in_position_order() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Media Clinic", "Dermatology.").await;
	let session = service.login("fay@example.com|Fay").await.expect("Failed to login.");
	let viewer = service.resolve_viewer(Some(&session.tokens.access_token));
	let review_id = seed_review(
		&service,
		&viewer,
		hospital_id,
		None,
		"Great lift",
		vec![
			"https://cdn.test/review/b0.png".to_string(),
			"https://cdn.test/review/b1.png".to_string(),
		],
		vec!["https://cdn.test/review/a0.png".to_string()],
	)
	.await;

	let detail = service
		.review_detail(&service.resolve_viewer(None), review_id)
		.await
		.expect("Failed to load review detail.");

	assert_eq!(detail.review.review_id, review_id);
	assert_eq!(detail.review.title, "Great lift");
	assert_eq!(detail.befores, [
		"https://cdn.test/review/b0.png",
		"https://cdn.test/review/b1.png"
	]);
	assert_eq!(detail.afters, ["https://cdn.test/review/a0.png"]);

	let missing = service.review_detail(&viewer, 424_242).await;

	assert!(matches!(missing, Err(Error::NotFound { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn review_listing_treats_category_zero_as_unfiltered() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "List Clinic", "Dermatology.").await;
	let lifting = service.create_category("lifting").await.expect("Failed to create tag.");
	let session = service.login("gus@example.com|Gus").await.expect("Failed to login.");
	let viewer = service.resolve_viewer(Some(&session.tokens.access_token));
	let tagged = seed_review(
		&service,
		&viewer,
		hospital_id,
		Some(lifting.id),
		"Lifted",
		vec![],
		vec![],
	)
	.await;

	seed_review(&service, &viewer, hospital_id, None, "Untagged", vec![], vec![]).await;

	let all = service
		.reviews_by_category(&viewer, 0)
		.await
		.expect("Failed to list reviews.");

	assert_eq!(all.reviews.len(), 2);

	let filtered = service
		.reviews_by_category(&viewer, lifting.id)
		.await
		.expect("Failed to list reviews.");

	assert_eq!(filtered.reviews.len(), 1);
	assert_eq!(filtered.reviews[0].review_id, tagged);

	// An empty filtered listing is a success, unlike search.
	let empty = service
		.reviews_by_category(&viewer, lifting.id + 1)
		.await
		.expect("Failed to list reviews.");

	assert!(empty.reviews.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn review_search_mirrors_the_no_results_policy() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let hospital_id = seed_hospital(&service, "Search Clinic", "Dermatology.").await;
	let session = service.login("hana@example.com|Hana").await.expect("Failed to login.");
	let viewer = service.resolve_viewer(Some(&session.tokens.access_token));

	seed_review(&service, &viewer, hospital_id, None, "Glow up", vec![], vec![]).await;
	seed_review(&service, &viewer, hospital_id, None, "Plain visit", vec![], vec![]).await;

	let found = service
		.search_reviews(&viewer, "Glow")
		.await
		.expect("Failed to search reviews.");

	assert_eq!(found.reviews.len(), 1);
	assert_eq!(found.reviews[0].title, "Glow up");

	let missing = service.search_reviews(&viewer, "zzz").await;

	assert!(matches!(missing, Err(Error::NoResults)));

	let blank = service.search_reviews(&viewer, "   ").await;

	assert!(matches!(blank, Err(Error::InvalidRequest { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set BELLA_PG_DSN to run."]
async fn comment_lifecycle_enforces_authorship() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let author = service.login("dora@example.com|Dora").await.expect("Failed to login.");

	settle().await;

	let other = service.login("eric@example.com|Eric").await.expect("Failed to login.");
	let author_viewer = service.resolve_viewer(Some(&author.tokens.access_token));
	let other_viewer = service.resolve_viewer(Some(&other.tokens.access_token));
	let comment = service
		.add_comment(
			&author_viewer,
			bella_service::AddCommentRequest { post_id: 1, content: "First!".to_string() },
		)
		.await
		.expect("Failed to comment.");

	let forbidden = service
		.edit_comment(
			&other_viewer,
			comment.comment_id,
			bella_service::EditCommentRequest { content: "Hijacked.".to_string() },
		)
		.await;

	assert!(matches!(forbidden, Err(Error::InvalidRequest { .. })));

	let liked = service
		.like_comment(&other_viewer, comment.comment_id)
		.await
		.expect("Failed to like.");

	assert!(liked.liked);
	assert_eq!(liked.like_num, 1);

	service
		.delete_comment(&author_viewer, comment.comment_id)
		.await
		.expect("Failed to delete.");

	let listing =
		service.list_comments(&other_viewer, 1).await.expect("Failed to list comments.");

	assert!(listing.comments.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
