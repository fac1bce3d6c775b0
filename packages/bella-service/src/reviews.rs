use time::OffsetDateTime;

use bella_domain::viewer::ViewerContext;
use bella_storage::{doctors, hospitals, images, models::Review, reviews};

use crate::{
	BellaService, Entity, Error, Result,
	hospitals::{IMAGE_ROLE_AFTER, IMAGE_ROLE_BEFORE},
	viewer::{ensure_not_rejected, member_id_of},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddReviewRequest {
	pub hospital_id: i64,
	pub doctor_id: Option<i64>,
	pub category_id: Option<i64>,
	pub title: String,
	pub content: String,
	pub rate: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddReviewResponse {
	pub review_id: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReviewItem {
	pub review_id: i64,
	pub hospital_id: i64,
	pub doctor_id: Option<i64>,
	pub category_id: Option<i64>,
	pub title: String,
	pub content: String,
	pub rate: f32,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListReviewsResponse {
	pub reviews: Vec<ReviewItem>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReviewDetailResponse {
	pub review: ReviewItem,
	pub befores: Vec<String>,
	pub afters: Vec<String>,
}

impl BellaService {
	/// Persists the review and its before/after media in one transaction.
	/// Hospital, optional doctor, and optional category must all resolve
	/// first.
	pub async fn add_review(
		&self,
		viewer: &ViewerContext,
		req: AddReviewRequest,
		before_urls: Vec<String>,
		after_urls: Vec<String>,
	) -> Result<AddReviewResponse> {
		let member_id = member_id_of(viewer)?;

		hospitals::find_by_id(&self.db.pool, req.hospital_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Hospital, req.hospital_id))?;

		if let Some(doctor_id) = req.doctor_id {
			doctors::find_by_id(&self.db.pool, doctor_id)
				.await?
				.ok_or_else(|| Error::not_found(Entity::Doctor, doctor_id))?;
		}
		if let Some(category_id) = req.category_id {
			self.resolve_categories(&[category_id]).await?;
		}

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let review_id = reviews::insert(&mut *tx, reviews::NewReview {
			hospital_id: req.hospital_id,
			doctor_id: req.doctor_id,
			member_id,
			category_id: req.category_id,
			title: &req.title,
			content: &req.content,
			rate: req.rate,
			created_at: now,
		})
		.await?;
		let batches = [(IMAGE_ROLE_BEFORE, &before_urls), (IMAGE_ROLE_AFTER, &after_urls)];

		for (role, urls) in batches {
			for (position, url) in urls.iter().enumerate() {
				let image_id = images::insert(&mut *tx, url, member_id, now).await?;

				reviews::link_image(&mut *tx, review_id, image_id, role, position as _)
					.await?;
			}
		}

		tx.commit().await?;

		tracing::info!(review_id, hospital_id = req.hospital_id, "Created a review.");

		Ok(AddReviewResponse { review_id })
	}

	/// The review plus its before/after media, in stored position order.
	pub async fn review_detail(
		&self,
		viewer: &ViewerContext,
		review_id: i64,
	) -> Result<ReviewDetailResponse> {
		ensure_not_rejected(viewer)?;

		let review = reviews::find_by_id(&self.db.pool, review_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Review, review_id))?;
		let befores =
			reviews::image_urls_for(&self.db.pool, review_id, IMAGE_ROLE_BEFORE).await?;
		let afters =
			reviews::image_urls_for(&self.db.pool, review_id, IMAGE_ROLE_AFTER).await?;

		Ok(ReviewDetailResponse { review: review_item(review), befores, afters })
	}

	/// `category = 0` lists every review. An empty listing is a valid
	/// success here, unlike search.
	pub async fn reviews_by_category(
		&self,
		viewer: &ViewerContext,
		category: i64,
	) -> Result<ListReviewsResponse> {
		ensure_not_rejected(viewer)?;

		let category_id = (category != 0).then_some(category);
		let found = reviews::by_category(&self.db.pool, category_id).await?;

		Ok(ListReviewsResponse { reviews: found.into_iter().map(review_item).collect() })
	}

	/// Substring match on review titles; no match is `NoResults`.
	pub async fn search_reviews(
		&self,
		viewer: &ViewerContext,
		query: &str,
	) -> Result<ListReviewsResponse> {
		ensure_not_rejected(viewer)?;

		let query = query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest {
				message: "search query must not be empty".into(),
			});
		}

		let found = reviews::search_by_title(&self.db.pool, query).await?;

		if found.is_empty() {
			return Err(Error::NoResults);
		}

		Ok(ListReviewsResponse { reviews: found.into_iter().map(review_item).collect() })
	}
}

fn review_item(review: Review) -> ReviewItem {
	ReviewItem {
		review_id: review.review_id,
		hospital_id: review.hospital_id,
		doctor_id: review.doctor_id,
		category_id: review.category_id,
		title: review.title,
		content: review.content,
		rate: review.rate,
		created_at: review.created_at,
	}
}
