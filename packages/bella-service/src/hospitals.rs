use ahash::{AHashMap, AHashSet};
use time::OffsetDateTime;

use bella_domain::{
	ranking::{CategoryFilter, SortMode},
	viewer::ViewerContext,
};
use bella_storage::{
	doctors, hospitals, images,
	models::{Career, Category, Hospital, Infra},
	reviews,
};

use crate::{
	BellaService, Entity, Error, Result,
	viewer::{ensure_not_rejected, member_id_of},
};

pub const IMAGE_ROLE_BANNER: &str = "banner";
pub const IMAGE_ROLE_BEFORE: &str = "before";
pub const IMAGE_ROLE_AFTER: &str = "after";

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ListHospitalsRequest {
	/// `0` lists every hospital once; a positive id lists one summary per
	/// doctor tagged with that category.
	pub category: i64,
	/// `0` orders by aggregate rating, anything else by view count.
	pub sort: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListHospitalsResponse {
	pub hospitals: Vec<HospitalSummary>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HospitalSummary {
	pub hospital_id: i64,
	pub hospital_name: String,
	pub hospital_image: Option<String>,
	pub location: String,
	pub rate: f32,
	pub review_num: i64,
	pub is_mine: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TagItem {
	pub id: i64,
	pub label: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CareerItem {
	pub career_name: String,
	pub career_date: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DoctorSummary {
	pub doctor_id: i64,
	pub doctor_name: String,
	pub doctor_image: Option<String>,
	pub description: String,
	pub rate: f32,
	pub review_num: i64,
	pub is_mine: bool,
	pub categories: Vec<TagItem>,
	pub careers: Vec<CareerItem>,
	pub intro_links: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReviewSummary {
	pub review_id: i64,
	pub title: String,
	pub rate: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HospitalDetailResponse {
	pub hospital_id: i64,
	pub hospital_name: String,
	pub location: String,
	pub description: String,
	pub video_link: Option<String>,
	pub rate: f32,
	pub review_num: i64,
	pub is_mine: bool,
	pub banners: Vec<String>,
	pub befores: Vec<String>,
	pub afters: Vec<String>,
	pub infras: Vec<TagItem>,
	pub doctors: Vec<DoctorSummary>,
	pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddHospitalRequest {
	pub hospital_name: String,
	pub location: String,
	pub description: String,
	pub video_link: Option<String>,
	pub sequence: i64,
	pub infra_ids: Vec<i64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddHospitalResponse {
	pub hospital_id: i64,
}

impl BellaService {
	/// Lists every non-deleted hospital in ranking order. With a category
	/// filter, a hospital surfaces once per doctor tagged with the filter,
	/// so three matching doctors yield three summaries.
	pub async fn list_hospitals(
		&self,
		viewer: &ViewerContext,
		req: ListHospitalsRequest,
	) -> Result<ListHospitalsResponse> {
		ensure_not_rejected(viewer)?;

		let sort = SortMode::from_code(req.sort);
		let filter = CategoryFilter::from_code(req.category);
		let all = hospitals::list_ordered(&self.db.pool, sort).await?;
		let review_nums: AHashMap<i64, i64> =
			reviews::counts_by_hospital(&self.db.pool).await?.into_iter().collect();
		let favorited: AHashSet<i64> = match viewer.member_id() {
			None => AHashSet::new(),
			Some(member_id) => bella_storage::favorites::hospital_ids_for_member(
				&self.db.pool,
				member_id,
			)
			.await?
			.into_iter()
			.collect(),
		};
		let mut summaries = Vec::new();

		for hospital in &all {
			let review_num = review_nums.get(&hospital.hospital_id).copied().unwrap_or(0);
			let is_mine = favorited.contains(&hospital.hospital_id);

			match filter {
				CategoryFilter::All =>
					summaries.push(summary(hospital, None, review_num, is_mine)),
				CategoryFilter::Category(category_id) => {
					let image =
						hospitals::first_banner_url(&self.db.pool, hospital.hospital_id)
							.await?;

					for doctor in doctors::by_hospital(&self.db.pool, hospital.hospital_id)
						.await?
					{
						let tag_ids =
							doctors::category_ids_for(&self.db.pool, doctor.doctor_id)
								.await?;

						if tag_ids.contains(&category_id) {
							summaries.push(summary(
								hospital,
								image.clone(),
								review_num,
								is_mine,
							));
						}
					}
				},
			}
		}

		Ok(ListHospitalsResponse { hospitals: summaries })
	}

	pub async fn hospital_detail(
		&self,
		viewer: &ViewerContext,
		hospital_id: i64,
	) -> Result<HospitalDetailResponse> {
		ensure_not_rejected(viewer)?;

		let hospital = hospitals::find_by_id(&self.db.pool, hospital_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Hospital, hospital_id))?;
		let review_num = reviews::count_for_hospital(&self.db.pool, hospital_id).await?;
		let is_mine = self.is_hospital_favorited(viewer, hospital_id).await?;
		let mut doctor_summaries = Vec::new();

		for doctor in doctors::by_hospital(&self.db.pool, hospital_id).await? {
			let categories = doctors::categories_for(&self.db.pool, doctor.doctor_id).await?;
			let careers = doctors::careers_for(&self.db.pool, doctor.doctor_id).await?;
			let intro_links = doctors::intro_links_for(&self.db.pool, doctor.doctor_id)
				.await?
				.into_iter()
				.map(|link| link.link_url)
				.collect();
			let doctor_review_num =
				reviews::count_for_doctor(&self.db.pool, doctor.doctor_id).await?;
			let doctor_is_mine = self.is_doctor_favorited(viewer, doctor.doctor_id).await?;

			doctor_summaries.push(DoctorSummary {
				doctor_id: doctor.doctor_id,
				doctor_name: doctor.doctor_name,
				doctor_image: doctor.doctor_image,
				description: doctor.description,
				rate: doctor.total_rate,
				review_num: doctor_review_num,
				is_mine: doctor_is_mine,
				categories: tag_items(categories),
				careers: career_items(careers),
				intro_links,
			});
		}

		let review_summaries = reviews::by_hospital(&self.db.pool, hospital_id)
			.await?
			.into_iter()
			.map(|review| ReviewSummary {
				review_id: review.review_id,
				title: review.title,
				rate: review.rate,
			})
			.collect();

		Ok(HospitalDetailResponse {
			hospital_id: hospital.hospital_id,
			hospital_name: hospital.hospital_name,
			location: hospital.location,
			description: hospital.description,
			video_link: hospital.video_link,
			rate: hospital.total_rate,
			review_num,
			is_mine,
			banners: image_urls(&self.db.pool, hospital_id, IMAGE_ROLE_BANNER).await?,
			befores: image_urls(&self.db.pool, hospital_id, IMAGE_ROLE_BEFORE).await?,
			afters: image_urls(&self.db.pool, hospital_id, IMAGE_ROLE_AFTER).await?,
			infras: infra_items(hospitals::infras_for(&self.db.pool, hospital_id).await?),
			doctors: doctor_summaries,
			reviews: review_summaries,
		})
	}

	/// Resolves every infra tag before the first write, then persists the
	/// hospital, its media records, and its infra links in one transaction.
	pub async fn add_hospital(
		&self,
		viewer: &ViewerContext,
		req: AddHospitalRequest,
		before_urls: Vec<String>,
		after_urls: Vec<String>,
		banner_urls: Vec<String>,
	) -> Result<AddHospitalResponse> {
		let member_id = member_id_of(viewer)?;
		let infras = self.resolve_infras(&req.infra_ids).await?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let hospital_id = hospitals::insert(&mut *tx, hospitals::NewHospital {
			hospital_name: &req.hospital_name,
			location: &req.location,
			description: &req.description,
			video_link: req.video_link.as_deref(),
			sequence: req.sequence,
			admin_id: member_id,
			created_at: now,
		})
		.await?;
		let batches = [
			(IMAGE_ROLE_BEFORE, &before_urls),
			(IMAGE_ROLE_AFTER, &after_urls),
			(IMAGE_ROLE_BANNER, &banner_urls),
		];

		for (role, urls) in batches {
			for (position, url) in urls.iter().enumerate() {
				let image_id = images::insert(&mut *tx, url, member_id, now).await?;

				hospitals::link_image(&mut *tx, hospital_id, image_id, role, position as _)
					.await?;
			}
		}

		for infra in &infras {
			hospitals::link_infra(&mut *tx, hospital_id, infra.infra_id).await?;
		}

		tx.commit().await?;

		tracing::info!(hospital_id, admin_id = member_id, "Created a hospital.");

		Ok(AddHospitalResponse { hospital_id })
	}
}

fn summary(
	hospital: &Hospital,
	image: Option<String>,
	review_num: i64,
	is_mine: bool,
) -> HospitalSummary {
	HospitalSummary {
		hospital_id: hospital.hospital_id,
		hospital_name: hospital.hospital_name.clone(),
		hospital_image: image,
		location: hospital.location.clone(),
		rate: hospital.total_rate,
		review_num,
		is_mine,
	}
}

fn tag_items(categories: Vec<Category>) -> Vec<TagItem> {
	categories
		.into_iter()
		.map(|category| TagItem { id: category.category_id, label: category.label })
		.collect()
}

fn infra_items(infras: Vec<Infra>) -> Vec<TagItem> {
	infras.into_iter().map(|infra| TagItem { id: infra.infra_id, label: infra.label }).collect()
}

fn career_items(careers: Vec<Career>) -> Vec<CareerItem> {
	careers
		.into_iter()
		.map(|career| CareerItem {
			career_name: career.career_name,
			career_date: career.career_date,
		})
		.collect()
}

async fn image_urls(pool: &sqlx::PgPool, hospital_id: i64, role: &str) -> Result<Vec<String>> {
	Ok(hospitals::images_for(pool, hospital_id, role)
		.await?
		.into_iter()
		.map(|image| image.image_url)
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hospital(id: i64) -> Hospital {
		Hospital {
			hospital_id: id,
			hospital_name: format!("Clinic {id}"),
			location: "Seoul".into(),
			description: "Skin and plastic surgery.".into(),
			video_link: None,
			sequence: 0,
			total_rate: 4.5,
			view_count: 10,
			anesthesiologists: 1,
			plastic_surgeons: 2,
			dermatologists: 0,
			deleted: false,
			admin_id: 1,
			created_at: OffsetDateTime::UNIX_EPOCH,
		}
	}

	#[test]
	fn summary_carries_hospital_fields_and_viewer_flag() {
		let s = summary(&hospital(7), Some("https://cdn/banner.png".into()), 3, true);

		assert_eq!(s.hospital_id, 7);
		assert_eq!(s.hospital_image.as_deref(), Some("https://cdn/banner.png"));
		assert_eq!(s.review_num, 3);
		assert!(s.is_mine);
	}

	#[test]
	fn unfiltered_summary_has_no_image() {
		let s = summary(&hospital(1), None, 0, false);

		assert!(s.hospital_image.is_none());
		assert!(!s.is_mine);
	}
}
