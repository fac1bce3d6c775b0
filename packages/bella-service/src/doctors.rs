use time::OffsetDateTime;

use bella_domain::viewer::ViewerContext;
use bella_storage::{doctors, hospitals};

use crate::{BellaService, Entity, Error, Result, viewer::member_id_of};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddDoctorRequest {
	pub doctor_name: String,
	pub hospital_id: i64,
	pub description: String,
	pub sequence: i64,
	pub career_names: Vec<String>,
	pub career_dates: Vec<String>,
	pub intro_links: Vec<String>,
	pub category_ids: Vec<i64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddDoctorResponse {
	pub doctor_id: i64,
}

impl BellaService {
	/// Careers are a positional zip of names and dates; mismatched lengths
	/// fail before anything is written. Every tag id must resolve and the
	/// hospital must exist.
	pub async fn add_doctor(
		&self,
		viewer: &ViewerContext,
		req: AddDoctorRequest,
		image_url: Option<String>,
	) -> Result<AddDoctorResponse> {
		let member_id = member_id_of(viewer)?;

		if req.career_names.len() != req.career_dates.len() {
			return Err(Error::Precondition {
				message: format!(
					"career names ({}) and dates ({}) must pair up",
					req.career_names.len(),
					req.career_dates.len()
				),
			});
		}

		hospitals::find_by_id(&self.db.pool, req.hospital_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Hospital, req.hospital_id))?;

		let categories = self.resolve_categories(&req.category_ids).await?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let doctor_id = doctors::insert(&mut *tx, doctors::NewDoctor {
			doctor_name: &req.doctor_name,
			doctor_image: image_url.as_deref(),
			hospital_id: req.hospital_id,
			description: &req.description,
			sequence: req.sequence,
			admin_id: member_id,
			created_at: now,
		})
		.await?;

		for (position, (name, date)) in
			req.career_names.iter().zip(&req.career_dates).enumerate()
		{
			doctors::add_career(&mut *tx, doctor_id, name, date, position as _).await?;
		}

		for (position, link) in req.intro_links.iter().enumerate() {
			doctors::add_intro_link(&mut *tx, doctor_id, link, position as _).await?;
		}

		for category in &categories {
			doctors::link_category(&mut *tx, doctor_id, category.category_id).await?;
		}

		tx.commit().await?;

		tracing::info!(doctor_id, hospital_id = req.hospital_id, "Created a doctor.");

		Ok(AddDoctorResponse { doctor_id })
	}
}
