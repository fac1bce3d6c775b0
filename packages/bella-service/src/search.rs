use ahash::AHashSet;

use bella_domain::viewer::ViewerContext;
use bella_storage::{hospitals, models::Hospital, reviews};

use crate::{
	BellaService, Entity, Error, Result, hospitals::HospitalSummary, viewer::ensure_not_rejected,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHospitalsRequest {
	pub query: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchHospitalsResponse {
	pub hospitals: Vec<HospitalSummary>,
}

impl BellaService {
	/// Unions substring matches on name and description into one
	/// deduplicated set. An empty union is `NoResults`, never an empty
	/// success. `is_mine` is always false here, whoever the viewer is.
	pub async fn search_hospitals(
		&self,
		viewer: &ViewerContext,
		req: SearchHospitalsRequest,
	) -> Result<SearchHospitalsResponse> {
		ensure_not_rejected(viewer)?;

		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest {
				message: "search query must not be empty".into(),
			});
		}

		let mut hits = hospitals::search_by_name(&self.db.pool, query).await?;

		hits.extend(hospitals::search_by_description(&self.db.pool, query).await?);

		let mut summaries = Vec::with_capacity(hits.len());

		for hit in &hits {
			summaries.push(self.search_summary(hit.hospital_id).await?);
		}

		let summaries = dedup_by_id(summaries);

		if summaries.is_empty() {
			return Err(Error::NoResults);
		}

		Ok(SearchHospitalsResponse { hospitals: summaries })
	}

	/// Re-fetches the hit by id so the projection reflects current state; a
	/// vanished row is an internal consistency failure.
	async fn search_summary(&self, hospital_id: i64) -> Result<HospitalSummary> {
		let hospital: Hospital = hospitals::find_by_id(&self.db.pool, hospital_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Hospital, hospital_id))?;
		let image = hospitals::first_banner_url(&self.db.pool, hospital_id).await?;
		let review_num = reviews::count_for_hospital(&self.db.pool, hospital_id).await?;

		Ok(HospitalSummary {
			hospital_id: hospital.hospital_id,
			hospital_name: hospital.hospital_name,
			hospital_image: image,
			location: hospital.location,
			rate: hospital.total_rate,
			review_num,
			is_mine: false,
		})
	}
}

/// First occurrence wins; a hospital matching both lookups keeps its
/// name-lookup position.
fn dedup_by_id(summaries: Vec<HospitalSummary>) -> Vec<HospitalSummary> {
	let mut seen = AHashSet::with_capacity(summaries.len());

	summaries.into_iter().filter(|summary| seen.insert(summary.hospital_id)).collect()
}
