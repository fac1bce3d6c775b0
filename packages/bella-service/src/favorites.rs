use time::OffsetDateTime;

use bella_domain::viewer::ViewerContext;
use bella_storage::{doctors, favorites, hospitals};

use crate::{
	BellaService, Entity, Error, Result,
	viewer::{ensure_not_rejected, member_id_of},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToggleFavoriteResponse {
	pub favorited: bool,
}

impl BellaService {
	/// An anonymous viewer never favorited anything; no storage round-trip
	/// happens for it. A rejected viewer fails the whole request.
	pub(crate) async fn is_hospital_favorited(
		&self,
		viewer: &ViewerContext,
		hospital_id: i64,
	) -> Result<bool> {
		ensure_not_rejected(viewer)?;

		match viewer.member_id() {
			None => Ok(false),
			Some(member_id) =>
				Ok(favorites::hospital_exists(&self.db.pool, hospital_id, member_id).await?),
		}
	}

	pub(crate) async fn is_doctor_favorited(
		&self,
		viewer: &ViewerContext,
		doctor_id: i64,
	) -> Result<bool> {
		ensure_not_rejected(viewer)?;

		match viewer.member_id() {
			None => Ok(false),
			Some(member_id) =>
				Ok(favorites::doctor_exists(&self.db.pool, doctor_id, member_id).await?),
		}
	}

	pub async fn toggle_hospital_favorite(
		&self,
		viewer: &ViewerContext,
		hospital_id: i64,
	) -> Result<ToggleFavoriteResponse> {
		let member_id = member_id_of(viewer)?;

		hospitals::find_by_id(&self.db.pool, hospital_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Hospital, hospital_id))?;

		let mut tx = self.db.pool.begin().await?;
		let favorited = favorites::toggle_hospital(
			&mut *tx,
			hospital_id,
			member_id,
			OffsetDateTime::now_utc(),
		)
		.await?;

		tx.commit().await?;

		Ok(ToggleFavoriteResponse { favorited })
	}

	pub async fn toggle_doctor_favorite(
		&self,
		viewer: &ViewerContext,
		doctor_id: i64,
	) -> Result<ToggleFavoriteResponse> {
		let member_id = member_id_of(viewer)?;

		doctors::find_by_id(&self.db.pool, doctor_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Doctor, doctor_id))?;

		let mut tx = self.db.pool.begin().await?;
		let favorited =
			favorites::toggle_doctor(&mut *tx, doctor_id, member_id, OffsetDateTime::now_utc())
				.await?;

		tx.commit().await?;

		Ok(ToggleFavoriteResponse { favorited })
	}
}
