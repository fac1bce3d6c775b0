use bella_storage::{
	models::{Category, Infra},
	tags,
};

use crate::{BellaService, Entity, Error, Result, hospitals::TagItem};

impl BellaService {
	/// Resolves each infra tag id or fails on the first unresolved one.
	pub(crate) async fn resolve_infras(&self, infra_ids: &[i64]) -> Result<Vec<Infra>> {
		let mut infras = Vec::with_capacity(infra_ids.len());

		for &infra_id in infra_ids {
			let infra = tags::find_infra(&self.db.pool, infra_id)
				.await?
				.ok_or_else(|| Error::not_found(Entity::Infra, infra_id))?;

			infras.push(infra);
		}

		Ok(infras)
	}

	pub(crate) async fn resolve_categories(&self, category_ids: &[i64]) -> Result<Vec<Category>> {
		let mut categories = Vec::with_capacity(category_ids.len());

		for &category_id in category_ids {
			let category = tags::find_category(&self.db.pool, category_id)
				.await?
				.ok_or_else(|| Error::not_found(Entity::Category, category_id))?;

			categories.push(category);
		}

		Ok(categories)
	}

	pub async fn create_infra(&self, label: &str) -> Result<TagItem> {
		let mut tx = self.db.pool.begin().await?;
		let infra_id = tags::insert_infra(&mut *tx, label).await?;

		tx.commit().await?;

		tracing::info!(infra_id, label, "Created an infra tag.");

		Ok(TagItem { id: infra_id, label: label.to_string() })
	}

	pub async fn create_category(&self, label: &str) -> Result<TagItem> {
		let mut tx = self.db.pool.begin().await?;
		let category_id = tags::insert_category(&mut *tx, label).await?;

		tx.commit().await?;

		tracing::info!(category_id, label, "Created a category tag.");

		Ok(TagItem { id: category_id, label: label.to_string() })
	}
}
