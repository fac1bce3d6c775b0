use time::OffsetDateTime;

use bella_domain::viewer::ViewerContext;
use bella_storage::{comments, models::Comment};

use crate::{
	BellaService, Entity, Error, Result,
	viewer::{ensure_not_rejected, member_id_of},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AddCommentRequest {
	pub post_id: i64,
	pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EditCommentRequest {
	pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommentItem {
	pub comment_id: i64,
	pub post_id: i64,
	pub member_id: i64,
	pub content: String,
	pub like_num: i64,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LikeCommentResponse {
	pub liked: bool,
	pub like_num: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListCommentsResponse {
	pub comments: Vec<CommentItem>,
}

impl BellaService {
	pub async fn add_comment(
		&self,
		viewer: &ViewerContext,
		req: AddCommentRequest,
	) -> Result<CommentItem> {
		let member_id = member_id_of(viewer)?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let comment_id =
			comments::insert(&mut *tx, req.post_id, member_id, &req.content, now).await?;

		tx.commit().await?;

		Ok(CommentItem {
			comment_id,
			post_id: req.post_id,
			member_id,
			content: req.content,
			like_num: 0,
			created_at: now,
			updated_at: now,
		})
	}

	/// Only the author may edit; a deleted comment is gone for everyone.
	pub async fn edit_comment(
		&self,
		viewer: &ViewerContext,
		comment_id: i64,
		req: EditCommentRequest,
	) -> Result<CommentItem> {
		let member_id = member_id_of(viewer)?;
		let comment = self.live_comment(comment_id).await?;

		if comment.member_id != member_id {
			return Err(Error::InvalidRequest {
				message: "only the author may edit a comment".into(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let updated = comments::update_content(&mut *tx, comment_id, &req.content, now).await?;

		tx.commit().await?;

		if updated == 0 {
			return Err(Error::not_found(Entity::Comment, comment_id));
		}

		let like_num = comments::like_count(&self.db.pool, comment_id).await?;

		Ok(CommentItem {
			comment_id,
			post_id: comment.post_id,
			member_id: comment.member_id,
			content: req.content,
			like_num,
			created_at: comment.created_at,
			updated_at: now,
		})
	}

	pub async fn delete_comment(&self, viewer: &ViewerContext, comment_id: i64) -> Result<()> {
		let member_id = member_id_of(viewer)?;
		let comment = self.live_comment(comment_id).await?;

		if comment.member_id != member_id {
			return Err(Error::InvalidRequest {
				message: "only the author may delete a comment".into(),
			});
		}

		let mut tx = self.db.pool.begin().await?;
		let deleted =
			comments::soft_delete(&mut *tx, comment_id, OffsetDateTime::now_utc()).await?;

		tx.commit().await?;

		if deleted == 0 {
			return Err(Error::not_found(Entity::Comment, comment_id));
		}

		Ok(())
	}

	/// Toggles the viewer's like and reports the new count. Last write wins
	/// under concurrent toggles.
	pub async fn like_comment(
		&self,
		viewer: &ViewerContext,
		comment_id: i64,
	) -> Result<LikeCommentResponse> {
		let member_id = member_id_of(viewer)?;

		self.live_comment(comment_id).await?;

		let mut tx = self.db.pool.begin().await?;
		let liked =
			comments::toggle_like(&mut *tx, comment_id, member_id, OffsetDateTime::now_utc())
				.await?;

		tx.commit().await?;

		let like_num = comments::like_count(&self.db.pool, comment_id).await?;

		Ok(LikeCommentResponse { liked, like_num })
	}

	pub async fn list_comments(
		&self,
		viewer: &ViewerContext,
		post_id: i64,
	) -> Result<ListCommentsResponse> {
		ensure_not_rejected(viewer)?;

		let mut items = Vec::new();

		for comment in comments::by_post(&self.db.pool, post_id).await? {
			let like_num = comments::like_count(&self.db.pool, comment.comment_id).await?;

			items.push(CommentItem {
				comment_id: comment.comment_id,
				post_id: comment.post_id,
				member_id: comment.member_id,
				content: comment.content,
				like_num,
				created_at: comment.created_at,
				updated_at: comment.updated_at,
			});
		}

		Ok(ListCommentsResponse { comments: items })
	}

	async fn live_comment(&self, comment_id: i64) -> Result<Comment> {
		let comment = comments::find_by_id(&self.db.pool, comment_id)
			.await?
			.ok_or_else(|| Error::not_found(Entity::Comment, comment_id))?;

		if comment.deleted {
			return Err(Error::not_found(Entity::Comment, comment_id));
		}

		Ok(comment)
	}
}
