use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Member {
	pub member_id: i64,
	pub login_email: String,
	pub nickname: String,
	pub profile_img: String,
	pub phone: Option<String>,
	pub ban: bool,
	pub sign_out: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenPair {
	pub member_id: i64,
	pub access_token: String,
	pub access_expires_at: OffsetDateTime,
	pub refresh_token: String,
	pub refresh_expires_at: OffsetDateTime,
	pub issued_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
	pub member_id: i64,
	pub admin_login_id: String,
	pub admin_password: String,
	pub hospital_id: Option<i64>,
	pub hospital_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Hospital {
	pub hospital_id: i64,
	pub hospital_name: String,
	pub location: String,
	pub description: String,
	pub video_link: Option<String>,
	pub sequence: i64,
	pub total_rate: f32,
	pub view_count: i64,
	pub anesthesiologists: i64,
	pub plastic_surgeons: i64,
	pub dermatologists: i64,
	pub deleted: bool,
	pub admin_id: i64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Doctor {
	pub doctor_id: i64,
	pub doctor_name: String,
	pub doctor_image: Option<String>,
	pub hospital_id: i64,
	pub description: String,
	pub sequence: i64,
	pub total_rate: f32,
	pub admin_id: i64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
	pub review_id: i64,
	pub hospital_id: i64,
	pub doctor_id: Option<i64>,
	pub member_id: i64,
	pub category_id: Option<i64>,
	pub title: String,
	pub content: String,
	pub rate: f32,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Image {
	pub image_id: i64,
	pub image_url: String,
	pub member_id: i64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Infra {
	pub infra_id: i64,
	pub label: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
	pub category_id: i64,
	pub label: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Career {
	pub career_id: i64,
	pub doctor_id: i64,
	pub career_name: String,
	pub career_date: String,
	pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IntroLink {
	pub link_id: i64,
	pub doctor_id: i64,
	pub link_url: String,
	pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
	pub comment_id: i64,
	pub post_id: i64,
	pub member_id: i64,
	pub content: String,
	pub deleted: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
