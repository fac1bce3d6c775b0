use axum::{
	Json, Router,
	extract::{Multipart, Path, Query, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use bella_service::{
	AddCommentRequest, AddDoctorRequest, AddDoctorResponse, AddHospitalRequest,
	AddHospitalResponse, AddReviewRequest, AddReviewResponse, AdminCreateRequest, AdminResponse,
	BellaService, CommentItem, EditCommentRequest, Error as ServiceError, HospitalDetailResponse,
	LikeCommentResponse, ListCommentsResponse, ListHospitalsRequest, ListHospitalsResponse,
	ListReviewsResponse, ReviewDetailResponse, SearchHospitalsRequest, SearchHospitalsResponse,
	SessionResponse, ToggleFavoriteResponse, hospitals::TagItem,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/auth/login", post(login))
		.route("/v1/auth/refresh", post(refresh))
		.route("/v1/hospitals", get(list_hospitals).post(add_hospital))
		.route("/v1/hospitals/search", get(search_hospitals))
		.route("/v1/hospitals/{id}", get(hospital_detail))
		.route("/v1/hospitals/{id}/favorite", post(toggle_hospital_favorite))
		.route("/v1/doctors", post(add_doctor))
		.route("/v1/doctors/{id}/favorite", post(toggle_doctor_favorite))
		.route("/v1/reviews", get(list_reviews).post(add_review))
		.route("/v1/reviews/search", get(search_reviews))
		.route("/v1/reviews/{id}", get(review_detail))
		.route("/v1/comments", get(list_comments).post(add_comment))
		.route("/v1/comments/{id}", patch(edit_comment).delete(delete_comment))
		.route("/v1/comments/{id}/like", post(like_comment))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/members", post(create_admin))
		.route("/v1/admin/infras", post(create_infra))
		.route("/v1/admin/categories", post(create_category))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
	id_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
	refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
	#[serde(default)]
	category: i64,
	#[serde(default)]
	sort: i64,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
	query: String,
}

#[derive(Debug, Deserialize)]
struct CommentsQuery {
	post_id: i64,
}

#[derive(Debug, Deserialize)]
struct TagCreateRequest {
	label: String,
}

async fn login(
	State(state): State<AppState>,
	Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
	Ok(Json(state.service.login(&payload.id_token).await?))
}

async fn refresh(
	State(state): State<AppState>,
	Json(payload): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
	Ok(Json(state.service.refresh_session(&payload.refresh_token).await?))
}

async fn list_hospitals(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<ListQuery>,
) -> Result<Json<ListHospitalsResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());
	let request = ListHospitalsRequest { category: query.category, sort: query.sort };

	Ok(Json(state.service.list_hospitals(&viewer, request).await?))
}

async fn hospital_detail(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Json<HospitalDetailResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.hospital_detail(&viewer, id).await?))
}

async fn search_hospitals(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<SearchQuery>,
) -> Result<Json<SearchHospitalsResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());
	let request = SearchHospitalsRequest { query: query.query };

	Ok(Json(state.service.search_hospitals(&viewer, request).await?))
}

/// Multipart creation: a `request` JSON part plus `before`/`after`/`banner`
/// file parts. Files go to object storage before the entity is persisted;
/// when persistence fails, the uploaded objects are discarded.
async fn add_hospital(
	State(state): State<AppState>,
	headers: HeaderMap,
	multipart: Multipart,
) -> Result<Json<AddHospitalResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());
	let mut parts = collect_parts(multipart, &["before", "after", "banner"]).await?;
	let request: AddHospitalRequest = parts.request()?;
	let uploads = upload_files(&state.service, "hospital", parts.files).await?;
	let result = state
		.service
		.add_hospital(
			&viewer,
			request,
			uploads.urls_for("before"),
			uploads.urls_for("after"),
			uploads.urls_for("banner"),
		)
		.await;

	match result {
		Ok(response) => Ok(Json(response)),
		Err(error) => {
			uploads.discard(&state.service).await;

			Err(error.into())
		},
	}
}

async fn toggle_hospital_favorite(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.toggle_hospital_favorite(&viewer, id).await?))
}

async fn add_doctor(
	State(state): State<AppState>,
	headers: HeaderMap,
	multipart: Multipart,
) -> Result<Json<AddDoctorResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());
	let mut parts = collect_parts(multipart, &["image"]).await?;
	let request: AddDoctorRequest = parts.request()?;
	let uploads = upload_files(&state.service, "doctor", parts.files).await?;
	let image_url = uploads.urls_for("image").into_iter().next();
	let result = state.service.add_doctor(&viewer, request, image_url).await;

	match result {
		Ok(response) => Ok(Json(response)),
		Err(error) => {
			uploads.discard(&state.service).await;

			Err(error.into())
		},
	}
}

async fn toggle_doctor_favorite(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.toggle_doctor_favorite(&viewer, id).await?))
}

async fn list_reviews(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<ListQuery>,
) -> Result<Json<ListReviewsResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.reviews_by_category(&viewer, query.category).await?))
}

async fn review_detail(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Json<ReviewDetailResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.review_detail(&viewer, id).await?))
}

async fn search_reviews(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<SearchQuery>,
) -> Result<Json<ListReviewsResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.search_reviews(&viewer, &query.query).await?))
}

async fn add_review(
	State(state): State<AppState>,
	headers: HeaderMap,
	multipart: Multipart,
) -> Result<Json<AddReviewResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());
	let mut parts = collect_parts(multipart, &["before", "after"]).await?;
	let request: AddReviewRequest = parts.request()?;
	let uploads = upload_files(&state.service, "review", parts.files).await?;
	let result = state
		.service
		.add_review(&viewer, request, uploads.urls_for("before"), uploads.urls_for("after"))
		.await;

	match result {
		Ok(response) => Ok(Json(response)),
		Err(error) => {
			uploads.discard(&state.service).await;

			Err(error.into())
		},
	}
}

async fn list_comments(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<CommentsQuery>,
) -> Result<Json<ListCommentsResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.list_comments(&viewer, query.post_id).await?))
}

async fn add_comment(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<AddCommentRequest>,
) -> Result<Json<CommentItem>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.add_comment(&viewer, payload).await?))
}

async fn edit_comment(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
	Json(payload): Json<EditCommentRequest>,
) -> Result<Json<CommentItem>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.edit_comment(&viewer, id, payload).await?))
}

async fn delete_comment(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	state.service.delete_comment(&viewer, id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn like_comment(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(id): Path<i64>,
) -> Result<Json<LikeCommentResponse>, ApiError> {
	let viewer = state.service.resolve_viewer(bearer(&headers).as_deref());

	Ok(Json(state.service.like_comment(&viewer, id).await?))
}

async fn create_admin(
	State(state): State<AppState>,
	Json(payload): Json<AdminCreateRequest>,
) -> Result<Json<AdminResponse>, ApiError> {
	Ok(Json(state.service.create_admin(payload).await?))
}

async fn create_infra(
	State(state): State<AppState>,
	Json(payload): Json<TagCreateRequest>,
) -> Result<Json<TagItem>, ApiError> {
	Ok(Json(state.service.create_infra(&payload.label).await?))
}

async fn create_category(
	State(state): State<AppState>,
	Json(payload): Json<TagCreateRequest>,
) -> Result<Json<TagItem>, ApiError> {
	Ok(Json(state.service.create_category(&payload.label).await?))
}

/// The bearer credential from the `Authorization` header, if any. A missing
/// header resolves to an anonymous viewer downstream.
fn bearer(headers: &HeaderMap) -> Option<String> {
	headers
		.get(header::AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::to_string)
}

struct CollectedParts {
	request: Option<Vec<u8>>,
	files: Vec<(String, String, Vec<u8>)>,
}
impl CollectedParts {
	fn request<T>(&mut self) -> Result<T, ApiError>
	where
		T: serde::de::DeserializeOwned,
	{
		let raw = self.request.take().ok_or_else(|| {
			json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				"Missing the `request` part.",
			)
		})?;

		serde_json::from_slice(&raw).map_err(|error| {
			json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				format!("Malformed `request` part: {error}"),
			)
		})
	}
}

async fn collect_parts(
	mut multipart: Multipart,
	file_fields: &[&str],
) -> Result<CollectedParts, ApiError> {
	let mut parts = CollectedParts { request: None, files: Vec::new() };

	while let Some(field) = multipart.next_field().await.map_err(|error| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", error.to_string())
	})? {
		let name = field.name().unwrap_or_default().to_string();
		let file_name = field.file_name().unwrap_or("file").to_string();
		let bytes = field.bytes().await.map_err(|error| {
			json_error(StatusCode::BAD_REQUEST, "invalid_request", error.to_string())
		})?;

		if name == "request" {
			parts.request = Some(bytes.to_vec());
		} else if file_fields.contains(&name.as_str()) {
			parts.files.push((name, file_name, bytes.to_vec()));
		}
	}

	Ok(parts)
}

struct Uploads {
	by_field: Vec<(String, String)>,
}
impl Uploads {
	fn urls_for(&self, field: &str) -> Vec<String> {
		self.by_field
			.iter()
			.filter(|(name, _)| name == field)
			.map(|(_, url)| url.clone())
			.collect()
	}

	async fn discard(&self, service: &BellaService) {
		for (_, url) in &self.by_field {
			if let Err(error) =
				service.providers.media.delete(&service.cfg.providers.media, url).await
			{
				tracing::warn!(%url, ?error, "Failed to discard an uploaded object.");
			}
		}
	}
}

/// Uploads every collected file before the entity write happens. A failed
/// upload discards the ones already stored and aborts the operation.
async fn upload_files(
	service: &BellaService,
	prefix: &str,
	files: Vec<(String, String, Vec<u8>)>,
) -> Result<Uploads, ApiError> {
	let mut uploads = Uploads { by_field: Vec::with_capacity(files.len()) };

	for (field, file_name, bytes) in files {
		match service
			.providers
			.media
			.upload(&service.cfg.providers.media, prefix, &file_name, bytes)
			.await
		{
			Ok(url) => uploads.by_field.push((field, url)),
			Err(error) => {
				uploads.discard(service).await;

				return Err(json_error(
					StatusCode::BAD_GATEWAY,
					"provider_error",
					error.to_string(),
				));
			},
		}
	}

	Ok(uploads)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into() }
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();
		let (status, code) = match err {
			ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
			ServiceError::InvalidCredential =>
				(StatusCode::UNAUTHORIZED, "invalid_credential"),
			ServiceError::NoResults => (StatusCode::NOT_FOUND, "no_results"),
			ServiceError::Precondition { .. } =>
				(StatusCode::UNPROCESSABLE_ENTITY, "precondition_violation"),
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
		};

		json_error(status, code, message)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
