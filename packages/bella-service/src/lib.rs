pub mod comments;
pub mod doctors;
pub mod favorites;
pub mod hospitals;
pub mod reviews;
pub mod search;
pub mod session;
pub mod tags;
pub mod viewer;

mod error;

pub use error::{Entity, Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

pub use comments::{
	AddCommentRequest, CommentItem, EditCommentRequest, LikeCommentResponse, ListCommentsResponse,
};
pub use doctors::{AddDoctorRequest, AddDoctorResponse};
pub use favorites::ToggleFavoriteResponse;
pub use hospitals::{
	AddHospitalRequest, AddHospitalResponse, DoctorSummary, HospitalDetailResponse,
	HospitalSummary, ListHospitalsRequest, ListHospitalsResponse, ReviewSummary, TagItem,
};
pub use reviews::{
	AddReviewRequest, AddReviewResponse, ListReviewsResponse, ReviewDetailResponse, ReviewItem,
};
pub use search::{SearchHospitalsRequest, SearchHospitalsResponse};
pub use session::{AdminCreateRequest, AdminResponse, SessionResponse, SessionTokens};

use bella_config::{Config, IdentityProviderConfig, MediaProviderConfig};
use bella_providers::{IdentityAssertion, google, media};
use bella_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait IdentityVerifier
where
	Self: Send + Sync,
{
	fn verify<'a>(
		&'a self,
		cfg: &'a IdentityProviderConfig,
		id_token: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<IdentityAssertion>>;
}

pub trait MediaStore
where
	Self: Send + Sync,
{
	fn upload<'a>(
		&'a self,
		cfg: &'a MediaProviderConfig,
		prefix: &'a str,
		file_name: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<String>>;

	fn delete<'a>(
		&'a self,
		cfg: &'a MediaProviderConfig,
		public_url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub identity: Arc<dyn IdentityVerifier>,
	pub media: Arc<dyn MediaStore>,
}

pub struct BellaService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}

struct DefaultProviders;

impl IdentityVerifier for DefaultProviders {
	fn verify<'a>(
		&'a self,
		cfg: &'a IdentityProviderConfig,
		id_token: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<IdentityAssertion>> {
		Box::pin(google::verify(cfg, id_token))
	}
}

impl MediaStore for DefaultProviders {
	fn upload<'a>(
		&'a self,
		cfg: &'a MediaProviderConfig,
		prefix: &'a str,
		file_name: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(media::upload(cfg, prefix, file_name, bytes))
	}

	fn delete<'a>(
		&'a self,
		cfg: &'a MediaProviderConfig,
		public_url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(media::delete(cfg, public_url))
	}
}

impl Providers {
	pub fn new(identity: Arc<dyn IdentityVerifier>, media: Arc<dyn MediaStore>) -> Self {
		Self { identity, media }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { identity: provider.clone(), media: provider }
	}
}

impl BellaService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
