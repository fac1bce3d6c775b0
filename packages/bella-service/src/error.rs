pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
	Member,
	Hospital,
	Doctor,
	Review,
	Infra,
	Category,
	Comment,
}

impl std::fmt::Display for Entity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Member => "member",
			Self::Hospital => "hospital",
			Self::Doctor => "doctor",
			Self::Review => "review",
			Self::Infra => "infra tag",
			Self::Category => "category tag",
			Self::Comment => "comment",
		};

		write!(f, "{name}")
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("The {entity} {id} was not found.")]
	NotFound { entity: Entity, id: String },
	#[error("Session credential is invalid or expired.")]
	InvalidCredential,
	#[error("Search matched no hospitals.")]
	NoResults,
	#[error("Precondition violated: {message}")]
	Precondition { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}

impl Error {
	pub fn not_found(entity: Entity, id: impl std::fmt::Display) -> Self {
		Self::NotFound { entity, id: id.to_string() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<bella_domain::credential::CredentialError> for Error {
	fn from(_: bella_domain::credential::CredentialError) -> Self {
		Self::InvalidCredential
	}
}
