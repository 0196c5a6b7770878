use dossier_domain::validate::Rejection;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unauthorized.")]
	Unauthorized,
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error(transparent)]
	Storage(#[from] sqlx::Error),
}
impl Error {
	pub(crate) fn not_found(message: &str) -> Self {
		Self::NotFound { message: message.to_string() }
	}
}

impl From<Rejection> for Error {
	fn from(rejection: Rejection) -> Self {
		Self::InvalidRequest { message: rejection.message() }
	}
}
