#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Unknown schema include {0:?}.")]
	UnknownInclude(String),
}
