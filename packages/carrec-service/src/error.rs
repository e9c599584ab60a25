pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Vehicle source unavailable: {message}")]
	DataSourceUnavailable { message: String },
	#[error("Index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
}
impl Error {
	pub(crate) fn index_unavailable(err: impl ToString) -> Self {
		Self::IndexUnavailable { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
