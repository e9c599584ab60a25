use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("No index has been built at {}.", path.display())]
	IndexMissing { path: PathBuf },
	#[error("Index at {} is corrupt: {message}", path.display())]
	IndexCorrupt { path: PathBuf, message: String },
	#[error("{message}")]
	Index { message: String },
	#[error("Vector dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: u32, actual: usize },
}
