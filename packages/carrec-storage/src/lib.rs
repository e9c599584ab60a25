pub mod db;
pub mod index;
pub mod vehicles;

mod error;
mod time_serde;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
