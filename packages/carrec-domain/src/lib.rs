pub mod budget;
pub mod corpus;
pub mod query;
pub mod ranking;
pub mod request;
pub mod vehicle;

mod format;

pub use budget::BudgetRange;
pub use corpus::{CorpusEntry, build_corpus, encode};
pub use query::{FALLBACK_QUERY, synthesize};
pub use ranking::{CandidateFields, rank};
pub use request::{Activity, Preferences, RecommendationRequest};
pub use vehicle::VehicleRecord;
