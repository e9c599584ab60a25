use serde::{Deserialize, Serialize};

/// Catalog snapshot of one vehicle. Prices are whole currency units.
///
/// The camelCase serialization is also the metadata stored next to each vector, so consumers of
/// search results read the same keys the catalog uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
	pub id: String,
	pub year: i32,
	pub make: String,
	pub model: String,
	pub color: String,
	pub body_type: String,
	pub price: i64,
	pub condition: String,
	pub odometer: i64,
	pub fuel_type: String,
	pub transmission: String,
	pub drive_type: String,
	#[serde(default)]
	pub fuel_consumption_combined: Option<f64>,
	pub doors: i32,
	pub seats: i32,
	#[serde(default)]
	pub features: Vec<String>,
	#[serde(default)]
	pub description: String,
}
impl VehicleRecord {
	/// Display title, e.g. "2021 Toyota RAV4".
	pub fn title(&self) -> String {
		format!("{} {} {}", self.year, self.make, self.model)
	}
}
