use crate::{format, vehicle::VehicleRecord};

/// Rendered in place of a missing or zero fuel economy figure.
pub const MISSING_VALUE: &str = "N/A";

/// Text handed to the embedding model, paired with the record it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
	pub text: String,
	pub metadata: VehicleRecord,
}

pub fn encode(record: VehicleRecord) -> CorpusEntry {
	CorpusEntry { text: describe(&record), metadata: record }
}

/// Encodes every record, preserving order and count.
pub fn build_corpus(records: Vec<VehicleRecord>) -> Vec<CorpusEntry> {
	records.into_iter().map(encode).collect()
}

pub fn describe(record: &VehicleRecord) -> String {
	let fuel_economy = match record.fuel_consumption_combined {
		Some(value) if value.is_finite() && value != 0.0 => format!("{value}L/100km"),
		_ => MISSING_VALUE.to_string(),
	};
	let lines = [
		format!("{} ({})", record.title(), record.color),
		format!("Body Type: {}", record.body_type),
		format!("Price: {}", format::currency(record.price)),
		format!("Condition: {}", record.condition),
		format!("Odometer: {} km", format::group_thousands(record.odometer)),
		format!("Fuel Type: {}", record.fuel_type),
		format!("Transmission: {}", record.transmission),
		format!("Drive Type: {}", record.drive_type),
		format!("Combined Fuel Economy: {fuel_economy}"),
		format!("Doors: {}", record.doors),
		format!("Seats: {}", record.seats),
		format!("Features: {}", record.features.join(", ")),
		format!("Description: {}", record.description),
	];

	lines.join("\n")
}
