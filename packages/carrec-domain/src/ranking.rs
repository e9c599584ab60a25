use std::cmp::Ordering;

use serde_json::Value;

use crate::{request::Preferences, vehicle::VehicleRecord};

pub const BASE_SCORE: f64 = 1.0;
pub const BODY_TYPE_BONUS: f64 = 0.3;
pub const BRAND_BONUS: f64 = 0.3;
pub const FEATURE_BONUS: f64 = 0.1;
pub const FUEL_TYPE_BONUS: f64 = 0.2;
pub const USE_CASE_BONUS: f64 = 0.15;

/// Read access to the attributes the ranker scores on.
///
/// Implemented for typed records and for raw index metadata. Metadata is read leniently: a price
/// may be a JSON number or a numeric string, and anything else counts as unparseable.
pub trait CandidateFields {
	fn price(&self) -> Option<f64>;
	fn body_type(&self) -> Option<&str>;
	fn make(&self) -> Option<&str>;
	fn fuel_type(&self) -> Option<&str>;
	fn has_feature(&self, feature: &str) -> bool;
	fn description(&self) -> Option<&str>;
}

struct ScoredCandidate<T> {
	candidate: T,
	score: f64,
}

/// Filters candidates to the widened budget and orders them by preference score.
///
/// Without a stated budget the first `limit` candidates are returned in similarity order. Ties keep
/// their incoming order. Candidates whose price cannot be read are dropped, never reported.
pub fn rank<T>(candidates: Vec<T>, preferences: Option<&Preferences>, limit: usize) -> Vec<T>
where
	T: CandidateFields,
{
	let Some((preferences, budget)) =
		preferences.and_then(|preferences| preferences.budget().map(|budget| (preferences, budget)))
	else {
		return candidates.into_iter().take(limit).collect();
	};
	let mut scored = Vec::with_capacity(candidates.len());

	for (position, candidate) in candidates.into_iter().enumerate() {
		let Some(price) = candidate.price() else {
			tracing::debug!(position, "Dropping candidate with an unreadable price.");

			continue;
		};

		if !budget.contains(price) {
			continue;
		}

		let score = score(&candidate, preferences);

		scored.push(ScoredCandidate { candidate, score });
	}

	scored.sort_by(|a, b| cmp_f64_desc(a.score, b.score));

	scored.into_iter().take(limit).map(|scored| scored.candidate).collect()
}

pub fn score<T>(candidate: &T, preferences: &Preferences) -> f64
where
	T: CandidateFields,
{
	let mut score = BASE_SCORE;

	if candidate.body_type().is_some_and(|body| contains(&preferences.car_types, body)) {
		score += BODY_TYPE_BONUS;
	}
	if candidate.make().is_some_and(|make| contains(&preferences.brand, make)) {
		score += BRAND_BONUS;
	}

	let matched_features =
		preferences.features.iter().filter(|feature| candidate.has_feature(feature)).count();

	score += FEATURE_BONUS * matched_features as f64;

	if candidate.fuel_type().is_some_and(|fuel| contains(&preferences.fuel_types, fuel)) {
		score += FUEL_TYPE_BONUS;
	}

	if let Some(description) = candidate.description() {
		let description = description.to_lowercase();
		let matched_uses = preferences
			.primarily_use
			.iter()
			.map(|term| term.trim().to_lowercase())
			.filter(|term| !term.is_empty() && description.contains(term.as_str()))
			.count();

		score += USE_CASE_BONUS * matched_uses as f64;
	}

	score
}

fn contains(values: &[String], needle: &str) -> bool {
	values.iter().any(|value| value == needle)
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl CandidateFields for VehicleRecord {
	fn price(&self) -> Option<f64> {
		Some(self.price as f64)
	}

	fn body_type(&self) -> Option<&str> {
		Some(&self.body_type)
	}

	fn make(&self) -> Option<&str> {
		Some(&self.make)
	}

	fn fuel_type(&self) -> Option<&str> {
		Some(&self.fuel_type)
	}

	fn has_feature(&self, feature: &str) -> bool {
		self.features.iter().any(|value| value == feature)
	}

	fn description(&self) -> Option<&str> {
		Some(&self.description)
	}
}

impl CandidateFields for Value {
	fn price(&self) -> Option<f64> {
		let price = match self.get("price")? {
			Value::Number(number) => number.as_f64()?,
			Value::String(raw) => raw.trim().parse::<f64>().ok()?,
			_ => return None,
		};

		price.is_finite().then_some(price)
	}

	fn body_type(&self) -> Option<&str> {
		self.get("bodyType").and_then(Value::as_str)
	}

	fn make(&self) -> Option<&str> {
		self.get("make").and_then(Value::as_str)
	}

	fn fuel_type(&self) -> Option<&str> {
		self.get("fuelType").and_then(Value::as_str)
	}

	fn has_feature(&self, feature: &str) -> bool {
		self.get("features")
			.and_then(Value::as_array)
			.map(|features| features.iter().any(|value| value.as_str() == Some(feature)))
			.unwrap_or(false)
	}

	fn description(&self) -> Option<&str> {
		self.get("description").and_then(Value::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_numeric_and_string_prices() {
		assert_eq!(serde_json::json!({ "price": 21_000 }).price(), Some(21_000.0));
		assert_eq!(serde_json::json!({ "price": " 22000 " }).price(), Some(22_000.0));
		assert_eq!(serde_json::json!({ "price": "not-a-number" }).price(), None);
		assert_eq!(serde_json::json!({ "price": "inf" }).price(), None);
		assert_eq!(serde_json::json!({ "price": null }).price(), None);
		assert_eq!(serde_json::json!({ "make": "Ford" }).price(), None);
	}

	#[test]
	fn use_case_terms_match_case_insensitively() {
		let preferences = Preferences {
			primarily_use: vec!["Commuting".to_string(), "off-road".to_string(), " ".to_string()],
			..Default::default()
		};
		let candidate = serde_json::json!({
			"description": "Great for daily COMMUTING and weekend Off-Road trips.",
		});

		assert!((score(&candidate, &preferences) - 1.3).abs() < 1e-9);
	}

	#[test]
	fn counts_each_matching_feature() {
		let preferences = Preferences {
			features: vec!["Sunroof".to_string(), "Heated Seats".to_string(), "Tow Bar".to_string()],
			..Default::default()
		};
		let candidate = serde_json::json!({ "features": ["Heated Seats", "Sunroof"] });

		assert!((score(&candidate, &preferences) - 1.2).abs() < 1e-9);
	}
}
