use serde::{Deserialize, Deserializer, Serialize};

use crate::budget::BudgetRange;

/// Action kind whose `query` is treated as a search term.
pub const SEARCHED_ACTION: &str = "searched";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
	#[serde(default, deserialize_with = "null_as_default")]
	pub budget_min: i64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub budget_max: i64,
	#[serde(default, deserialize_with = "null_as_default")]
	pub car_types: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub fuel_types: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub brand: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub features: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub primarily_use: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub top_priorities: Vec<String>,
}
impl Preferences {
	pub fn budget(&self) -> Option<BudgetRange> {
		BudgetRange::widen(self.budget_min, self.budget_max)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
	pub action: String,
	#[serde(default, alias = "carIds", deserialize_with = "null_as_default")]
	pub car_titles: Vec<String>,
	#[serde(default)]
	pub query: Option<String>,
}
impl Activity {
	/// The trimmed search text when this is a `searched` action carrying a query.
	pub fn search_term(&self) -> Option<&str> {
		if self.action != SEARCHED_ACTION {
			return None;
		}

		self.query.as_deref().map(str::trim).filter(|query| !query.is_empty())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
	#[serde(default)]
	pub preferences: Option<Preferences>,
	#[serde(default)]
	pub activities: Option<Vec<Activity>>,
	#[serde(default)]
	pub saved_vehicles: Option<Vec<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
