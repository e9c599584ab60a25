use std::collections::{BTreeSet, HashSet};

use crate::{
	format,
	request::{Activity, Preferences},
};

pub const LEAD_IN: &str = "I'm looking for a vehicle matching these requirements:";
pub const FALLBACK_QUERY: &str = "show me all available vehicles";
pub const SAVED_VEHICLES_CLAUSE: &str = "I'd like vehicles similar to the ones I've saved.";

/// Builds the natural-language search string for a recommendation request.
///
/// The output depends only on the input: clause order is fixed and every set-like collection is
/// de-duplicated and sorted (activities) or de-duplicated in first-seen order (preferences) before
/// it is joined.
pub fn synthesize(
	preferences: Option<&Preferences>,
	activities: Option<&[Activity]>,
	saved_vehicles: Option<&[String]>,
) -> String {
	let mut clauses = Vec::new();

	if let Some(preferences) = preferences {
		preference_clauses(preferences, &mut clauses);
	}
	if let Some(activities) = activities {
		activity_clauses(activities, &mut clauses);
	}
	if saved_vehicles.map(|saved| saved.iter().any(|title| !title.trim().is_empty())).unwrap_or(false)
	{
		clauses.push(SAVED_VEHICLES_CLAUSE.to_string());
	}

	if clauses.is_empty() {
		return FALLBACK_QUERY.to_string();
	}

	let mut out = String::from(LEAD_IN);

	for clause in clauses {
		out.push(' ');
		out.push_str(&clause);
	}

	out
}

fn preference_clauses(preferences: &Preferences, clauses: &mut Vec<String>) {
	if let Some(priorities) = join_terms(&preferences.top_priorities, ", ") {
		clauses.push(format!("My top priorities are {priorities}."));
	}
	if let Some(budget) = preferences.budget() {
		clauses.push(format!(
			"My budget is between {} and {}.",
			format::currency(budget.min),
			format::currency(budget.max)
		));
	}
	if let Some(types) = join_terms(&preferences.car_types, " or ") {
		clauses.push(format!("I'm interested in {types} vehicles."));
	}
	if let Some(brands) = join_terms(&preferences.brand, ", ") {
		clauses.push(format!("I prefer brands like {brands}."));
	}
	if let Some(features) = join_terms(&preferences.features, ", ") {
		clauses.push(format!("It should have features like {features}."));
	}
	if let Some(fuels) = join_terms(&preferences.fuel_types, " or ") {
		clauses.push(format!("I prefer {fuels} fuel."));
	}
	if let Some(uses) = join_terms(&preferences.primarily_use, " and ") {
		clauses.push(format!("I will primarily use it for {uses}."));
	}
}

fn activity_clauses(activities: &[Activity], clauses: &mut Vec<String>) {
	let mut titles = BTreeSet::new();
	let mut search_terms = BTreeSet::new();

	for activity in activities {
		if let Some(term) = activity.search_term() {
			search_terms.insert(term);
		} else {
			titles.extend(
				activity.car_titles.iter().map(|title| title.trim()).filter(|t| !t.is_empty()),
			);
		}
	}

	if !titles.is_empty() {
		let titles = titles.into_iter().collect::<Vec<_>>().join(", ");

		clauses.push(format!("I have shown interest in: {titles}."));
	}
	if !search_terms.is_empty() {
		let terms = search_terms.into_iter().collect::<Vec<_>>().join(", ");

		clauses.push(format!("I previously searched for: {terms}."));
	}
}

fn join_terms(values: &[String], connector: &str) -> Option<String> {
	let mut seen = HashSet::new();
	let terms = values
		.iter()
		.map(|value| value.trim())
		.filter(|value| !value.is_empty() && seen.insert(*value))
		.collect::<Vec<_>>();

	if terms.is_empty() { None } else { Some(terms.join(connector)) }
}
