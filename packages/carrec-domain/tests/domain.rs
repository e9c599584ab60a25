use serde_json::{Value, json};

use carrec_domain::{
	Activity, BudgetRange, CandidateFields, FALLBACK_QUERY, Preferences, VehicleRecord,
	build_corpus, encode, rank, synthesize,
};
use carrec_testkit::fixtures;

fn searched(query: &str) -> Activity {
	Activity { action: "searched".to_string(), query: Some(query.to_string()), ..Default::default() }
}

fn viewed(titles: &[&str]) -> Activity {
	Activity {
		action: "viewed".to_string(),
		car_titles: titles.iter().map(|title| title.to_string()).collect(),
		query: None,
	}
}

fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn encode_never_fails_and_marks_missing_fuel_economy() {
	for mut record in fixtures::catalog() {
		record.fuel_consumption_combined = None;
		record.price = i64::MIN;
		record.features.clear();

		let entry = encode(record.clone());

		assert!(entry.text.contains("Combined Fuel Economy: N/A"));
		assert!(entry.text.contains(&format!("Description: {}", record.description)));
		assert_eq!(entry.metadata, record);
	}
}

#[test]
fn build_corpus_preserves_order_and_count() {
	let catalog = fixtures::catalog();
	let ids = catalog.iter().map(|record| record.id.clone()).collect::<Vec<_>>();
	let corpus = build_corpus(catalog);

	assert_eq!(corpus.len(), ids.len());
	assert_eq!(corpus.iter().map(|entry| entry.metadata.id.clone()).collect::<Vec<_>>(), ids);
}

#[test]
fn metadata_serializes_with_catalog_keys() {
	let record = fixtures::catalog().remove(0);
	let metadata = serde_json::to_value(&record).expect("Failed to serialize record.");

	assert_eq!(metadata["bodyType"], "SUV");
	assert_eq!(metadata["fuelType"], "Hybrid");
	assert_eq!(metadata["price"], 22_000);
	assert_eq!(metadata["features"], json!(["Sunroof", "Apple CarPlay"]));

	let back: VehicleRecord = serde_json::from_value(metadata).expect("Failed to parse record.");

	assert_eq!(back, record);
	assert_eq!(record.title(), "2021 Toyota RAV4");
}

#[test]
fn empty_input_yields_fallback_query() {
	assert_eq!(synthesize(None, None, None), FALLBACK_QUERY);
	assert_eq!(synthesize(None, None, None), "show me all available vehicles");

	let no_activities: &[Activity] = &[];
	let no_saved: &[String] = &[];

	assert_eq!(
		synthesize(Some(&Preferences::default()), Some(no_activities), Some(no_saved)),
		FALLBACK_QUERY
	);
}

#[test]
fn preference_clauses_follow_fixed_order() {
	let preferences = Preferences {
		budget_min: 10_000,
		budget_max: 20_000,
		car_types: strings(&["SUV", "Sedan"]),
		fuel_types: strings(&["Hybrid", "Electric"]),
		brand: strings(&["Toyota", "Mazda"]),
		features: strings(&["Sunroof", "Heated Seats"]),
		primarily_use: strings(&["commuting", "family trips"]),
		top_priorities: strings(&["safety", "reliability"]),
	};
	let query = synthesize(Some(&preferences), None, None);

	assert_eq!(
		query,
		"I'm looking for a vehicle matching these requirements: \
My top priorities are safety, reliability. \
My budget is between $8,000 and $25,000. \
I'm interested in SUV or Sedan vehicles. \
I prefer brands like Toyota, Mazda. \
It should have features like Sunroof, Heated Seats. \
I prefer Hybrid or Electric fuel. \
I will primarily use it for commuting and family trips."
	);
}

#[test]
fn budget_clause_keeps_zero_lower_bound() {
	let preferences = Preferences { budget_min: 0, budget_max: 20_000, ..Default::default() };
	let query = synthesize(Some(&preferences), None, None);

	assert!(query.ends_with("My budget is between $0 and $25,000."));
}

#[test]
fn activity_clauses_are_sorted_and_deduplicated() {
	let activities = vec![
		searched("hybrid suv"),
		viewed(&["2021 Toyota RAV4", "2019 Honda Civic"]),
		searched("cheap ute"),
		viewed(&["2019 Honda Civic"]),
		searched("hybrid suv"),
		Activity { action: "searched".to_string(), query: None, ..Default::default() },
	];
	let query = synthesize(None, Some(activities.as_slice()), None);

	assert_eq!(
		query,
		"I'm looking for a vehicle matching these requirements: \
I have shown interest in: 2019 Honda Civic, 2021 Toyota RAV4. \
I previously searched for: cheap ute, hybrid suv."
	);
}

#[test]
fn saved_vehicles_add_generic_clause_without_titles() {
	let saved = strings(&["2022 Ford Ranger"]);
	let query = synthesize(None, None, Some(saved.as_slice()));

	assert!(query.ends_with("I'd like vehicles similar to the ones I've saved."));
	assert!(!query.contains("Ranger"));
}

#[test]
fn synthesize_is_idempotent() {
	let preferences = Preferences {
		budget_max: 30_000,
		brand: strings(&["Ford", "Toyota"]),
		..Default::default()
	};
	let activities = vec![searched("b"), searched("a"), viewed(&["z", "y"])];
	let saved = strings(&["x"]);
	let first =
		synthesize(Some(&preferences), Some(activities.as_slice()), Some(saved.as_slice()));
	let second =
		synthesize(Some(&preferences), Some(activities.as_slice()), Some(saved.as_slice()));

	assert_eq!(first, second);
}

#[test]
fn widened_ranges_match_examples() {
	assert_eq!(BudgetRange::widen(0, 20_000), Some(BudgetRange { min: 0, max: 25_000 }));
	assert_eq!(
		BudgetRange::widen(10_000, 20_000),
		Some(BudgetRange { min: 8_000, max: 25_000 })
	);
}

#[test]
fn minimum_alone_does_not_cap_prices() {
	let preferences = Preferences { budget_min: 15_000, budget_max: 0, ..Default::default() };
	let candidates =
		vec![json!({ "id": "pricey", "price": 40_000 }), json!({ "id": "cheap", "price": 3_000 })];

	assert_eq!(preferences.budget(), None);
	assert!(!synthesize(Some(&preferences), None, None).contains("My budget"));
	assert_eq!(rank(candidates.clone(), Some(&preferences), 2), candidates);
}

#[test]
fn brand_and_body_type_bonuses_decide_order() {
	let candidates = vec![
		json!({ "make": "Toyota", "bodyType": "SUV", "price": "22000" }),
		json!({ "make": "Ford", "bodyType": "Sedan", "price": "21000" }),
	];
	let preferences = Preferences {
		brand: strings(&["Toyota"]),
		car_types: strings(&["SUV"]),
		budget_min: 15_000,
		budget_max: 25_000,
		..Default::default()
	};
	let ranked = rank(candidates.clone(), Some(&preferences), 1);

	assert_eq!(ranked, vec![candidates[0].clone()]);
	assert!((carrec_domain::ranking::score(&candidates[0], &preferences) - 1.6).abs() < 1e-9);
	assert!((carrec_domain::ranking::score(&candidates[1], &preferences) - 1.0).abs() < 1e-9);
}

#[test]
fn unparseable_price_is_always_excluded() {
	let candidates = vec![
		json!({
			"make": "Toyota",
			"bodyType": "SUV",
			"fuelType": "Hybrid",
			"features": ["Sunroof"],
			"price": "not-a-number",
		}),
		json!({ "make": "Ford", "bodyType": "Sedan", "price": 21_000 }),
		json!({ "make": "Toyota", "bodyType": "SUV" }),
	];
	let preferences = Preferences {
		brand: strings(&["Toyota"]),
		car_types: strings(&["SUV"]),
		fuel_types: strings(&["Hybrid"]),
		features: strings(&["Sunroof"]),
		budget_max: 25_000,
		..Default::default()
	};
	let ranked = rank(candidates, Some(&preferences), 6);

	assert_eq!(ranked.len(), 1);
	assert_eq!(ranked[0]["make"], "Ford");
}

#[test]
fn ranked_results_respect_limit_budget_and_membership() {
	let catalog = fixtures::catalog();
	let preferences = Preferences {
		budget_min: 18_000,
		budget_max: 25_000,
		car_types: strings(&["SUV"]),
		..Default::default()
	};
	let budget = preferences.budget().expect("Budget must be present.");

	for limit in 0..=catalog.len() + 1 {
		let ranked = rank(catalog.clone(), Some(&preferences), limit);

		assert!(ranked.len() <= limit);

		for record in &ranked {
			assert!(budget.contains(record.price as f64));
			assert!(catalog.contains(record));
		}
	}

	let ranked = rank(catalog.clone(), Some(&preferences), 6);
	let ids = ranked.iter().map(|record| record.id.as_str()).collect::<Vec<_>>();

	// 16k..30k: the two SUVs score 1.3, the remaining in-range vehicles keep similarity order.
	assert_eq!(ids, vec!["veh_rav4", "veh_cx5", "veh_focus", "veh_civic"]);
}

#[test]
fn ties_keep_similarity_order() {
	let candidates = vec![
		json!({ "id": "a", "price": 10_000 }),
		json!({ "id": "b", "price": 11_000 }),
		json!({ "id": "c", "price": 12_000 }),
	];
	let preferences = Preferences { budget_max: 20_000, ..Default::default() };
	let ranked = rank(candidates.clone(), Some(&preferences), 3);

	assert_eq!(ranked, candidates);
}

#[test]
fn without_budget_returns_similarity_prefix() {
	let candidates = vec![
		json!({ "id": "a", "price": "not-a-number" }),
		json!({ "id": "b", "price": 90_000 }),
		json!({ "id": "c" }),
	];
	let preferences = Preferences { brand: strings(&["Ford"]), ..Default::default() };

	assert_eq!(rank(candidates.clone(), None, 2), candidates[..2].to_vec());
	assert_eq!(rank(candidates.clone(), Some(&preferences), 2), candidates[..2].to_vec());
}

#[test]
fn typed_records_and_metadata_score_identically() {
	let preferences = Preferences {
		budget_max: 60_000,
		brand: strings(&["Tesla"]),
		features: strings(&["Heated Seats"]),
		primarily_use: strings(&["Highway"]),
		..Default::default()
	};

	for record in fixtures::catalog() {
		let metadata: Value = serde_json::to_value(&record).expect("Failed to serialize record.");

		assert_eq!(record.price(), metadata.price());
		assert!(
			(carrec_domain::ranking::score(&record, &preferences)
				- carrec_domain::ranking::score(&metadata, &preferences))
			.abs() < 1e-9
		);
	}
}
