use carrec_domain::VehicleRecord;

pub struct VehicleSpec<'a> {
	pub id: &'a str,
	pub year: i32,
	pub make: &'a str,
	pub model: &'a str,
	pub body_type: &'a str,
	pub price: i64,
	pub fuel_type: &'a str,
	pub features: &'a [&'a str],
	pub description: &'a str,
}

pub fn vehicle(spec: VehicleSpec<'_>) -> VehicleRecord {
	VehicleRecord {
		id: spec.id.to_string(),
		year: spec.year,
		make: spec.make.to_string(),
		model: spec.model.to_string(),
		color: "White".to_string(),
		body_type: spec.body_type.to_string(),
		price: spec.price,
		condition: "Used".to_string(),
		odometer: 60_000,
		fuel_type: spec.fuel_type.to_string(),
		transmission: "Automatic".to_string(),
		drive_type: "FWD".to_string(),
		fuel_consumption_combined: Some(6.5),
		doors: 4,
		seats: 5,
		features: spec.features.iter().map(|feature| feature.to_string()).collect(),
		description: spec.description.to_string(),
	}
}

/// A small catalog with a spread of makes, body types, fuel types, and prices.
pub fn catalog() -> Vec<VehicleRecord> {
	vec![
		vehicle(VehicleSpec {
			id: "veh_rav4",
			year: 2021,
			make: "Toyota",
			model: "RAV4",
			body_type: "SUV",
			price: 22_000,
			fuel_type: "Hybrid",
			features: &["Sunroof", "Apple CarPlay"],
			description: "Roomy hybrid SUV, ideal for family trips and commuting.",
		}),
		vehicle(VehicleSpec {
			id: "veh_focus",
			year: 2018,
			make: "Ford",
			model: "Focus",
			body_type: "Sedan",
			price: 21_000,
			fuel_type: "Petrol",
			features: &["Bluetooth"],
			description: "Economical sedan for city commuting.",
		}),
		vehicle(VehicleSpec {
			id: "veh_ranger",
			year: 2022,
			make: "Ford",
			model: "Ranger",
			body_type: "Ute",
			price: 48_000,
			fuel_type: "Diesel",
			features: &["Tow Bar", "Bluetooth"],
			description: "Dual cab ute built for towing and off-road work.",
		}),
		vehicle(VehicleSpec {
			id: "veh_civic",
			year: 2019,
			make: "Honda",
			model: "Civic",
			body_type: "Hatchback",
			price: 17_500,
			fuel_type: "Petrol",
			features: &["Apple CarPlay", "Reversing Camera"],
			description: "Sporty hatchback with low running costs.",
		}),
		vehicle(VehicleSpec {
			id: "veh_model3",
			year: 2023,
			make: "Tesla",
			model: "Model 3",
			body_type: "Sedan",
			price: 55_000,
			fuel_type: "Electric",
			features: &["Autopilot", "Heated Seats"],
			description: "Long range electric sedan for highway commuting.",
		}),
		vehicle(VehicleSpec {
			id: "veh_cx5",
			year: 2020,
			make: "Mazda",
			model: "CX-5",
			body_type: "SUV",
			price: 27_900,
			fuel_type: "Petrol",
			features: &["Heated Seats", "Sunroof", "Apple CarPlay"],
			description: "Comfortable SUV for family trips.",
		}),
	]
}
