use sqlx::FromRow;

use crate::{Result, db::Db};
use carrec_domain::VehicleRecord;

#[derive(Debug, FromRow)]
pub struct VehicleRow {
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
	pub fuel_consumption_combined: Option<f64>,
	pub doors: i32,
	pub seats: i32,
	pub features: Vec<String>,
	pub description: String,
}
impl From<VehicleRow> for VehicleRecord {
	fn from(row: VehicleRow) -> Self {
		Self {
			id: row.id,
			year: row.year,
			make: row.make,
			model: row.model,
			color: row.color,
			body_type: row.body_type,
			price: row.price,
			condition: row.condition,
			odometer: row.odometer,
			fuel_type: row.fuel_type,
			transmission: row.transmission,
			drive_type: row.drive_type,
			fuel_consumption_combined: row.fuel_consumption_combined,
			doors: row.doors,
			seats: row.seats,
			features: row.features,
			description: row.description,
		}
	}
}

/// Reads the whole catalog, ordered by id.
pub async fn fetch_all_vehicles(db: &Db) -> Result<Vec<VehicleRecord>> {
	let rows: Vec<VehicleRow> = sqlx::query_as(
		r#"
SELECT
	"id"::text AS id,
	"year"::int4 AS year,
	COALESCE("make", '') AS make,
	COALESCE("model", '') AS model,
	COALESCE("color", '') AS color,
	COALESCE("bodyType", '') AS body_type,
	"price"::int8 AS price,
	COALESCE("condition", '') AS condition,
	"odometer"::int8 AS odometer,
	COALESCE("fuelType", '') AS fuel_type,
	COALESCE("transmission", '') AS transmission,
	COALESCE("driveType", '') AS drive_type,
	"fuelConsumptionCombined"::float8 AS fuel_consumption_combined,
	"doors"::int4 AS doors,
	"seats"::int4 AS seats,
	COALESCE("features", ARRAY[]::text[]) AS features,
	COALESCE("description", '') AS description
FROM "Vehicle"
ORDER BY "id""#,
	)
	.fetch_all(&db.pool)
	.await?;

	tracing::debug!(count = rows.len(), "Fetched vehicle catalog.");

	Ok(rows.into_iter().map(VehicleRecord::from).collect())
}
