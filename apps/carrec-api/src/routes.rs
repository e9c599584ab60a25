use axum::{
	Json, Router,
	body::Body,
	extract::{State, rejection::JsonRejection},
	http::{HeaderMap, Request, StatusCode},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::state::AppState;
use carrec_domain::RecommendationRequest;
use carrec_service::{BuildReport, Error as ServiceError};

pub const HEADER_API_KEY: &str = "X-API-Key";

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

pub fn router(state: AppState) -> Router {
	let protected = Router::new()
		.route("/get-recommendations", post(get_recommendations))
		.route("/convert-to-vector", post(convert_to_vector))
		.route_layer(middleware::from_fn_with_state(state.clone(), api_key_middleware));
	let cors_allow_any = state.service.cfg.service.cors_allow_any;
	let app = Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.merge(protected)
		.with_state(state);

	if cors_allow_any { app.layer(CorsLayer::permissive()) } else { app }
}

#[derive(Debug, Serialize)]
struct RecommendationsBody {
	status: &'static str,
	message: &'static str,
	trace_id: Uuid,
	query: String,
	recommendations: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct ConvertBody {
	status: &'static str,
	message: &'static str,
	details: BuildReport,
}

async fn root() -> Json<Value> {
	Json(serde_json::json!({ "message": "Vehicle recommendation API is running." }))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn get_recommendations(
	State(state): State<AppState>,
	payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationsBody>, ApiError> {
	let Json(request) = payload.map_err(|rejection| {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
	})?;
	let limit = state.service.cfg.recommend.limit as usize;
	let response = state.service.recommend(&request, limit).await?;

	Ok(Json(RecommendationsBody {
		status: STATUS_SUCCESS,
		message: "Recommendations found",
		trace_id: response.trace_id,
		query: response.query,
		recommendations: response.recommendations,
	}))
}

async fn convert_to_vector(State(state): State<AppState>) -> Result<Json<ConvertBody>, ApiError> {
	let report = state.service.build_index(None).await?;

	Ok(Json(ConvertBody {
		status: STATUS_SUCCESS,
		message: "Successfully converted database to vectors",
		details: report,
	}))
}

async fn api_key_middleware(
	State(state): State<AppState>,
	req: Request<Body>,
	next: Next,
) -> Response {
	if let Some(expected) = state.service.cfg.security.api_key.as_deref()
		&& read_api_key(req.headers()) != Some(expected)
	{
		return json_error(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			format!("A valid {HEADER_API_KEY} header is required."),
		)
		.into_response();
	}

	next.run(req).await
}

fn read_api_key(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(HEADER_API_KEY)?.to_str().ok()?.trim();

	if value.is_empty() { None } else { Some(value) }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	status: &'static str,
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into() }
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, code) = match &err {
			ServiceError::DataSourceUnavailable { .. } =>
				(StatusCode::SERVICE_UNAVAILABLE, "data_source_unavailable"),
			ServiceError::IndexUnavailable { .. } =>
				(StatusCode::SERVICE_UNAVAILABLE, "index_unavailable"),
			ServiceError::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
		};

		if status.is_server_error() {
			tracing::error!(error = %err, error_code = code, "Request failed.");
		} else {
			tracing::warn!(error = %err, error_code = code, "Request rejected.");
		}

		json_error(status, code, err.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { status: STATUS_ERROR, error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
