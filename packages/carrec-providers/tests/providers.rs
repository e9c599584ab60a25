use axum::{Json, Router, http::HeaderMap, routing::post};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use carrec_config::EmbeddingProviderConfig;

fn provider_config(api_base: String) -> EmbeddingProviderConfig {
	let mut default_headers = Map::new();

	default_headers.insert("x-team".to_string(), Value::String("catalog".to_string()));

	EmbeddingProviderConfig {
		provider_id: "stub".to_string(),
		api_base,
		api_key: "secret".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "stub-embed".to_string(),
		dimensions: 2,
		timeout_ms: 5_000,
		batch_size: 8,
		default_headers,
	}
}

async fn stub_embeddings(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
	assert_eq!(headers.get("authorization").and_then(|v| v.to_str().ok()), Some("Bearer secret"));
	assert_eq!(headers.get("x-team").and_then(|v| v.to_str().ok()), Some("catalog"));
	assert_eq!(body["model"], "stub-embed");
	assert_eq!(body["dimensions"], 2);

	let inputs = body["input"].as_array().cloned().unwrap_or_default();
	// Listed in reverse to check the client restores input order.
	let data = inputs
		.iter()
		.enumerate()
		.rev()
		.map(|(index, input)| {
			let len = input.as_str().map(str::len).unwrap_or_default() as f64;

			serde_json::json!({ "index": index, "embedding": [len, index as f64] })
		})
		.collect::<Vec<_>>();

	Json(serde_json::json!({ "data": data }))
}

async fn spawn_stub() -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub listener.");
	let addr = listener.local_addr().expect("Failed to read stub address.");
	let app = Router::new().route("/v1/embeddings", post(stub_embeddings));

	tokio::spawn(async move {
		axum::serve(listener, app).await.expect("Stub server failed.");
	});

	format!("http://{addr}")
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		carrec_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut default_headers = Map::new();

	default_headers.insert("x-retries".to_string(), Value::from(3));

	assert!(carrec_providers::auth_headers("secret", &default_headers).is_err());
}

#[tokio::test]
async fn embeds_batch_against_compatible_endpoint() {
	let cfg = provider_config(spawn_stub().await);
	let texts = vec!["a".to_string(), "bbb".to_string(), "cc".to_string()];
	let vectors =
		carrec_providers::embedding::embed(&cfg, &texts).await.expect("Embedding call failed.");

	assert_eq!(vectors, vec![vec![1.0, 0.0], vec![3.0, 1.0], vec![2.0, 2.0]]);
}

#[tokio::test]
async fn empty_batch_skips_the_network() {
	let cfg = provider_config("http://127.0.0.1:9".to_string());
	let vectors = carrec_providers::embedding::embed(&cfg, &[]).await.expect("Empty batch failed.");

	assert!(vectors.is_empty());
}

#[tokio::test]
async fn http_errors_surface_as_failures() {
	let mut cfg = provider_config(spawn_stub().await);

	cfg.path = "/v1/missing".to_string();

	assert!(carrec_providers::embedding::embed(&cfg, &["a".to_string()]).await.is_err());
}
