use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::Value;
use tokio::sync::Mutex;
use wxday_core::{EngineError, ForecastEngine, ForecastOutput, OutputSink, PayloadSource};

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    batches_total: Counter<u64>,
    engine: ForecastEngine,
    latest: Mutex<Option<ForecastOutput>>,
}

pub fn build_app(engine: ForecastEngine) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .context("failed to build prometheus exporter")?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("wxday-cli");

    let requests_total = meter
        .u64_counter("wxday_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let batches_total = meter
        .u64_counter("wxday_batches_total")
        .with_description("Forecast payloads processed")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        batches_total,
        engine,
        latest: Mutex::new(None),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/forecast", get(forecast))
        .route("/api/v1/payload", post(ingest_payload))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

/// Reads one payload from a JSON file on disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PayloadSource for FileSource {
    async fn next_payload(&mut self) -> Result<Value> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))
    }
}

/// Publishes outputs as the latest forecast served over HTTP
pub struct StateSink {
    state: Arc<AppState>,
}

impl StateSink {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait::async_trait]
impl OutputSink for StateSink {
    async fn emit(&mut self, output: &ForecastOutput) -> Result<()> {
        let mut latest = self.state.latest.lock().await;
        *latest = Some(output.clone());
        Ok(())
    }
}

/// Run the engine over one payload and publish the result
pub async fn process_payload(
    state: &Arc<AppState>,
    payload: &Value,
) -> Result<ForecastOutput, EngineError> {
    let output = state.engine.run(payload)?;
    state.batches_total.add(1, &[]);

    let mut sink = StateSink::new(Arc::clone(state));
    if let Err(e) = sink.emit(&output).await {
        tracing::warn!(error=?e, "failed to publish forecast");
    }
    Ok(output)
}

/// Pull one payload from `source` and process it
pub async fn load_from_source(
    state: &Arc<AppState>,
    source: &mut dyn PayloadSource,
) -> Result<ForecastOutput> {
    let payload = source.next_payload().await?;
    let output = process_payload(state, &payload).await?;
    Ok(output)
}

pub async fn latest(state: &Arc<AppState>) -> Option<ForecastOutput> {
    state.latest.lock().await.clone()
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

async fn forecast(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    let latest = state.latest.lock().await;
    if let Some(output) = latest.as_ref() {
        return (StatusCode::OK, Json(output)).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn ingest_payload(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    state.requests_total.add(1, &[]);
    match process_payload(&state, &payload).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            tracing::warn!(error=%e, "rejected forecast payload");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
