use crate::config::Config;
use crate::engines::{EngineInfo, EngineRegistry};
use crate::error::VerifyError;
use crate::verification::{
    scoring, visual, ConfidenceReport, DocumentType, PixelationSignal, Recommendation,
    SealSignal, TextExtractor, Verification, Verifier, REPORT_FILENAME,
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Allowance for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<Verifier>,
    pub engines: Arc<Vec<EngineInfo>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(registry: &EngineRegistry, config: Config) -> Self {
        let extractor = TextExtractor::new(registry.default_engine());
        Self {
            verifier: Arc::new(Verifier::new(extractor)),
            engines: Arc::new(registry.info()),
            config: Arc::new(config),
        }
    }
}

/// Verification response
#[derive(Serialize)]
pub struct VerifyResponse {
    pub document_type: DocumentType,
    pub document_type_label: &'static str,
    pub serial_number: Option<String>,
    pub seal: SealSignal,
    pub seal_message: &'static str,
    pub pixelation: PixelationSignal,
    pub pixelation_message: String,
    pub score: u8,
    pub max_score: u8,
    pub recommendation: Recommendation,
    pub recommendation_message: &'static str,
    pub report_text: String,
    pub extracted_text: String,
    pub engine: &'static str,
    pub processing_time_ms: u64,
}

impl VerifyResponse {
    fn new(verification: Verification, engine: &'static str, processing_time_ms: u64) -> Self {
        let Verification {
            report,
            extracted_text,
        } = verification;
        let report_text = crate::verification::report::render(&report);
        let ConfidenceReport {
            document_type,
            serial_number,
            seal,
            pixelation,
            score,
            recommendation,
        } = report;

        Self {
            document_type,
            document_type_label: document_type.label(),
            serial_number: serial_number.is_found().then(|| serial_number.to_string()),
            seal,
            seal_message: seal.verdict.message(),
            pixelation,
            pixelation_message: pixelation.message(),
            score,
            max_score: scoring::MAX_SCORE,
            recommendation,
            recommendation_message: recommendation.message(),
            report_text,
            extracted_text,
            engine,
            processing_time_ms,
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Fixed decision constants, exposed for clients
#[derive(Serialize)]
pub struct Thresholds {
    pub edge_density: f64,
    pub high_pixelation_below: f64,
    pub low_pixelation_from: f64,
    pub proceed_from: u8,
    pub review_from: u8,
    pub max_score: u8,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: &'static str,
    pub available_engines: Vec<EngineInfo>,
    pub max_file_size_bytes: usize,
    pub thresholds: Thresholds,
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/verify", post(handle_verify))
        .route("/verify/report", post(handle_report))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    // Engine availability is checked once, before accepting any request
    let registry = EngineRegistry::new(&config)?;
    tracing::info!(
        "OCR engines available: {} (using {})",
        registry.list().join(", "),
        registry.default_engine().name()
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = router(AppState::new(&registry, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle verification requests
async fn handle_verify(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VerifyResponse>, VerifyError> {
    let start = Instant::now();
    let verification = verify_upload(&state, multipart).await?;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    Ok(Json(VerifyResponse::new(
        verification,
        state.verifier.engine_name(),
        processing_time_ms,
    )))
}

/// Handle report download requests
async fn handle_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, VerifyError> {
    let verification = verify_upload(&state, multipart).await?;
    let text = crate::verification::report::render(&verification.report);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILENAME),
            ),
        ],
        text,
    ))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.verifier.engine_name(),
        available_engines: state.engines.as_ref().clone(),
        max_file_size_bytes: state.config.max_file_size,
        thresholds: Thresholds {
            edge_density: visual::EDGE_DENSITY_THRESHOLD,
            high_pixelation_below: visual::HIGH_PIXELATION_BELOW,
            low_pixelation_from: visual::LOW_PIXELATION_FROM,
            proceed_from: scoring::PROCEED_THRESHOLD,
            review_from: scoring::REVIEW_THRESHOLD,
            max_score: scoring::MAX_SCORE,
        },
    })
}

/// Read the uploaded image and run the pipeline on the blocking pool
async fn verify_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<Verification, VerifyError> {
    let data = read_file_field(multipart, state.config.max_file_size).await?;

    if data.len() > state.config.max_file_size {
        return Err(VerifyError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let verifier = Arc::clone(&state.verifier);
    tokio::task::spawn_blocking(move || verifier.verify_bytes(&data))
        .await
        .map_err(|e| VerifyError::Internal(format!("Verification task failed: {}", e)))?
}

/// Extract the `file` field from a multipart form
async fn read_file_field(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<Bytes, VerifyError> {
    let mut file_data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart", max_file_size))?
    {
        if field.name() != Some("file") {
            continue;
        }

        if let Some(mime) = field.content_type() {
            if !mime.starts_with("image/") {
                tracing::warn!("Received file with content type: {}", mime);
            }
        }

        file_data = Some(
            field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, "Failed to read file data", max_file_size))?,
        );
    }

    file_data.ok_or(VerifyError::MissingFile)
}

/// Body-limit overflows surface as multipart errors; keep them 413
fn multipart_error(e: MultipartError, context: &str, max_file_size: usize) -> VerifyError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        VerifyError::UploadTooLarge { max: max_file_size }
    } else {
        VerifyError::InvalidRequest(format!("{}: {}", context, e))
    }
}
