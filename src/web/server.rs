use axum::http::header;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::analysis::engine::{AnalysisError, GuideAnalyzer};
use crate::analysis::export::{to_json_pretty, EXPORT_FILE_NAME};
use crate::analysis::result::AnalysisResult;
use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::parsing::fasta::FastaError;
use crate::parsing::input::{inspect, select_sequence, InputError, InputReport};
use crate::parsing::sequence::SequenceError;
use crate::systems::store::{CrisprSystem, SystemCatalog};
use crate::utils::validation::{check_content_length, validate_upload, ValidationError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
/// Room for multipart boundaries and headers on top of the content limit
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub analyzer: GuideAnalyzer,
    pub config: AppConfig,
    last_result: RwLock<Option<Arc<AnalysisResult>>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, catalog: SystemCatalog) -> Self {
        let analyzer = GuideAnalyzer::new(Arc::new(catalog), config.analysis_config());
        Self {
            analyzer,
            config,
            last_result: RwLock::new(None),
        }
    }

    /// The most recent successful analysis, if any
    #[must_use]
    pub fn last_result(&self) -> Option<Arc<AnalysisResult>> {
        self.last_result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_last_result(&self, result: Arc<AnalysisResult>) {
        *self
            .last_result
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(result);
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    sequence: String,
    #[serde(default = "default_system")]
    system: String,
    #[serde(default)]
    off_targets: bool,
}

fn default_system() -> String {
    "SpCas9".to_string()
}

#[derive(Deserialize)]
struct ParseRequest {
    text: String,
}

/// Validation failure reported by `/api/parse` and `/api/upload`
#[derive(Serialize)]
struct ParseFailure {
    success: bool,
    error: String,
    line_number: Option<usize>,
    invalid_characters: Vec<String>,
}

#[derive(Serialize)]
struct ParseSuccess<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(flatten)]
    report: &'a InputReport,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, None)),
    )
        .into_response()
}

fn internal_error(error_type: &str, internal: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(create_safe_error_response(
            error_type,
            "An internal error occurred",
            Some(internal),
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes and every middleware layer except per-IP rate limiting.
///
/// Rate limiting needs the peer address, which only exists when the router is
/// served with `into_make_service_with_connect_info`.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_content_length + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(index_handler))
        .route("/systems", get(systems_handler))
        .route("/analyze", post(analyze_handler))
        .route("/api/parse", post(parse_handler))
        .route("/api/upload", post(upload_handler))
        .route("/download", get(download_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}

/// Create the full application router, including per-IP rate limiting.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is invalid.
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(router(state).layer(GovernorLayer::new(Arc::new(governor_conf))))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = match &args.systems {
        Some(path) => SystemCatalog::load_from_file(path)?,
        None => SystemCatalog::load_embedded()?,
    };
    let config = AppConfig::for_environment(args.env);
    info!(
        environment = %config.environment,
        systems = catalog.len(),
        max_content_length = config.max_content_length,
        "Configured server"
    );

    let app = create_router(Arc::new(AppState::new(config, catalog)))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting crispr-guide web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// Available CRISPR systems keyed by name
async fn systems_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let systems: BTreeMap<&str, &CrisprSystem> = state
        .analyzer
        .catalog()
        .iter()
        .map(|(id, system)| (id.as_str(), system))
        .collect();

    Json(serde_json::json!({ "systems": systems }))
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(rejection.status(), "invalid_request", &rejection.body_text())
        }
    };

    let selected = match select_sequence(&request.sequence) {
        Ok(selected) => selected,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "invalid_sequence", &e.to_string()),
    };

    let worker_state = Arc::clone(&state);
    let system = request.system;
    let off_targets = request.off_targets;
    let outcome = tokio::task::spawn_blocking(move || {
        worker_state
            .analyzer
            .analyze(&selected.sequence, &system, off_targets)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            state.set_last_result(Arc::clone(&result));
            Json(serde_json::json!({ "data": &*result })).into_response()
        }
        Ok(Err(e @ AnalysisError::InvalidPam { .. })) => {
            internal_error("invalid_system", &e.to_string())
        }
        Ok(Err(e)) => error_response(StatusCode::BAD_REQUEST, "analysis_failed", &e.to_string()),
        Err(e) => internal_error("analysis_task_failed", &e.to_string()),
    }
}

async fn parse_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(rejection.status(), "invalid_request", &rejection.body_text())
        }
    };

    if let Err(e) = check_content_length(request.text.len(), state.config.max_content_length) {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, "text_too_large", &e.to_string());
    }

    inspect_response(&request.text, None)
}

async fn upload_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut fields_received = 0usize;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
            );
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "invalid_upload",
                    "Failed to parse upload. Please check the file and try again.",
                )
            }
        };
        fields_received += 1;

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(ToString::to_string);
        let Ok(bytes) = field.bytes().await else {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_upload",
                "Failed to read uploaded file",
            );
        };

        return match validate_upload(filename.as_deref(), &bytes, state.config.max_content_length)
        {
            Ok((validated_filename, text)) => inspect_response(text, validated_filename),
            Err(e) => validation_error_response(&e),
        };
    }

    error_response(
        StatusCode::BAD_REQUEST,
        "missing_input",
        "No file received. Please upload a sequence file.",
    )
}

fn validation_error_response(error: &ValidationError) -> Response {
    let (status, error_type) = match error {
        ValidationError::FilenameTooLong => (StatusCode::BAD_REQUEST, "filename_too_long"),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => {
            (StatusCode::BAD_REQUEST, "invalid_filename")
        }
        ValidationError::DisallowedExtension => (StatusCode::BAD_REQUEST, "invalid_file_type"),
        ValidationError::InvalidFileContent => (StatusCode::BAD_REQUEST, "invalid_content"),
        ValidationError::ContentTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "file_too_large"),
    };
    error_response(status, error_type, &error.to_string())
}

/// Shared body of `/api/parse` and `/api/upload`
fn inspect_response(text: &str, filename: Option<String>) -> Response {
    match inspect(text) {
        Ok(report) => Json(ParseSuccess {
            success: true,
            filename,
            report: &report,
        })
        .into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(parse_failure(&e))).into_response(),
    }
}

fn parse_failure(error: &InputError) -> ParseFailure {
    let (line_number, invalid) = match error {
        InputError::Fasta(FastaError::InvalidCharacter { line, characters }) => {
            (Some(*line), characters.clone())
        }
        InputError::Sequence(SequenceError::InvalidBases(bases)) => {
            let mut distinct: Vec<char> = Vec::new();
            for base in bases {
                if !distinct.contains(&base.character) {
                    distinct.push(base.character);
                }
            }
            (None, distinct)
        }
        _ => (None, Vec::new()),
    };

    ParseFailure {
        success: false,
        error: error.to_string(),
        line_number,
        invalid_characters: invalid.iter().map(char::to_string).collect(),
    }
}

/// Last successful analysis as a downloadable JSON file
async fn download_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(result) = state.last_result() else {
        return error_response(
            StatusCode::NOT_FOUND,
            "no_results",
            "No analysis results available to download",
        );
    };

    match to_json_pretty(&result) {
        Ok(json) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            json,
        )
            .into_response(),
        Err(e) => internal_error("export_failed", &format!("{e:#}")),
    }
}
