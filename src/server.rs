//! HTTP API server: axum router and request handlers.
//!
//! The server runs on the tokio async runtime while the simulation runs on
//! a plain `std::thread`. Commands go over `std::sync::mpsc`; status and
//! the latest frame come back through `Arc<Mutex<_>>`.
//!
//! ## Rust concepts
//! - `async fn` and `.await` for non-blocking I/O
//! - axum extractors: `State`, `Json`
//! - `Arc` for sharing state across async tasks
//! - Serde `Deserialize` for parsing JSON request bodies
//! - `tower-http` middleware for CORS and request tracing

use crate::life::Pattern;
use crate::sim::{SharedState, SimCommand, SimState, SimulationStatus};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ── App State ────────────────────────────────────────────────────────

/// Shared application state, passed to every handler via axum's `State` extractor.
///
/// Rust concept: CLONE for Arc
/// axum clones the state for each request, so everything inside must be
/// cheap to clone. `Sender` and the `Arc`s in `SharedState` both are.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send commands to the simulation thread
    pub command_tx: Sender<SimCommand>,
    /// Status and frame (simulation thread writes, handlers read)
    pub shared: SharedState,
}

// ── OpenAPI Documentation ────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(
        get_status,
        get_patterns,
        get_frame,
        post_reset,
        post_pause,
        post_resume,
        post_settings,
        post_brightness,
    ),
    components(schemas(
        SimulationStatus,
        SimState,
        crate::life::LifeStats,
        Pattern,
        ResetRequest,
        SettingsRequest,
        BrightnessRequest,
    )),
    tags(
        (name = "simulation", description = "Simulation control endpoints"),
        (name = "display", description = "Display endpoints"),
        (name = "system", description = "System status endpoints"),
    ),
    info(
        title = "LED Life API",
        version = env!("CARGO_PKG_VERSION"),
        description = "HTTP API for a Game of Life running on an RGB LED matrix"
    )
)]
pub struct ApiDoc;

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ResetRequest {
    /// Starting pattern for this and later resets. Omit to keep the current one.
    #[serde(default)]
    #[schema(example = "glider")]
    pattern: Option<Pattern>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SettingsRequest {
    /// Frames per generation for birth/death fades. 0 or 1 disables fading.
    #[serde(default)]
    #[schema(example = 8, maximum = 64)]
    fade_steps: Option<u8>,
    /// Delay between generations in milliseconds
    #[serde(default)]
    #[schema(example = 50, maximum = 10000)]
    delay_ms: Option<u64>,
}

/// Upper bounds on settings, so a typo can't stall the display.
const MAX_FADE_STEPS: u8 = 64;
const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BrightnessRequest {
    /// Brightness level (0-100)
    #[schema(example = 75, minimum = 0, maximum = 100)]
    value: u8,
}

// ── Router ───────────────────────────────────────────────────────────

/// Build the axum router with all API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(
            SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
                .config(utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"]).validator_url("none")),
        )
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/patterns", get(get_patterns))
        .route("/api/v1/frame.png", get(get_frame))
        .route("/api/v1/simulation/reset", post(post_reset))
        .route("/api/v1/simulation/pause", post(post_pause))
        .route("/api/v1/simulation/resume", post(post_resume))
        .route("/api/v1/simulation/settings", post(post_settings))
        .route("/api/v1/brightness", post(post_brightness))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────

/// GET /api/v1/status — return current simulation state
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "system",
    responses(
        (status = 200, description = "Current simulation status", body = SimulationStatus)
    )
)]
async fn get_status(State(state): State<AppState>) -> Json<SimulationStatus> {
    let status = state.shared.status.lock().unwrap().clone();
    Json(status)
}

/// GET /api/v1/patterns — list starting patterns
#[utoipa::path(
    get,
    path = "/api/v1/patterns",
    tag = "simulation",
    responses(
        (status = 200, description = "Available starting patterns", body = Vec<Pattern>)
    )
)]
async fn get_patterns() -> Json<Vec<Pattern>> {
    Json(Pattern::ALL.to_vec())
}

/// GET /api/v1/frame.png — snapshot of the display
#[utoipa::path(
    get,
    path = "/api/v1/frame.png",
    tag = "display",
    responses(
        (status = 200, description = "PNG of the current frame", body = Vec<u8>, content_type = "image/png"),
        (status = 503, description = "No frame rendered yet")
    )
)]
async fn get_frame(State(state): State<AppState>) -> Result<impl IntoResponse, (StatusCode, String)> {
    let frame = state.shared.frame.lock().unwrap().clone();
    if frame.pixels().is_empty() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "No frame rendered yet".to_string(),
        ));
    }

    let png = frame
        .encode_png()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// POST /api/v1/simulation/reset — start a new simulation
#[utoipa::path(
    post,
    path = "/api/v1/simulation/reset",
    tag = "simulation",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Simulation reset"),
        (status = 503, description = "Simulation thread not running")
    )
)]
async fn post_reset(
    State(state): State<AppState>,
    req: Option<Json<ResetRequest>>,
) -> Result<StatusCode, (StatusCode, String)> {
    // A bare POST with no body keeps the current pattern.
    let Json(req) = req.unwrap_or_default();
    send(&state, SimCommand::Reset(req.pattern))
}

/// POST /api/v1/simulation/pause — freeze the current generation
#[utoipa::path(
    post,
    path = "/api/v1/simulation/pause",
    tag = "simulation",
    responses(
        (status = 200, description = "Simulation paused"),
        (status = 503, description = "Simulation thread not running")
    )
)]
async fn post_pause(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    send(&state, SimCommand::Pause)
}

/// POST /api/v1/simulation/resume — continue after a pause
#[utoipa::path(
    post,
    path = "/api/v1/simulation/resume",
    tag = "simulation",
    responses(
        (status = 200, description = "Simulation resumed"),
        (status = 503, description = "Simulation thread not running")
    )
)]
async fn post_resume(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    send(&state, SimCommand::Resume)
}

/// POST /api/v1/simulation/settings — change fade steps and/or delay
#[utoipa::path(
    post,
    path = "/api/v1/simulation/settings",
    tag = "simulation",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Settings updated"),
        (status = 400, description = "Value out of range"),
        (status = 503, description = "Simulation thread not running")
    )
)]
async fn post_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    if let Some(steps) = req.fade_steps.filter(|&s| s > MAX_FADE_STEPS) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("fade_steps must be at most {MAX_FADE_STEPS}, got {steps}"),
        ));
    }
    if let Some(ms) = req.delay_ms.filter(|&ms| ms > MAX_DELAY_MS) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("delay_ms must be at most {MAX_DELAY_MS}, got {ms}"),
        ));
    }

    if let Some(steps) = req.fade_steps {
        send(&state, SimCommand::SetFadeSteps(steps))?;
    }
    if let Some(ms) = req.delay_ms {
        send(&state, SimCommand::SetDelay(ms))?;
    }

    Ok(StatusCode::OK)
}

/// POST /api/v1/brightness — set display brightness (0-100)
#[utoipa::path(
    post,
    path = "/api/v1/brightness",
    tag = "display",
    request_body = BrightnessRequest,
    responses(
        (status = 200, description = "Brightness updated"),
        (status = 400, description = "Value above 100"),
        (status = 503, description = "Simulation thread not running")
    )
)]
async fn post_brightness(
    State(state): State<AppState>,
    Json(req): Json<BrightnessRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    if req.value > 100 {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Brightness must be 0-100, got {}", req.value),
        ));
    }
    send(&state, SimCommand::SetBrightness(req.value))
}

fn send(state: &AppState, cmd: SimCommand) -> Result<StatusCode, (StatusCode, String)> {
    let failed = state.shared.status.lock().unwrap().state == SimState::Failed;
    if failed {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Simulation failed to start".to_string(),
        ));
    }

    state.command_tx.send(cmd).map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Simulation thread gone".to_string(),
        )
    })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use crate::life::LifeConfig;
    use crate::renderer::{FrameBuffer, Renderer};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use std::sync::mpsc::{self, Receiver};
    use tower::ServiceExt;

    fn test_app() -> (Router, Receiver<SimCommand>, SharedState) {
        let (tx, rx) = mpsc::channel();
        let shared = SharedState::new(&LifeConfig::default());
        let app = create_router(AppState {
            command_tx: tx,
            shared: shared.clone(),
        });
        (app, rx, shared)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_returns_shared_status() {
        let (app, _rx, shared) = test_app();
        shared.status.lock().unwrap().brightness = 42;

        let response = app
            .oneshot(Request::get("/api/v1/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["state"], "starting");
        assert_eq!(json["brightness"], 42);
        assert_eq!(json["pattern"], "random");
        assert_eq!(json["stats"]["resets"], 0);
    }

    #[tokio::test]
    async fn patterns_lists_every_pattern() {
        let (app, _rx, _shared) = test_app();
        let response = app
            .oneshot(Request::get("/api/v1/patterns").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        let names: Vec<&str> = json.as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["random", "glider", "blinker", "block", "toad", "beacon", "medium_spaceship"]
        );
    }

    #[tokio::test]
    async fn reset_forwards_pattern() {
        let (app, rx, _shared) = test_app();
        let response = app
            .oneshot(post_json("/api/v1/simulation/reset", r#"{"pattern":"toad"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Reset(Some(Pattern::Toad)));
    }

    #[tokio::test]
    async fn reset_without_pattern() {
        let (app, rx, _shared) = test_app();
        let response = app
            .oneshot(post_json("/api/v1/simulation/reset", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Reset(None));
    }

    #[tokio::test]
    async fn reset_with_no_body() {
        let (app, rx, _shared) = test_app();
        let response = app.oneshot(post_empty("/api/v1/simulation/reset")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Reset(None));
    }

    #[tokio::test]
    async fn unknown_pattern_is_rejected() {
        let (app, rx, _shared) = test_app();
        let response = app
            .oneshot(post_json("/api/v1/simulation/reset", r#"{"pattern":"spaceship"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn pause_and_resume() {
        let (app, rx, _shared) = test_app();

        let response = app.clone().oneshot(post_empty("/api/v1/simulation/pause")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.oneshot(post_empty("/api/v1/simulation/resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(rx.try_recv().unwrap(), SimCommand::Pause);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::Resume);
    }

    #[tokio::test]
    async fn settings_send_only_given_fields() {
        let (app, rx, _shared) = test_app();
        let response = app
            .oneshot(post_json("/api/v1/simulation/settings", r#"{"delay_ms":25}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::SetDelay(25));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn settings_out_of_range_send_nothing() {
        let (app, rx, _shared) = test_app();
        let response = app
            .oneshot(post_json(
                "/api/v1/simulation/settings",
                r#"{"fade_steps":8,"delay_ms":60000}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn brightness_is_validated() {
        let (app, rx, _shared) = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/brightness", r#"{"value":150}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json("/api/v1/brightness", r#"{"value":60}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), SimCommand::SetBrightness(60));
    }

    #[tokio::test]
    async fn closed_channel_is_unavailable() {
        let (app, rx, _shared) = test_app();
        drop(rx);

        let response = app.oneshot(post_empty("/api/v1/simulation/pause")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn failed_simulation_is_unavailable() {
        let (app, _rx, shared) = test_app();
        shared.status.lock().unwrap().state = SimState::Failed;

        let response = app.oneshot(post_empty("/api/v1/simulation/resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn frame_before_first_render_is_unavailable() {
        let (app, _rx, _shared) = test_app();
        let response = app
            .oneshot(Request::get("/api/v1/frame.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn frame_is_png() {
        let (app, _rx, shared) = test_app();
        {
            let mut fb = FrameBuffer::new(4, 3);
            fb.set_pixel(1, 2, Color::new(255, 0, 0));
            *shared.frame.lock().unwrap() = fb;
        }

        let response = app
            .oneshot(Request::get("/api/v1/frame.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(1, 2).0, [255, 0, 0]);
    }

    #[tokio::test]
    async fn openapi_lists_simulation_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/simulation/reset"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/frame.png"));
        assert_eq!(paths.len(), 8);
    }
}
