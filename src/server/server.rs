use anyhow::Result;
use std::{sync::Arc, time::Duration, time::Instant};

use tracing::{error, info};

use crate::admin::AdminGate;
use crate::content::{
    ContentError, ContentService, EventPayload, FlyerPayload, LiveStreamUpdate, PrayerRequestPayload,
    SermonPayload,
};

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};

use super::http_layers::log_requests;
use super::session::AdminSession;
use super::state::ServerState;
use super::ServerConfig;

const MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContentError::Validation { .. } => StatusCode::BAD_REQUEST,
            ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContentError::Persistence(err) => {
                error!("Storage failure: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
    })
}

async fn get_events(State(content): State<Arc<ContentService>>) -> Response {
    match content.list_events() {
        Ok(events) => Json(events).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_event(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Json(payload): Json<EventPayload>,
) -> Response {
    match content.create_event(payload) {
        Ok(event) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Event added successfully", "event": event })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_sermons(State(content): State<Arc<ContentService>>) -> Response {
    match content.list_sermons() {
        Ok(sermons) => Json(sermons).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_sermon(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Json(payload): Json<SermonPayload>,
) -> Response {
    match content.create_sermon(payload) {
        Ok(sermon) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Sermon added successfully", "sermon": sermon })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_sermon(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Path(id): Path<String>,
) -> Response {
    match content.delete_sermon(&id) {
        Ok(()) => Json(json!({ "message": "Sermon deleted successfully" })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_flyers(State(content): State<Arc<ContentService>>) -> Response {
    match content.list_flyers() {
        Ok(flyers) => Json(flyers).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_flyers(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if !body.is_array() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Expected an array of flyers" })),
        )
            .into_response();
    }
    let payloads: Vec<FlyerPayload> = match serde_json::from_value(body) {
        Ok(payloads) => payloads,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Expected an array of flyers" })),
            )
                .into_response();
        }
    };
    match content.create_flyers(payloads) {
        Ok(count) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Flyers added successfully", "count": count })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_flyer(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Path(id): Path<String>,
) -> Response {
    match content.delete_flyer(&id) {
        Ok(()) => Json(json!({ "message": "Flyer deleted successfully" })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_prayer_request(
    State(content): State<Arc<ContentService>>,
    Json(payload): Json<PrayerRequestPayload>,
) -> Response {
    match content.create_prayer_request(payload) {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Prayer request saved successfully" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_prayer_requests(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
) -> Response {
    match content.list_prayer_requests() {
        Ok(requests) => Json(requests).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_live_stream(State(content): State<Arc<ContentService>>) -> Response {
    match content.read_live_stream() {
        Ok(config) => Json(config).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_live_stream(
    _session: AdminSession,
    State(content): State<Arc<ContentService>>,
    Json(update): Json<LiveStreamUpdate>,
) -> Response {
    match content.update_live_stream(update) {
        Ok(config) => {
            Json(json!({ "message": "Live stream updated", "config": config })).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    pub password: String,
}

async fn login(
    State(admin_gate): State<Arc<AdminGate>>,
    Json(body): Json<LoginBody>,
) -> Response {
    match admin_gate.authenticate(&body.password) {
        Ok(token) => Json(json!({ "success": true, "token": token.0 })).into_response(),
        Err(err) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": err.to_string() })),
        )
            .into_response(),
    }
}

impl ServerState {
    fn new(
        content: Arc<ContentService>,
        admin_gate: Arc<AdminGate>,
        config: ServerConfig,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            content,
            admin_gate,
        }
    }
}

fn make_app(
    content: Arc<ContentService>,
    admin_gate: Arc<AdminGate>,
    config: ServerConfig,
) -> Router {
    let state = ServerState::new(content, admin_gate, config.clone());

    let api_routes: Router = Router::new()
        .route("/events", get(get_events))
        .route("/events", post(post_event))
        .route("/sermons", get(get_sermons))
        .route("/sermons", post(post_sermon))
        .route("/sermons/{id}", delete(delete_sermon))
        .route("/flyers", get(get_flyers))
        .route("/flyers", post(post_flyers))
        .route("/flyers/{id}", delete(delete_flyer))
        .route("/prayer-requests", post(post_prayer_request))
        .route("/prayer-requests", get(get_prayer_requests))
        .route("/livestream", get(get_live_stream))
        .route("/livestream", post(post_live_stream))
        .route("/login", post(login))
        .with_state(state.clone());

    let mut app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn_with_state(state, log_requests));

    if let Some(frontend_dir) = &config.frontend_dir_path {
        app = app.fallback_service(ServeDir::new(frontend_dir));
    }

    app
}

pub async fn run_server(
    content: Arc<ContentService>,
    admin_gate: Arc<AdminGate>,
    config: ServerConfig,
) -> Result<()> {
    let port = config.port;
    let app = make_app(content, admin_gate, config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
