use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::error::{RenderError, TrackError};
use crate::styling::{
    parse_hex_color, render, DataStyle, EyeStyle, Gradient, GradientKind, Logo, QrStyle,
};
use crate::tracker::{
    encode_tracking_url, resolve, Destination, RecordStore, ScanRequest, REDIRECT_COUNTDOWN,
};

// Server
//------------------------------------------------------------------------------

const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL prepended to generated tracking URLs.
    pub tracking_base: String,
    /// Destination used when a malformed scan cannot be resolved, so a bad
    /// sticker never turns into a dead link.
    pub fallback_destination: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tracking_base: "https://track.qrnexus.site".to_string(),
            fallback_destination: "https://qrnexus.site".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: ServerConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/track/:id", get(track_scan))
        .route("/api/resolve/:id", get(resolve_scan))
        .route("/api/render", post(render_styled))
        .route("/api/analytics/:id", get(scan_analytics))
        .route("/api/tracking-url/:id", get(tracking_url))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

// Scan tracking endpoints
//------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TrackQuery {
    redirect: Option<String>,
}

fn scan_request(id: String, query: TrackQuery, headers: &HeaderMap) -> ScanRequest {
    ScanRequest {
        identifier: id,
        redirect_param: query.redirect,
        user_agent: header_value(headers, header::USER_AGENT.as_str()),
        referrer: header_value(headers, header::REFERER.as_str()),
        ip_address: client_ip(headers),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

/// First plausible client address: `x-forwarded-for` (first hop), then
/// `x-real-ip`, then `cf-connecting-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_value(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    header_value(headers, "x-real-ip").or_else(|| header_value(headers, "cf-connecting-ip"))
}

fn redirect_to(destination: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, destination.to_string()),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string()),
        ],
    )
        .into_response()
}

/// Edge variant: resolves and answers an immediate 302. Anything that cannot
/// be resolved falls back to the configured destination instead of erroring.
async fn track_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TrackQuery>,
    headers: HeaderMap,
) -> Response {
    let request = scan_request(id, query, &headers);
    match resolve(state.store.clone(), request) {
        Ok(resolution) => match resolution.destination {
            Destination::Url(destination) => redirect_to(&destination),
            Destination::Text(content) => (
                StatusCode::OK,
                [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string())],
                content,
            )
                .into_response(),
        },
        Err(e) => {
            debug!(error = %e, "scan fell back to default destination");
            redirect_to(&state.config.fallback_destination)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum ResolveResponse {
    Success {
        destination: Option<String>,
        content: Option<String>,
        countdown_secs: u64,
        scan_count: u64,
        is_tracked: bool,
    },
    Error {
        message: String,
    },
}

/// Client-rendered variant: returns the resolution outcome as JSON so the
/// countdown page can drive the redirect itself. Errors stay explicit here
/// rather than falling back.
async fn resolve_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TrackQuery>,
    headers: HeaderMap,
) -> (StatusCode, Json<ResolveResponse>) {
    let request = scan_request(id, query, &headers);
    match resolve(state.store.clone(), request) {
        Ok(resolution) => {
            let (destination, content) = match resolution.destination {
                Destination::Url(url) => (Some(url), None),
                Destination::Text(text) => (None, Some(text)),
            };
            (
                StatusCode::OK,
                Json(ResolveResponse::Success {
                    destination,
                    content,
                    countdown_secs: REDIRECT_COUNTDOWN.as_secs(),
                    scan_count: resolution.record.scan_count,
                    is_tracked: resolution.record.is_tracked,
                }),
            )
        }
        Err(e) => {
            let status = match e {
                TrackError::NotFound => StatusCode::NOT_FOUND,
                TrackError::NoDestination => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, Json(ResolveResponse::Error { message: e.to_string() }))
        }
    }
}

async fn scan_analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.store.analytics(&id))
}

#[derive(Debug, Deserialize)]
struct TrackingUrlQuery {
    destination: String,
}

#[derive(Debug, Serialize)]
struct TrackingUrlResponse {
    tracking_url: String,
}

async fn tracking_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TrackingUrlQuery>,
) -> Result<Json<TrackingUrlResponse>, (StatusCode, String)> {
    let tracking_url = encode_tracking_url(&state.config.tracking_base, &id, &query.destination)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    Ok(Json(TrackingUrlResponse { tracking_url }))
}

// Styled render endpoint
//------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireEyeStyle {
    Square,
    Circle,
    Rounded,
    Leaf,
    Diamond,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireDataStyle {
    Square,
    Circle,
    Rounded,
    Dots,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireGradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGradient {
    #[serde(default)]
    enabled: bool,
    #[serde(rename = "type")]
    kind: WireGradientKind,
    colors: Vec<String>,
    #[serde(default)]
    direction: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLogo {
    image_base64: String,
    size_percent: f32,
    margin_percent: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest {
    content: String,
    #[serde(default = "default_color_black")]
    foreground_color: String,
    #[serde(default = "default_color_white")]
    background_color: String,
    #[serde(default = "default_color_black")]
    eye_color: String,
    #[serde(default)]
    eye_style: Option<WireEyeStyle>,
    #[serde(default)]
    data_style: Option<WireDataStyle>,
    #[serde(default)]
    gradient: Option<WireGradient>,
    #[serde(default)]
    logo: Option<WireLogo>,
}

fn default_color_black() -> String {
    "#000000".to_string()
}

fn default_color_white() -> String {
    "#ffffff".to_string()
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    data_url: String,
    width: u32,
}

fn style_from_request(request: &RenderRequest) -> Result<QrStyle, (StatusCode, String)> {
    let unprocessable = |e: RenderError| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string());

    let gradient = match &request.gradient {
        Some(g) if g.enabled => {
            let start = g
                .colors
                .first()
                .map(|c| parse_hex_color(c))
                .transpose()
                .map_err(unprocessable)?
                .ok_or((StatusCode::UNPROCESSABLE_ENTITY, "gradient needs a color".to_string()))?;
            let end = g.colors.get(1).map(|c| parse_hex_color(c)).transpose().map_err(unprocessable)?;
            Some(Gradient {
                kind: match g.kind {
                    WireGradientKind::Linear => GradientKind::Linear,
                    WireGradientKind::Radial => GradientKind::Radial,
                },
                start,
                end,
                direction: g.direction.rem_euclid(360.0),
            })
        }
        _ => None,
    };

    let logo = match &request.logo {
        Some(l) => {
            let image_bytes = base64::engine::general_purpose::STANDARD
                .decode(&l.image_base64)
                .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("invalid logo base64: {e}")))?;
            Some(Logo {
                image_bytes,
                size_percent: l.size_percent,
                margin_percent: l.margin_percent,
            })
        }
        None => None,
    };

    Ok(QrStyle {
        foreground: parse_hex_color(&request.foreground_color).map_err(unprocessable)?,
        background: parse_hex_color(&request.background_color).map_err(unprocessable)?,
        eye_color: parse_hex_color(&request.eye_color).map_err(unprocessable)?,
        eye_style: match request.eye_style {
            Some(WireEyeStyle::Square) | None => EyeStyle::Square,
            Some(WireEyeStyle::Circle) => EyeStyle::Circle,
            Some(WireEyeStyle::Rounded) => EyeStyle::Rounded,
            Some(WireEyeStyle::Leaf) => EyeStyle::Leaf,
            Some(WireEyeStyle::Diamond) => EyeStyle::Diamond,
        },
        data_style: match request.data_style {
            Some(WireDataStyle::Square) | None => DataStyle::Square,
            Some(WireDataStyle::Circle) => DataStyle::Circle,
            Some(WireDataStyle::Rounded) => DataStyle::Rounded,
            Some(WireDataStyle::Dots) => DataStyle::Dots,
        },
        gradient,
        logo,
    })
}

async fn render_styled(
    State(_state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, (StatusCode, String)> {
    let style = style_from_request(&request)?;
    let canvas = render::render(&request.content, &style).map_err(|e| {
        let status = match e {
            RenderError::PngEncode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, e.to_string())
    })?;
    let data_url = render::to_data_url(&canvas)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!(content_len = request.content.len(), width = canvas.width(), "styled QR rendered");
    Ok(Json(RenderResponse { data_url, width: canvas.width() }))
}
