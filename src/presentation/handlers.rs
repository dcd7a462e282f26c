// HTTP request handlers
use crate::domain::chart::ZoomState;
use crate::error::ChartError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Zoom/pan/viewport parameters for a frame request. Anything omitted falls
/// back to a fully zoomed-out, unpanned view at the configured frame size.
#[derive(Deserialize)]
pub struct FrameQuery {
    pub zoom: Option<f64>,
    pub pan: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl FrameQuery {
    fn zoom_state(&self) -> ZoomState {
        ZoomState::new(self.zoom.unwrap_or(1.0), self.pan.unwrap_or(0.0))
    }
}

#[derive(Deserialize)]
pub struct HoverQuery {
    pub x: f64,
    pub zoom: Option<f64>,
    pub pan: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverResponse {
    pub time_ms: i64,
    pub value: f64,
    pub kind: crate::domain::chart::PointKind,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List metric ids that currently have data
pub async fn list_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.chart_service.metrics().await)
}

/// Ingestion health for the host UI's error banner
pub async fn poll_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poll_status.read().await.clone())
}

/// Chart frame for one metric at the requested zoom/pan state
pub async fn chart_frame(
    Path(metric): Path<String>,
    Query(query): Query<FrameQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let zoom = query.zoom_state();
    let width = query.width.unwrap_or(state.chart_defaults.pixel_width);
    let height = query.height.unwrap_or(state.chart_defaults.pixel_height);

    match state
        .chart_service
        .chart_frame(&metric, &zoom, width, height)
        .await
    {
        Ok(frame) => Json(frame).into_response(),
        Err(e) => no_data_response(e),
    }
}

/// Tooltip target for a pointer position over one metric's chart
pub async fn chart_hover(
    Path(metric): Path<String>,
    Query(query): Query<HoverQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let zoom = ZoomState::new(query.zoom.unwrap_or(1.0), query.pan.unwrap_or(0.0));
    let width = query.width.unwrap_or(state.chart_defaults.pixel_width);
    let height = query.height.unwrap_or(state.chart_defaults.pixel_height);

    match state
        .chart_service
        .hover(&metric, &zoom, width, height, query.x)
        .await
    {
        Ok(hit) => Json(hit.map(|h| HoverResponse {
            time_ms: h.point.timestamp.timestamp_millis(),
            value: h.point.value,
            kind: h.point.kind,
            pixel_x: h.pixel.0,
            pixel_y: h.pixel.1,
        }))
        .into_response(),
        Err(e) => no_data_response(e),
    }
}

/// An absent metric is a typed "no data" result, not a server error.
fn no_data_response(error: ChartError) -> axum::response::Response {
    let status = match error {
        ChartError::EmptyDataset(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
