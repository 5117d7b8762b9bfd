//! Route handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use super::AppState;
use crate::error::{describe_error_code, DashboardError, ErrorCode};
use crate::render::{render_chart, ExportFormat};
use crate::views::{Page, View};

#[derive(Debug, Serialize)]
pub struct ViewEntry {
    pub slug: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub source: String,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: u16,
    error: String,
}

/// A [`DashboardError`] answered as JSON
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

fn status_of(err: &DashboardError) -> StatusCode {
    match err.code() {
        ErrorCode::VIEW_UNKNOWN | ErrorCode::VIEW_CHART_NOT_FOUND => StatusCode::NOT_FOUND,
        ErrorCode::RENDER_UNSUPPORTED_FORMAT => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        let body = ErrorBody {
            code: self.0.code(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn page_of(state: &AppState, slug: &str) -> Result<Arc<Page>, DashboardError> {
    let view: View = slug.parse()?;
    state.session.page(view).await
}

pub async fn home() -> Redirect {
    Redirect::to(&format!("/views/{}", View::BasicStatistics.slug()))
}

pub async fn view_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let rendered = match page_of(&state, &slug).await {
        Ok(page) => state.html.render_page(&page),
        Err(e) => {
            let status = status_of(&e);
            warn!("Page for '{}' unavailable: {}", slug, e);
            return html_error(
                &state,
                status,
                describe_error_code(e.code()),
                &e.user_message(),
            );
        }
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Rendering '{}' failed: {}", slug, e);
            html_error(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                describe_error_code(e.code()),
                &e.user_message(),
            )
        }
    }
}

fn html_error(state: &AppState, status: StatusCode, title: &str, message: &str) -> Response {
    match state.html.render_error(title, message) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    html_error(
        &state,
        StatusCode::NOT_FOUND,
        "Not found",
        "Choose a view from the Student Menu.",
    )
}

pub async fn list_views() -> Json<Vec<ViewEntry>> {
    Json(
        View::ALL
            .iter()
            .map(|v| ViewEntry {
                slug: v.slug(),
                title: v.title(),
            })
            .collect(),
    )
}

pub async fn view_json(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Page>, ApiError> {
    let page = page_of(&state, &slug).await?;
    Ok(Json(Page::clone(&page)))
}

/// `chart` is the chart index, optionally suffixed with `.svg`
pub async fn chart_svg(
    State(state): State<AppState>,
    Path((slug, chart)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let page = page_of(&state, &slug).await?;
    let missing = || {
        DashboardError::view_with_code(
            ErrorCode::VIEW_CHART_NOT_FOUND,
            format!("no chart '{}'", chart),
            Some(slug.clone()),
        )
    };

    let index: usize = chart
        .strip_suffix(".svg")
        .unwrap_or(chart.as_str())
        .parse()
        .map_err(|_| missing())?;
    let spec = page.chart(index).ok_or_else(missing)?;

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_chart(spec),
    )
        .into_response())
}

pub async fn export_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = match params.format.as_deref() {
        Some(name) => name.parse::<ExportFormat>()?,
        None => ExportFormat::Json,
    };
    let page = page_of(&state, &slug).await?;
    let exporter = format.exporter();
    let body = exporter.export(&page)?;

    let extension = match format {
        ExportFormat::Json => "json",
        ExportFormat::Csv => "csv",
        ExportFormat::Markdown => "md",
    };
    let disposition = format!("inline; filename=\"{}.{}\"", page.slug, extension);

    Ok((
        [
            (header::CONTENT_TYPE, exporter.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        source: state.session.source().to_string(),
        rows: state.session.table().len(),
        loaded_at: state.session.loaded_at(),
    })
}
