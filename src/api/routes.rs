use axum::{
    routing::get,
    Router,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::aggregator::LogProgress;
use crate::error::{AppError, Result};
use crate::api::models::{AnalysisStatus, SentimentRequest, SentimentResponse};
use crate::api::response;
use crate::models::QueryWindow;
use crate::report::{self, Analysis, NO_DATA_MESSAGE};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sentiment", get(query_handler).post(sentiment_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn query_handler(
    State(state): State<AppState>,
    req: std::result::Result<Query<SentimentRequest>, QueryRejection>,
) -> impl IntoResponse {
    match req {
        Ok(Query(req)) => respond(&state, req).await,
        Err(rejection) => reject(rejection.into()),
    }
}

async fn sentiment_handler(
    State(state): State<AppState>,
    req: std::result::Result<Json<SentimentRequest>, JsonRejection>,
) -> impl IntoResponse {
    match req {
        Ok(Json(req)) => respond(&state, req).await,
        Err(rejection) => reject(rejection.into()),
    }
}

fn reject(err: AppError) -> response::Reply<SentimentResponse> {
    warn!(error = %err, "malformed request");
    response::failure(&err)
}

async fn respond(state: &AppState, req: SentimentRequest) -> response::Reply<SentimentResponse> {
    info!(subject = %req.subject, days = req.days, "analysis requested");
    let start_time = std::time::Instant::now();

    let result = tokio::time::timeout(
        state.config.request_timeout,
        process_request(state, &req),
    )
    .await
    .unwrap_or_else(|_| {
        Err(AppError::Timeout(format!(
            "analysis exceeded {}s",
            state.config.request_timeout.as_secs()
        )))
    });

    info!(elapsed = ?start_time.elapsed(), "analysis finished");

    match result {
        Ok(body) => {
            let message = body.message.clone();
            response::success(body, message)
        }
        Err(err) => {
            warn!(error = %err, "analysis failed");
            response::failure(&err)
        }
    }
}

/// Validates the request and runs the pipeline.
pub async fn process_request(state: &AppState, req: &SentimentRequest) -> Result<SentimentResponse> {
    let window = QueryWindow::new(&req.subject, req.days)?;

    let response = match report::analyze(&state.aggregator, &window, &LogProgress).await {
        Analysis::NoData => {
            info!(subject = window.subject(), "no articles found");
            SentimentResponse {
                status: AnalysisStatus::NoData,
                subject: window.subject().to_string(),
                days: window.days(),
                analyzed_at: Utc::now(),
                message: Some(NO_DATA_MESSAGE.to_string()),
                report: None,
            }
        }
        Analysis::Report(report) => SentimentResponse {
            status: AnalysisStatus::Ok,
            subject: window.subject().to_string(),
            days: window.days(),
            analyzed_at: Utc::now(),
            message: None,
            report: Some(report),
        },
    };

    Ok(response)
}
