use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

use crate::error::AppError;

pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(code: StatusCode, message: Option<String>) -> Self {
        Self {
            status: if code.is_success() { "success" } else { "error" },
            status_code: code.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T, message: Option<String>) -> Reply<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new(StatusCode::OK, message),
        }),
    )
}

pub fn failure<T>(err: &AppError) -> Reply<T> {
    let code = err.status_code();
    (
        code,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta::new(code, Some(err.to_string())),
        }),
    )
}
