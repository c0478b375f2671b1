use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch feed: {0}")]
    FetchError(String),

    #[error("Error parsing feed: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::FetchError(_) => StatusCode::BAD_GATEWAY,
            AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::FetchError(err.to_string())
        }
    }
}

impl From<rss::Error> for AppError {
    fn from(err: rss::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
