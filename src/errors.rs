use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the two ingestion paths. None of them touches the current goal list.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("sheet sync is not configured: missing {0}")]
    ConfigMissing(&'static str),

    #[error("sheet request timed out after {0} seconds")]
    Timeout(u64),

    #[error("could not reach the sheet service: {0}")]
    Network(String),

    #[error("sheet service responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("sheet service returned a malformed response: {0}")]
    Malformed(String),

    #[error("no valid data: the sheet contained no usable goal rows")]
    EmptyResult,

    #[error("could not parse status update: {0}")]
    ParseFailure(String),

    #[error("a sync is already in progress")]
    SyncInProgress,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let status = match &err {
            IngestError::ConfigMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            IngestError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            IngestError::Network(_) | IngestError::Status { .. } | IngestError::Malformed(_) => {
                StatusCode::BAD_GATEWAY
            }
            IngestError::EmptyResult => StatusCode::UNPROCESSABLE_ENTITY,
            IngestError::ParseFailure(_) => StatusCode::BAD_REQUEST,
            IngestError::SyncInProgress => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
