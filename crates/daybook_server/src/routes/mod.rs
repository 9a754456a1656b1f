pub mod events;
pub mod health;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use daybook_core::db::DbError;
use daybook_core::{EventServiceError, RepoError};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON body extractor whose rejections render as `ErrorResponse`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path extractor whose rejections render as `ErrorResponse`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// Query-string extractor whose rejections render as `ErrorResponse`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Request failure mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Service(EventServiceError),
    /// Body, path or query could not be decoded.
    BadRequest(String),
    /// Database could not be opened or migrated.
    StorageUnavailable(String),
    /// Blocking task panicked or was cancelled.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(EventServiceError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(EventServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(EventServiceError::Storage(_)) | Self::StorageUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::BadRequest(message) => write!(f, "{message}"),
            Self::StorageUnavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=server status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<EventServiceError> for ApiError {
    fn from(err: EventServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::Service(err.into())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}
