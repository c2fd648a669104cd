use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parkspot_core::{FieldError, ServiceError, ValidationError};
use thiserror::Error;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub const NOT_FOUND_MESSAGE: &str = "Parking Spot not found.";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Path segment that is not a parking spot id.
    #[error("unknown parking spot id '{0}'")]
    UnknownId(String),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Service(ServiceError::Validation(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Wrongly typed fields are bad input like any other, not a 422.
        let status = match &rejection {
            JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
            other => other.status(),
        };
        AppError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

fn error_response(status: StatusCode, message: String, field_errors: Vec<FieldError>) -> Response {
    let body = ErrorResponse {
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        field_errors,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Service(ServiceError::Validation(err)) => {
                warn!(%err, "rejected invalid input");
                error_response(StatusCode::BAD_REQUEST, err.to_string(), err.into_errors())
            }
            AppError::Service(ServiceError::Conflict(constraint)) => error_response(
                StatusCode::CONFLICT,
                constraint.message().to_string(),
                Vec::new(),
            ),
            AppError::Service(ServiceError::NotFound(_)) | AppError::UnknownId(_) => {
                error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string(), Vec::new())
            }
            AppError::Service(ServiceError::Storage(err)) => {
                error!(%err, "storage failure");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    Vec::new(),
                )
            }
            AppError::Rejected { status, message } => {
                warn!(%status, %message, "rejected request");
                error_response(status, message, Vec::new())
            }
        }
    }
}
