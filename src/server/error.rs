//! HTTP error mapping

use crate::error::{DashboardError, InferenceError, ModelLoadError, ParseError, SchemaError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// A pipeline failure for this request
    Dashboard(DashboardError),
    /// Anything else that went wrong while serving
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, missing) = match &self {
            AppError::Dashboard(DashboardError::Schema(err)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                crate::error::SCHEMA_REJECTION.to_string(),
                Some(err.missing.clone()),
            ),
            AppError::Dashboard(DashboardError::Parse(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string(), None)
            }
            AppError::Dashboard(DashboardError::Inference(err)) if err.is_input_error() => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), None)
            }
            AppError::Dashboard(DashboardError::Inference(err)) => {
                tracing::error!(error = %err, "Inference failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Prediction failed for this file".to_string(),
                    None,
                )
            }
            AppError::Dashboard(DashboardError::ModelLoad(err)) => {
                tracing::error!(error = %err, "Model unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Fraud model is not available".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "status": status.as_u16()
        });
        if let Some(missing) = missing {
            body["missing"] = json!(missing);
        }

        (status, Json(body)).into_response()
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        AppError::Dashboard(err)
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Dashboard(err.into())
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::Dashboard(err.into())
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Dashboard(err.into())
    }
}

impl From<ModelLoadError> for AppError {
    fn from(err: ModelLoadError) -> Self {
        AppError::Dashboard(err.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}
