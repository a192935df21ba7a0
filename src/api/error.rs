use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use super::error_response;
use crate::core::SolveError;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} {message}")]
    Field { field: &'static str, message: String },

    #[error("{0}")]
    Solver(#[from] SolveError),
}

impl ValidationError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        warn!(error = %self, "rejected request");
        error_response(StatusCode::BAD_REQUEST, &self.to_string())
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::field(field, "must be >= 0"));
    }
    Ok(())
}

pub(crate) fn require_percent(
    field: &'static str,
    value: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        return Err(ValidationError::field(
            field,
            format!("must be between 0 and {max}"),
        ));
    }
    Ok(())
}
