//! Composable Response Transformers
//!
//! [`ResponseTransformer`] is a fluent builder for the [`ApiResponse`] envelope.
//! It starts either from success data or from a list of validation errors,
//! supports `map`-style transformation of the payload, and is finalized with
//! [`ResponseTransformer::build`].
//!
//! ```
//! use registration_validator::functional::response_transformers::ResponseTransformer;
//!
//! let response = ResponseTransformer::new(vec![1, 2, 3])
//!     .map_data(|numbers| numbers.into_iter().map(|n| n * 2).collect::<Vec<_>>())
//!     .build();
//! assert_eq!(response.data, Some(vec![2, 4, 6]));
//! assert_eq!(response.status_code, 200);
//! ```

use serde::Serialize;

use crate::constants;
use crate::functional::validation_rules::ValidationError;
use crate::models::response::{ApiResponse, ErrorBreakdown};

/// Fluent builder for [`ApiResponse`] envelopes.
#[derive(Debug, Clone)]
pub struct ResponseTransformer<T> {
    status_code: u16,
    status: &'static str,
    message: &'static str,
    data: Option<T>,
    errors: Vec<ValidationError>,
    error_breakdown: Option<ErrorBreakdown>,
}

impl<T> ResponseTransformer<T> {
    /// Starts a successful response carrying `data`.
    pub fn new(data: T) -> Self {
        Self {
            status_code: constants::STATUS_CODE_OK,
            status: constants::STATUS_SUCCESS,
            message: constants::MESSAGE_REGISTERED,
            data: Some(data),
            errors: Vec::new(),
            error_breakdown: None,
        }
    }

    /// Starts a failed response listing `errors`, with no data.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            status_code: constants::STATUS_CODE_BAD_REQUEST,
            status: constants::STATUS_FAILED,
            message: constants::MESSAGE_VALIDATION_FAILED,
            data: None,
            errors,
            error_breakdown: None,
        }
    }

    pub fn with_error_breakdown(mut self, breakdown: ErrorBreakdown) -> Self {
        self.error_breakdown = Some(breakdown);
        self
    }

    /// Transforms the data payload, keeping every other field.
    pub fn map_data<U, F>(self, transform: F) -> ResponseTransformer<U>
    where
        F: FnOnce(T) -> U,
    {
        let Self {
            status_code,
            status,
            message,
            data,
            errors,
            error_breakdown,
        } = self;

        ResponseTransformer {
            status_code,
            status,
            message,
            data: data.map(transform),
            errors,
            error_breakdown,
        }
    }

    pub fn build(self) -> ApiResponse<T>
    where
        T: Serialize,
    {
        ApiResponse {
            status_code: self.status_code,
            status: self.status.to_string(),
            message: self.message.to_string(),
            data: self.data,
            errors: self.errors,
            error_breakdown: self.error_breakdown,
        }
    }
}
