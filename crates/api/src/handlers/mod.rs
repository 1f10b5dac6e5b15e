pub mod blob;
pub mod booking;
pub mod event;
pub mod venue;

use eventease_core::error::CoreError;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run the DTO's `validator` rules, echoing the input back on failure.
pub(crate) fn validate_input<T: Validate + Serialize>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::rejected(CoreError::Validation(e.to_string()), input))
}
