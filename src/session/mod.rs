//! Orchestrators that own the file browsers and deferred command slots of
//! one main-window mode, and mediate between them and the archive backend.

pub mod create;
pub mod extract;

pub use create::{CreateDialog, CreateSession};
pub use extract::{ExtractDialog, ExtractSession};

use crate::error::{AppError, Result};

/// Record a failed drain: log it and keep it for the error modal.
fn collect<T>(result: Result<T>, errors: &mut Vec<AppError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            errors.push(e);
            None
        }
    }
}
