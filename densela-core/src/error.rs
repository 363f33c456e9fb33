//! Argument errors and the process-wide error handler.
//!
//! Every validation failure is passed to the installed handler exactly once
//! and then returned to the caller as a [`BlasError`]. The default handler
//! emits a `tracing` error event; callers that want the classic "abort on
//! bad argument" behavior install their own.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for kernel entry points.
pub type Result<T> = std::result::Result<T, BlasError>;

/// An argument rejected before any computation took place.
///
/// `position` is the 1-based index of the offending parameter in the
/// routine's signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlasError {
    /// Negative or otherwise unusable dimension.
    #[error("{routine}: parameter {position} ({name}) has invalid dimension {value}")]
    InvalidDimension {
        routine: &'static str,
        position: usize,
        name: &'static str,
        value: i64,
    },

    /// Leading dimension smaller than the stored extent.
    #[error("{routine}: parameter {position} ({name}) is {value}, must be at least {required}")]
    InvalidLeadingDimension {
        routine: &'static str,
        position: usize,
        name: &'static str,
        value: usize,
        required: usize,
    },

    /// Flag value outside its defined set, or not allowed for this routine.
    #[error("{routine}: parameter {position} ({name}) has invalid {kind} value {code}")]
    InvalidEnum {
        routine: &'static str,
        position: usize,
        name: &'static str,
        kind: &'static str,
        code: i32,
    },

    /// Zero vector increment.
    #[error("{routine}: parameter {position} ({name}) must be nonzero")]
    InvalidStride {
        routine: &'static str,
        position: usize,
        name: &'static str,
    },

    /// Slice too short for the shape it is supposed to hold.
    #[error("{routine}: parameter {position} ({name}) has {len} elements, {required} required")]
    BufferTooSmall {
        routine: &'static str,
        position: usize,
        name: &'static str,
        len: usize,
        required: usize,
    },
}

impl BlasError {
    /// Name of the routine that rejected its arguments.
    pub fn routine(&self) -> &'static str {
        match self {
            BlasError::InvalidDimension { routine, .. }
            | BlasError::InvalidLeadingDimension { routine, .. }
            | BlasError::InvalidEnum { routine, .. }
            | BlasError::InvalidStride { routine, .. }
            | BlasError::BufferTooSmall { routine, .. } => routine,
        }
    }

    /// 1-based position of the offending parameter.
    pub fn position(&self) -> usize {
        match self {
            BlasError::InvalidDimension { position, .. }
            | BlasError::InvalidLeadingDimension { position, .. }
            | BlasError::InvalidEnum { position, .. }
            | BlasError::InvalidStride { position, .. }
            | BlasError::BufferTooSmall { position, .. } => *position,
        }
    }
}

type Handler = Arc<dyn Fn(&BlasError) + Send + Sync>;

static HANDLER: RwLock<Option<Handler>> = parking_lot::const_rwlock(None);

/// Install a handler invoked for every rejected call.
pub fn set_error_handler<F>(handler: F)
where
    F: Fn(&BlasError) + Send + Sync + 'static,
{
    *HANDLER.write() = Some(Arc::new(handler));
}

/// Restore the default `tracing` handler.
pub fn reset_error_handler() {
    *HANDLER.write() = None;
}

/// The handler runs with the lock released, so it may itself install or
/// reset a handler.
pub(crate) fn report(err: &BlasError) {
    let handler = HANDLER.read().clone();
    match handler {
        Some(handler) => handler(err),
        None => tracing::error!(
            routine = err.routine(),
            position = err.position(),
            "{err}"
        ),
    }
}
