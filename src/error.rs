use thiserror::Error;

use crate::scheduling::types::Appointment;

/// Error taxonomy for the scheduling service. Every failure is returned as a
/// value; the store is never left half-updated.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("appointment not found: {0}")]
    NotFound(String),

    #[error("duplicate appointment id: {0}")]
    DuplicateId(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Not fatal: the caller decides to reschedule or abort. Carries every
    /// colliding appointment so all collisions can be shown at once.
    #[error("scheduling conflict with {} existing appointment(s)", .0.len())]
    Conflict(Vec<Appointment>),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
