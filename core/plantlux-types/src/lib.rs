//! Core type definitions for plantlux.
//!
//! This crate defines the plain data the rest of the client works with:
//! - Plant records and their server-assigned identifiers
//! - The add/edit form model and its validation
//! - Light adequacy classification and the recommendation built on it
//!
//! Nothing here performs I/O. Synchronization with the inventory service
//! lives in `plantlux-sync`.

mod draft;
mod light;
mod plant;

pub use draft::{NewPlant, PlantDraft};
pub use light::{LightReport, LightStatus, TOLERANCE_RATIO};
pub use plant::{Plant, PlantId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or evaluating plant data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    #[error("invalid lux value {input:?}: {reason}")]
    InvalidLux { input: String, reason: &'static str },

    #[error("required lux must be positive, got {0}")]
    NonPositiveRequirement(f64),

    #[error("invalid plant id: {0}")]
    InvalidId(String),
}
