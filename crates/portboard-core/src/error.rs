//! Editing errors.

use crate::scene::{EntityId, SceneError};
use thiserror::Error;

/// Negative results of editing operations. None of them leave a partial mutation behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("Nothing to group: need at least 2 selected entities, have {0}")]
    NothingToGroup(usize),
    #[error("Operation requires exactly one selected entity, have {0}")]
    RequiresSingleSelection(usize),
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),
    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),
    #[error("Invalid size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("Entity not in scene: {0}")]
    MissingEntity(EntityId),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;
