//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ChainError, PlacementError, StoreError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StoreError::FramesetExists(name))
        | ApiError::Placement(PlacementError::Store(StoreError::FramesetExists(name))) => {
            format!("Frameset {} already exists; pass --recreate to replace it", name)
        }
        ApiError::Placement(PlacementError::Chain(ChainError::LinkNotPersisted {
            from,
            orphan,
            reason,
        })) => format!(
            "Could not link {} to new page {}: {}. Page {} was not saved.",
            from, orphan, reason, orphan
        ),
        other => other.to_string(),
    }
}
