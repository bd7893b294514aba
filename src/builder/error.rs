//! Build errors for state nodes.

use crate::core::WorkflowError;
use thiserror::Error;

/// Errors that can occur when building a state node.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("State name is empty. Pass a non-empty name to StateNodeBuilder::new")]
    EmptyName,

    #[error("Invalid workflow settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to attach child state: {0}")]
    Child(#[from] WorkflowError),
}
