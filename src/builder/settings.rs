//! Tunables for a workflow node.

use super::error::BuildError;
use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TRANSITION_DEPTH: usize = 64;

/// Per-node settings, deserializable from JSON with every field optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Maximum number of nested `go_to_state` calls in progress on one node
    pub max_transition_depth: usize,
    /// Number of transition records each node retains
    pub history_limit: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_transition_depth: DEFAULT_MAX_TRANSITION_DEPTH,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl WorkflowSettings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| BuildError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_transition_depth == 0 {
            return Err(BuildError::InvalidSettings(
                "max_transition_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
