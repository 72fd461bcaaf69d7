//! Run labels used to identify an invocation in logs and sinks.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Human-readable identifier for one run, rendered as `name/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunLabel {
    name: String,
    id: String,
}

impl RunLabel {
    /// Create a label from an operation name and an id for logging.
    pub fn new(name: impl Into<String>, id_for_logging: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id_for_logging.into(),
        }
    }

    /// Create a label with a random id, for callers that have none.
    pub fn generate(name: impl Into<String>) -> Self {
        Self::new(name, Uuid::new_v4().to_string())
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance id used for logging.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.id)
    }
}
