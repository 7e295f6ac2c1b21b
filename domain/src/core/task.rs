//! Task value object

use serde::{Deserialize, Serialize};

/// The job a model or agent specialises in (Value Object)
///
/// `short_backstory` is what ends up in the agent's system prompt; the
/// long `backstory` is only used when generating training data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub backstory: String,
    pub short_backstory: String,
    pub role: String,
    pub goal: String,
}

impl Task {
    pub fn new(
        backstory: impl Into<String>,
        short_backstory: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
    ) -> Self {
        Self {
            backstory: backstory.into(),
            short_backstory: short_backstory.into(),
            role: role.into(),
            goal: goal.into(),
        }
    }
}
