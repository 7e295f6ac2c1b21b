//! Context parameters - where and how much conversation history is kept.

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default number of turns sent to the model.
pub const DEFAULT_MAX_WINDOW: usize = 10;

/// Default snapshot directory, relative to the working directory.
pub const DEFAULT_STORE_DIR: &str = "data/contexts";

/// History settings injected into [`AgentManager`](crate::use_cases::agent_manager::AgentManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextParams {
    /// Directory snapshots are written to.
    pub store_dir: PathBuf,
    /// Number of most recent turns sent with each prompt.
    pub max_window: NonZeroUsize,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            max_window: NonZeroUsize::new(DEFAULT_MAX_WINDOW).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl ContextParams {
    // ==================== Builder Methods ====================

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    pub fn with_max_window(mut self, max_window: NonZeroUsize) -> Self {
        self.max_window = max_window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ContextParams::default();
        assert_eq!(params.store_dir, PathBuf::from("data/contexts"));
        assert_eq!(params.max_window.get(), 10);
    }

    #[test]
    fn test_builder_methods() {
        let params = ContextParams::default()
            .with_store_dir("/tmp/ctx")
            .with_max_window(NonZeroUsize::new(3).unwrap());
        assert_eq!(params.store_dir, PathBuf::from("/tmp/ctx"));
        assert_eq!(params.max_window.get(), 3);
    }
}
