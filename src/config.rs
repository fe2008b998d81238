use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LogicalOp;

/// Default limit on parenthesis and `NOT` nesting in rule text.
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Largest accepted `max_tree_depth`. A tree this deep, wrapped in a request
/// body, stays under the 128-level nesting limit `serde_json` applies when
/// reading text, and keeps every recursive walk over it shallow.
pub const MAX_TREE_DEPTH_LIMIT: usize = 120;

/// Default limit on tree depth for parsed, combined and decoded trees.
pub const DEFAULT_MAX_TREE_DEPTH: usize = MAX_TREE_DEPTH_LIMIT;

/// Errors produced while loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to decode configuration: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Tunables shared by the parser, combiner and transport decoder.
///
/// Every field has a default, so a partial JSON document such as
/// `{"max_nesting": 32}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Connective used by [`combine_with_config`](crate::combine_with_config)
    /// and by the `combine_rules` boundary handler when a request names none.
    pub default_operator: LogicalOp,
    /// Maximum nesting of parentheses and `NOT` in rule text.
    pub max_nesting: usize,
    /// Maximum depth of any tree the parser, the combiner or
    /// [`from_transport_with`](crate::from_transport_with) produces. A leaf is
    /// one level. Chained `AND`/`OR` and combined rules deepen the tree without
    /// any nesting in the source text, so `a AND b AND c` is three levels deep.
    pub max_tree_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_operator: LogicalOp::Or,
            max_nesting: DEFAULT_MAX_NESTING,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document does not decode or fails validation.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O, decode, or validation failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either limit is zero, or if
    /// `max_tree_depth` is above [`MAX_TREE_DEPTH_LIMIT`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting == 0 {
            return Err(ConfigError::Invalid("max_nesting must be at least 1".into()));
        }
        if self.max_tree_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_tree_depth must be at least 1".into(),
            ));
        }
        if self.max_tree_depth > MAX_TREE_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_tree_depth must be at most {MAX_TREE_DEPTH_LIMIT}, got {}",
                self.max_tree_depth
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_default_operator(mut self, op: LogicalOp) -> Self {
        self.default_operator = op;
        self
    }

    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    #[must_use]
    pub fn with_max_tree_depth(mut self, max_tree_depth: usize) -> Self {
        self.max_tree_depth = max_tree_depth;
        self
    }
}
