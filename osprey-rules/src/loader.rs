//! Rule file loading.
//!
//! Rules arrive as a JSON array of rule objects; see the crate-level types
//! for the logical shape. Loading is a startup-time concern: any malformed
//! file or invalid rule is fatal and reported with enough context to fix
//! the file.

use crate::Rule;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors produced while loading a rule file.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule specification: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule {name:?} has no conditions")]
    EmptyRule { name: String },
}

/// Loads rule sets from JSON sources.
pub struct RuleLoader;

impl RuleLoader {
    /// Loads and validates rules from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Vec<Rule>, RuleSetError> {
        let content = fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::load_from_str(&content)?;
        info!(path = %path.display(), count = rules.len(), "Loaded rule file");
        Ok(rules)
    }

    /// Loads and validates rules from a reader providing JSON content.
    pub fn load_from_reader(reader: &mut dyn Read) -> Result<Vec<Rule>, RuleSetError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| RuleSetError::Io {
                path: PathBuf::from("<reader>"),
                source,
            })?;
        Self::load_from_str(&content)
    }

    /// Loads and validates rules from a JSON string.
    pub fn load_from_str(json: &str) -> Result<Vec<Rule>, RuleSetError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        for rule in &rules {
            if rule.conditions.is_empty() {
                return Err(RuleSetError::EmptyRule {
                    name: rule.name.clone(),
                });
            }
            debug!(
                name = %rule.name,
                priority = rule.priority,
                conditions = rule.conditions.len(),
                "Parsed rule"
            );
        }
        Ok(rules)
    }
}
