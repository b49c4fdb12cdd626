//! Conversation-state variable registry.

use crate::error::BuildError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A named slot in conversation state, declared at the document root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub variable_name: String,
    pub description: String,
    pub lang: String,
}

/// Tracks every variable referenced or produced by the graph.
///
/// Registration is first-wins and entries are never removed; callers that
/// need per-graph de-duplication of names must do it themselves before
/// registering.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    lang: String,
    entries: Vec<Variable>,
    index: AHashMap<String, usize>,
}

impl VariableRegistry {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Registers a variable. A no-op when the name is already present; the
    /// first description wins. A missing description defaults to the name.
    pub fn register(&mut self, name: &str, description: Option<&str>) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Variable {
            variable_name: name.to_string(),
            description: description.unwrap_or(name).to_string(),
            lang: self.lang.clone(),
        });
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All declarations in insertion order.
    pub fn all(&self) -> &[Variable] {
        &self.entries
    }

    /// Replaces the description of an already-registered variable.
    pub fn update_description(&mut self, name: &str, description: &str) -> Result<(), BuildError> {
        let slot = self.index.get(name).ok_or_else(|| BuildError::MissingVariable {
            name: name.to_string(),
        })?;
        self.entries[*slot].description = description.to_string();
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
