//! The user-configured binding table and its persistence.
//!
//! A binding maps a canonical combo string to either a guarded action index
//! or a UI-navigation event. The table is loaded once at startup and only
//! ever replaced wholesale — never merged — so a runtime update cannot leave
//! a half-old, half-new table behind.

use crate::error::{PadgateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// What a combo is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    /// Run the guarded-execution contract against this action index.
    Exec { index: usize },
    /// Dispatch a UI-navigation event; never touches the Action Gateway.
    UiAction { event: String },
}

/// Combo-string-keyed binding table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingTable {
    entries: HashMap<String, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, combo: impl Into<String>, binding: Binding) {
        self.entries.insert(combo.into(), binding);
    }

    pub fn get(&self, combo: &str) -> Option<&Binding> {
        self.entries.get(combo)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a persisted table from JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| PadgateError::malformed_bindings(e.to_string()))
    }

    /// Read and parse a persisted table.
    pub fn try_load(path: &Path) -> Result<Self> {
        let data =
            std::fs::read_to_string(path).map_err(|source| PadgateError::BindingFileUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&data)
    }

    /// Load a persisted table, falling back to an empty one when the file is
    /// missing, unreadable, or malformed. Corrupt user data must never take
    /// the input core down; the user just sees default (no) bindings.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => table,
            Err(err) => {
                log::warn!("{err}, starting with empty table");
                Self::new()
            }
        }
    }
}
