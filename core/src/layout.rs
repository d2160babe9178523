//! Keyboard layouts keyed by mode.
//!
//! A layout is a rectangular grid of symbol strings; an empty string is a
//! blank cell. The registry is built once and then only read, so it is
//! shared between editors behind an `Arc`.
//!
//! JSON form (mode keys are decimal):
//!
//! ```json
//! { "0": { "keys": [["a", "b"], ["c", ""]] } }
//! ```

use crate::error::{EditorError, LayoutError};
use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A rectangular grid of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    keys: Vec<Vec<String>>,
}

impl Layout {
    /// Build a layout from fixed-width rows.
    pub fn from_rows<const COLS: usize>(rows: &[[&str; COLS]]) -> Self {
        Self {
            keys: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    fn validate(&self, mode: u8) -> Result<(), LayoutError> {
        let expected = match self.keys.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(LayoutError::Empty(mode)),
        };
        for (row, cells) in self.keys.iter().enumerate() {
            if cells.len() != expected {
                return Err(LayoutError::Ragged {
                    mode,
                    row,
                    found: cells.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.keys
    }

    pub fn row_count(&self) -> usize {
        self.keys.len()
    }

    pub fn col_count(&self) -> usize {
        self.keys.first().map_or(0, Vec::len)
    }

    /// Cell content, `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.keys.get(row)?.get(col).map(String::as_str)
    }
}

/// Read-only mapping from mode to layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutRegistry {
    layouts: BTreeMap<u8, Layout>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the layout for `mode`.
    pub fn insert(&mut self, mode: Mode, layout: Layout) -> Result<(), LayoutError> {
        layout.validate(mode.bits())?;
        self.layouts.insert(mode.bits(), layout);
        Ok(())
    }

    /// Parse and validate a JSON layout set.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let raw: BTreeMap<u16, Layout> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for (bits, layout) in raw {
            let mode = u8::try_from(bits)
                .ok()
                .and_then(Mode::new)
                .ok_or(LayoutError::ModeOutOfRange(bits))?;
            registry.insert(mode, layout)?;
        }
        Ok(registry)
    }

    /// Load a JSON layout set from a file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(&self.layouts)?)
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.layouts.contains_key(&mode.bits())
    }

    pub fn get(&self, mode: Mode) -> Option<&Layout> {
        self.layouts.get(&mode.bits())
    }

    /// Layout for `mode`, failing loudly when none is registered.
    pub fn layout(&self, mode: Mode) -> Result<&Layout, EditorError> {
        self.get(mode).ok_or(EditorError::UnknownMode(mode.bits()))
    }

    /// Symbol at `(row, col)` in the layout for `mode`.
    pub fn symbol_at(&self, mode: Mode, row: usize, col: usize) -> Result<&str, EditorError> {
        self.layout(mode)?
            .get(row, col)
            .ok_or(EditorError::CellOutOfRange {
                mode: mode.bits(),
                row,
                col,
            })
    }

    /// Registered modes in ascending order.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.layouts.keys().filter_map(|&bits| Mode::new(bits))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
