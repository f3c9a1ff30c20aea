use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SheetError;

use super::{MemorySheet, Rgb, SheetStore};

/// On-disk layout of a sheet document
#[derive(Debug, Default, Serialize, Deserialize)]
struct SheetDocument {
    /// Header row followed by data rows
    rows: Vec<Vec<Value>>,
    /// Notes keyed by "row:column"
    #[serde(default)]
    notes: BTreeMap<String, String>,
    /// Background colors (`#rrggbb`) keyed by "row:column"
    #[serde(default)]
    backgrounds: BTreeMap<String, String>,
}

/// Render a JSON cell as the text a spreadsheet would show
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn cell_key(row: usize, column: usize) -> String {
    format!("{}:{}", row, column)
}

fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    let (row, column) = key.split_once(':')?;
    Some((row.trim().parse().ok()?, column.trim().parse().ok()?))
}

/// Sheet persisted as a JSON document, written back on `flush`
#[derive(Debug)]
pub struct JsonFileSheet {
    path: PathBuf,
    inner: MemorySheet,
    /// Cells as loaded, so untouched numbers and booleans keep their type
    loaded: Vec<Vec<Value>>,
    dirty: bool,
}

impl JsonFileSheet {
    /// Open a sheet document
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let document: SheetDocument = serde_json::from_str(&content)?;

        let mut inner = MemorySheet::from_rows(
            document
                .rows
                .iter()
                .map(|row| row.iter().map(display_value).collect::<Vec<_>>()),
        );
        for (key, note) in &document.notes {
            match parse_cell_key(key) {
                Some((row, column)) => inner.restore_note(row, column, note.clone()),
                None => warn!("Ignoring note with invalid cell key '{}'", key),
            }
        }
        for (key, hex) in &document.backgrounds {
            match (parse_cell_key(key), Rgb::from_hex(hex)) {
                (Some((row, column)), Some(color)) => inner.restore_background(row, column, color),
                _ => warn!("Ignoring background '{}' at cell key '{}'", hex, key),
            }
        }

        debug!("Opened sheet {:?} with {} rows", path, inner.dimensions().0);
        Ok(Self {
            path,
            inner,
            loaded: document.rows,
            dirty: false,
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cell_value(&self, row: usize, column: usize, text: String) -> Value {
        match self.loaded.get(row).and_then(|cells| cells.get(column)) {
            Some(original) if display_value(original) == text => original.clone(),
            _ => Value::String(text),
        }
    }

    fn to_document(&self) -> SheetDocument {
        SheetDocument {
            rows: self
                .inner
                .values()
                .into_iter()
                .enumerate()
                .map(|(row, cells)| {
                    cells
                        .into_iter()
                        .enumerate()
                        .map(|(column, text)| self.cell_value(row, column, text))
                        .collect()
                })
                .collect(),
            notes: self
                .inner
                .notes()
                .iter()
                .map(|(&(row, column), note)| (cell_key(row, column), note.clone()))
                .collect(),
            backgrounds: self
                .inner
                .backgrounds()
                .iter()
                .map(|(&(row, column), color)| (cell_key(row, column), color.to_hex()))
                .collect(),
        }
    }
}

impl SheetStore for JsonFileSheet {
    fn values(&self) -> Vec<Vec<String>> {
        self.inner.values()
    }

    fn dimensions(&self) -> (usize, usize) {
        self.inner.dimensions()
    }

    fn get_value(&self, row: usize, column: usize) -> Result<String, SheetError> {
        self.inner.get_value(row, column)
    }

    fn set_value(&mut self, row: usize, column: usize, value: &str) -> Result<(), SheetError> {
        self.inner.set_value(row, column, value)?;
        self.dirty = true;
        Ok(())
    }

    fn note(&self, row: usize, column: usize) -> Result<Option<String>, SheetError> {
        self.inner.note(row, column)
    }

    fn set_note(&mut self, row: usize, column: usize, note: &str) -> Result<(), SheetError> {
        self.inner.set_note(row, column, note)?;
        // Notes explain an aborted run; persist them right away
        self.dirty = true;
        self.flush()
    }

    fn background(&self, row: usize, column: usize) -> Result<Option<Rgb>, SheetError> {
        self.inner.background(row, column)
    }

    fn set_background(&mut self, row: usize, column: usize, color: Option<Rgb>) -> Result<(), SheetError> {
        self.inner.set_background(row, column, color)?;
        self.dirty = true;
        Ok(())
    }

    fn show_status(&mut self, title: &str, message: &str) {
        self.inner.show_status(title, message);
    }

    fn flush(&mut self) -> Result<(), SheetError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(&self.path, json)?;
        self.dirty = false;
        debug!("Saved sheet {:?}", self.path);
        Ok(())
    }
}
