/*!
 * Tabular store adapters.
 *
 * The pipeline only sees the `SheetStore` trait: a synchronous, row/column
 * addressable grid of text cells with notes, background colors and a
 * transient status line. Rows and columns are 0-based; row 0 is the header.
 *
 * - `memory`: in-process grid, used by tests and as the core of the file store
 * - `json_file`: grid persisted as a JSON document
 */

use log::warn;
use std::fmt;

use crate::errors::SheetError;

pub mod json_file;
pub mod memory;

pub use self::json_file::JsonFileSheet;
pub use self::memory::MemorySheet;

/// Shared handle to a store, reachable from the deferred highlight task
pub type SharedSheet<S> = std::sync::Arc<parking_lot::Mutex<S>>;

/// Wrap a store into a shared handle
pub fn shared<S: SheetStore>(sheet: S) -> SharedSheet<S> {
    std::sync::Arc::new(parking_lot::Mutex::new(sheet))
}

/// Background color of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse an "R,G,B" triple with components in 0..=255
    pub fn parse_triple(raw: &str) -> Option<Self> {
        let parts: Vec<u8> = raw
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::new(*r, *g, *b)),
            _ => None,
        }
    }

    /// Parse a `#rrggbb` hex color
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Operations the localization pipeline needs from a tabular store
pub trait SheetStore {
    /// Every row of the data range, each padded to the full width
    fn values(&self) -> Vec<Vec<String>>;

    /// Number of rows and columns of the data range
    fn dimensions(&self) -> (usize, usize);

    /// Current text of one cell
    fn get_value(&self, row: usize, column: usize) -> Result<String, SheetError>;

    /// Overwrite the text of one cell
    fn set_value(&mut self, row: usize, column: usize, value: &str) -> Result<(), SheetError>;

    /// Rectangular block of cell values
    fn get_range(
        &self,
        row: usize,
        column: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let mut block = Vec::with_capacity(num_rows);
        for r in row..row + num_rows {
            let mut line = Vec::with_capacity(num_columns);
            for c in column..column + num_columns {
                line.push(self.get_value(r, c)?);
            }
            block.push(line);
        }
        Ok(block)
    }

    /// Overwrite a rectangular block starting at `(row, column)`
    fn set_range(&mut self, row: usize, column: usize, values: &[Vec<String>]) -> Result<(), SheetError> {
        for (r, line) in values.iter().enumerate() {
            for (c, value) in line.iter().enumerate() {
                self.set_value(row + r, column + c, value)?;
            }
        }
        Ok(())
    }

    /// Note attached to a cell
    fn note(&self, row: usize, column: usize) -> Result<Option<String>, SheetError>;

    /// Attach a note to a cell, replacing any previous one
    fn set_note(&mut self, row: usize, column: usize, note: &str) -> Result<(), SheetError>;

    /// Background color of a cell
    fn background(&self, row: usize, column: usize) -> Result<Option<Rgb>, SheetError>;

    /// Set or reset (`None`) the background color of a cell
    fn set_background(&mut self, row: usize, column: usize, color: Option<Rgb>) -> Result<(), SheetError>;

    /// Show a transient status message to whoever watches the sheet
    fn show_status(&mut self, title: &str, message: &str);

    /// Persist pending changes
    fn flush(&mut self) -> Result<(), SheetError> {
        Ok(())
    }
}

/// Whether a cell value counts as empty
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Attach a diagnostic note, logging instead of failing when the store refuses it
pub fn annotate<S: SheetStore + ?Sized>(sheet: &mut S, row: usize, column: usize, message: &str) {
    if let Err(e) = sheet.set_note(row, column, message) {
        warn!("Could not attach note to R{}C{}: {}", row + 1, column + 1, e);
    }
}
