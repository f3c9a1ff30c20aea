use log::info;
use std::collections::HashMap;

use crate::errors::SheetError;

use super::{Rgb, SheetStore};

/// In-memory grid of text cells
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    rows: Vec<Vec<String>>,
    width: usize,
    notes: HashMap<(usize, usize), String>,
    backgrounds: HashMap<(usize, usize), Rgb>,
    statuses: Vec<String>,
}

impl MemorySheet {
    /// Create a sheet from rows of cell values (header first)
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            rows,
            width,
            ..Default::default()
        }
    }

    /// Status messages shown so far, formatted as `title: message`
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Every note, keyed by (row, column)
    pub fn notes(&self) -> &HashMap<(usize, usize), String> {
        &self.notes
    }

    /// Every colored cell, keyed by (row, column)
    pub fn backgrounds(&self) -> &HashMap<(usize, usize), Rgb> {
        &self.backgrounds
    }

    pub(crate) fn restore_note(&mut self, row: usize, column: usize, note: String) {
        self.notes.insert((row, column), note);
    }

    pub(crate) fn restore_background(&mut self, row: usize, column: usize, color: Rgb) {
        self.backgrounds.insert((row, column), color);
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<(), SheetError> {
        if row >= self.rows.len() || column >= self.width {
            return Err(SheetError::OutOfBounds { row, column });
        }
        Ok(())
    }
}

impl SheetStore for MemorySheet {
    fn values(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(self.width, String::new());
                padded
            })
            .collect()
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.width)
    }

    fn get_value(&self, row: usize, column: usize) -> Result<String, SheetError> {
        self.check_bounds(row, column)?;
        Ok(self.rows[row].get(column).cloned().unwrap_or_default())
    }

    fn set_value(&mut self, row: usize, column: usize, value: &str) -> Result<(), SheetError> {
        self.check_bounds(row, column)?;
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
        Ok(())
    }

    fn note(&self, row: usize, column: usize) -> Result<Option<String>, SheetError> {
        self.check_bounds(row, column)?;
        Ok(self.notes.get(&(row, column)).cloned())
    }

    fn set_note(&mut self, row: usize, column: usize, note: &str) -> Result<(), SheetError> {
        self.check_bounds(row, column)?;
        self.notes.insert((row, column), note.to_string());
        Ok(())
    }

    fn background(&self, row: usize, column: usize) -> Result<Option<Rgb>, SheetError> {
        self.check_bounds(row, column)?;
        Ok(self.backgrounds.get(&(row, column)).copied())
    }

    fn set_background(&mut self, row: usize, column: usize, color: Option<Rgb>) -> Result<(), SheetError> {
        self.check_bounds(row, column)?;
        match color {
            Some(color) => self.backgrounds.insert((row, column), color),
            None => self.backgrounds.remove(&(row, column)),
        };
        Ok(())
    }

    fn show_status(&mut self, title: &str, message: &str) {
        info!("{}: {}", title, message);
        self.statuses.push(format!("{}: {}", title, message));
    }
}
