/*!
 * Write-back of validated translations.
 *
 * Every target cell is read again right before it is written and only filled
 * when it is still blank, so edits made while a run is in flight are never
 * overwritten. Written cells can be tinted with the highlight color.
 */

use log::{debug, warn};

use crate::errors::LocalizationResult;
use crate::planner::RequestIndex;
use crate::sheet::{self, Rgb, SheetStore};
use crate::validation::NormalizedResult;

/// Counters of one write-back pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    /// Cells filled with a translation
    pub cells_written: usize,
    /// Cells left alone because they were no longer blank
    pub cells_skipped: usize,
}

impl WriteStats {
    pub fn absorb(&mut self, other: WriteStats) {
        self.cells_written += other.cells_written;
        self.cells_skipped += other.cells_skipped;
    }
}

/// Writes normalized results into still-empty target cells
#[derive(Debug, Clone, Copy)]
pub struct WriteBackEngine<'a> {
    index: &'a RequestIndex,
    highlight: Option<Rgb>,
}

impl<'a> WriteBackEngine<'a> {
    pub fn new(index: &'a RequestIndex, highlight: Option<Rgb>) -> Self {
        Self { index, highlight }
    }

    /// Write the results of one batch and flush the store
    pub fn write<S: SheetStore + ?Sized>(
        &self,
        sheet: &mut S,
        results: &[NormalizedResult],
    ) -> LocalizationResult<WriteStats> {
        let mut stats = WriteStats::default();

        for result in results {
            let Some(entry) = self.index.get(&result.label) else {
                warn!("No planned row for label \"{}\", skipping write", result.label);
                continue;
            };
            let row = entry.row();

            let columns: Vec<(usize, &str)> = entry
                .requested_languages
                .iter()
                .filter_map(|code| entry.column_for(code).map(|column| (column, code.as_str())))
                .collect();
            let (Some(first), Some(last)) = (
                columns.iter().map(|(c, _)| *c).min(),
                columns.iter().map(|(c, _)| *c).max(),
            ) else {
                continue;
            };

            // Fresh read of the row span right before writing
            let current = sheet.get_range(row, first, 1, last - first + 1)?;
            let current = current.into_iter().next().unwrap_or_default();

            for (column, code) in columns {
                let Some(text) = result.localization.get(code) else {
                    continue;
                };
                let existing = current.get(column - first).map(String::as_str).unwrap_or_default();
                if !sheet::is_blank(existing) {
                    debug!(
                        "R{}C{} ({}) was filled meanwhile, keeping its content",
                        row + 1,
                        column + 1,
                        code
                    );
                    stats.cells_skipped += 1;
                    continue;
                }

                sheet.set_value(row, column, text)?;
                if let Some(color) = self.highlight {
                    sheet.set_background(row, column, Some(color))?;
                }
                stats.cells_written += 1;
            }
        }

        sheet.flush()?;
        Ok(stats)
    }
}
