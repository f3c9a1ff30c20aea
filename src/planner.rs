/*!
 * Request planning.
 *
 * Scans the sheet once, works out which target cells are empty for every row
 * and turns each row that needs work into a `TranslationRequest`. The
 * `RequestIndex` built alongside remembers exactly what was asked for each
 * label; validation and write-back consult it instead of the sheet.
 */

use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::errors::{LocalizationError, LocalizationResult};
use crate::language_utils;
use crate::sheet::{self, SheetStore};

/// Positions of the mandatory header columns
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderIndex {
    pub label: usize,
    pub description: usize,
    pub meta: usize,
    pub source: usize,
}

impl HeaderIndex {
    /// Locate the mandatory columns, matched case-insensitively
    pub fn from_header(header: &[String], source_column: &str) -> LocalizationResult<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| {
                    LocalizationError::SheetStructure(format!(
                        "header is missing the required column \"{}\"",
                        name.trim()
                    ))
                })
        };

        Ok(Self {
            label: find("label")?,
            description: find("description")?,
            meta: find("meta")?,
            source: find(source_column)?,
        })
    }
}

/// A target column and the normalized language code it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageColumn {
    pub code: String,
    pub column: usize,
}

/// Find the language columns after the source column
pub fn detect_language_columns(header: &[String], source: usize) -> LocalizationResult<Vec<LanguageColumn>> {
    let mut columns: Vec<LanguageColumn> = Vec::new();

    for (column, raw) in header.iter().enumerate().skip(source + 1) {
        let raw = raw.trim();
        if raw.is_empty() || !language_utils::is_language_code(raw) {
            continue;
        }

        let code = language_utils::normalize_language_code(raw);
        if let Some(existing) = columns.iter().find(|c| c.code == code) {
            return Err(LocalizationError::SheetStructure(format!(
                "columns {} and {} both hold language \"{}\"",
                existing.column + 1,
                column + 1,
                code
            )));
        }
        match language_utils::language_name(&code) {
            Some(name) => debug!("Column {} holds {} ({})", column + 1, code, name),
            None => warn!("Column {} header '{}' is not a known ISO language code", column + 1, raw),
        }
        columns.push(LanguageColumn { code, column });
    }

    if columns.is_empty() {
        return Err(LocalizationError::SheetStructure(
            "no language columns found after the source text column".to_string(),
        ));
    }

    Ok(columns)
}

/// Header layout of the sheet, derived once per run
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub header: HeaderIndex,
    pub languages: Vec<LanguageColumn>,
}

impl SheetLayout {
    pub fn from_header(header: &[String], source_column: &str) -> LocalizationResult<Self> {
        let header_index = HeaderIndex::from_header(header, source_column)?;
        let languages = detect_language_columns(header, header_index.source)?;
        Ok(Self {
            header: header_index,
            languages,
        })
    }
}

/// One data row of the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub source_text: String,
    pub description: String,
    pub meta: Option<Value>,
    /// 1-based row number as shown to users
    pub ui_position: usize,
}

/// What gets sent to the API for one row
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub label: String,
    pub source_text: String,
    pub description: String,
    pub meta: Option<Value>,
    /// Codes of the empty target cells, in header order
    pub languages: Vec<String>,
}

/// Bookkeeping for one requested row
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub ui_position: usize,
    pub requested_languages: Vec<String>,
    pub targets: Vec<LanguageColumn>,
}

impl IndexEntry {
    /// 0-based sheet row
    pub fn row(&self) -> usize {
        self.ui_position - 1
    }

    /// Target column for a requested language
    pub fn column_for(&self, code: &str) -> Option<usize> {
        self.targets.iter().find(|t| t.code == code).map(|t| t.column)
    }
}

/// Label-keyed record of what this run asked for, in planning order
#[derive(Debug, Clone, Default)]
pub struct RequestIndex {
    order: Vec<String>,
    entries: HashMap<String, IndexEntry>,
}

impl RequestIndex {
    fn insert(&mut self, label: String, entry: IndexEntry) {
        self.order.push(label.clone());
        self.entries.insert(label, entry);
    }

    pub fn get(&self, label: &str) -> Option<&IndexEntry> {
        self.entries.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Entries in the order their rows were planned
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.order
            .iter()
            .filter_map(|label| self.entries.get(label).map(|entry| (label.as_str(), entry)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Output of the planner
#[derive(Debug, Clone)]
pub struct Plan {
    pub layout: SheetLayout,
    pub requests: Vec<TranslationRequest>,
    pub index: RequestIndex,
    /// Data rows that had a label and source text
    pub rows_considered: usize,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Number of target cells requested across all rows
    pub fn requested_cells(&self) -> usize {
        self.requests.iter().map(|r| r.languages.len()).sum()
    }
}

fn cell(row: &[String], column: usize) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_meta<S: SheetStore + ?Sized>(
    sheet: &mut S,
    raw: &str,
    row_index: usize,
    meta_column: usize,
) -> LocalizationResult<Option<Value>> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw).map(Some).map_err(|e| {
        sheet::annotate(sheet, row_index, meta_column, "meta: invalid JSON");
        LocalizationError::MetaParse {
            row: row_index + 1,
            message: e.to_string(),
        }
    })
}

/// Build the requests for every row that has empty target cells
pub fn plan<S: SheetStore + ?Sized>(sheet: &mut S, source_column: &str) -> LocalizationResult<Plan> {
    let values = sheet.values();
    if values.len() < 2 {
        return Err(LocalizationError::SheetStructure(
            "sheet is empty or has no data rows".to_string(),
        ));
    }

    let layout = SheetLayout::from_header(&values[0], source_column)?;
    let header = &layout.header;
    debug!(
        "Detected {} language column(s): {}",
        layout.languages.len(),
        layout.languages.iter().map(|l| l.code.as_str()).collect::<Vec<_>>().join(", ")
    );

    let mut requests = Vec::new();
    let mut index = RequestIndex::default();
    let mut seen_labels: HashSet<String> = HashSet::new();
    let mut rows_considered = 0;

    for (row_index, cells) in values.iter().enumerate().skip(1) {
        let label = cell(cells, header.label);
        let source_text = cell(cells, header.source);
        if label.is_empty() || source_text.is_empty() {
            continue;
        }

        let meta = parse_meta(sheet, &cell(cells, header.meta), row_index, header.meta)?;
        let row = Row {
            description: cell(cells, header.description),
            ui_position: row_index + 1,
            label,
            source_text,
            meta,
        };

        if !seen_labels.insert(row.label.clone()) {
            sheet::annotate(
                sheet,
                row_index,
                header.label,
                &format!("Duplicate label: \"{}\". Make it unique.", row.label),
            );
            return Err(LocalizationError::DuplicateLabel {
                label: row.label,
                row: row.ui_position,
            });
        }
        rows_considered += 1;

        let targets: Vec<LanguageColumn> = layout
            .languages
            .iter()
            .filter(|language| sheet::is_blank(&cell(cells, language.column)))
            .cloned()
            .collect();
        if targets.is_empty() {
            continue;
        }

        let languages: Vec<String> = targets.iter().map(|t| t.code.clone()).collect();
        index.insert(
            row.label.clone(),
            IndexEntry {
                ui_position: row.ui_position,
                requested_languages: languages.clone(),
                targets,
            },
        );
        requests.push(TranslationRequest {
            label: row.label,
            source_text: row.source_text,
            description: row.description,
            meta: row.meta,
            languages,
        });
    }

    info!(
        "Planned {} request(s) for {} cell(s) out of {} row(s)",
        requests.len(),
        requests.iter().map(|r| r.languages.len()).sum::<usize>(),
        rows_considered
    );

    Ok(Plan {
        layout,
        requests,
        index,
        rows_considered,
    })
}
