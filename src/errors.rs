/*!
 * Error types for the sheet-localizer application.
 *
 * This module contains custom error types for the different stages of a
 * localization run, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the translation API
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection, timeout, TLS)
    #[error("API request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status
    #[error("API HTTP {status}: {excerpt}")]
    HttpError {
        /// HTTP status code
        status: u16,
        /// First characters of the response body
        excerpt: String,
    },

    /// The API answered with a body that is not JSON
    #[error("API returned a non-JSON response: {0}")]
    ParseError(String),
}

/// Errors raised by a tabular store adapter
#[derive(Error, Debug)]
pub enum SheetError {
    /// Reading or writing the backing file failed
    #[error("Sheet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be (de)serialized
    #[error("Sheet document error: {0}")]
    Document(#[from] serde_json::Error),

    /// A cell address outside the sheet was used
    #[error("Cell R{row}C{column} is outside the sheet")]
    OutOfBounds { row: usize, column: usize },
}

/// Run-aborting errors of the localization pipeline
#[derive(Error, Debug)]
pub enum LocalizationError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The sheet does not have the expected layout
    #[error("Sheet structure error: {0}")]
    SheetStructure(String),

    /// Two rows of the sheet share a label
    #[error("Duplicate label \"{label}\" (row {row})")]
    DuplicateLabel { label: String, row: usize },

    /// The meta cell of a row is not valid JSON
    #[error("Row {row}: meta is not valid JSON: {message}")]
    MetaParse { row: usize, message: String },

    /// The API call failed after every retry
    #[error("Translation API error: {0}")]
    Client(#[from] ClientError),

    /// The response lacks the `data` array
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Two response items share a label
    #[error("Response contains duplicate label \"{0}\"")]
    DuplicateLabelInResponse(String),

    /// A returned item has no `localization` object
    #[error("Label \"{0}\": missing \"localization\" object")]
    MissingLocalizationObject(String),

    /// A returned item lacks some of the requested languages
    #[error("Label \"{label}\": API did not return translations for: {}", missing.join(", "))]
    IncompleteTranslation { label: String, missing: Vec<String> },

    /// The tabular store failed
    #[error("Sheet error: {0}")]
    Store(#[from] SheetError),
}

impl LocalizationError {
    /// Whether the error was raised before any network call could happen
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::SheetStructure(_)
                | Self::DuplicateLabel { .. }
                | Self::MetaParse { .. }
        )
    }
}

/// Result alias used across the pipeline
pub type LocalizationResult<T> = Result<T, LocalizationError>;
