/*!
 * Translation request handling.
 *
 * This module contains everything between a planned request and the bytes
 * sent to the API:
 *
 * - `batch`: ordered slicing of requests into API calls
 * - `protocol`: wire types and lenient response body parsing
 * - `prompts`: optional per-item prompt construction
 */

// Re-export main types for easier usage
pub use self::batch::BatchScheduler;
pub use self::protocol::{BatchItem, BatchPayload};

// Submodules
pub mod batch;
pub mod prompts;
pub mod protocol;
