/*!
 * Batch scheduling.
 *
 * Requests are cut into contiguous slices of at most `batch_size` rows and
 * handed out strictly in planning order. Slices are never processed
 * concurrently: the next one is only taken once the previous one has been
 * sent, validated and written back.
 */

use crate::planner::TranslationRequest;

/// Rows per API request when nothing valid is configured
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Splits planned requests into ordered slices
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl BatchScheduler {
    /// Create a scheduler, falling back to the default size for 0
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: if batch_size == 0 { DEFAULT_BATCH_SIZE } else { batch_size },
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of slices needed for `request_count` requests
    pub fn batch_count(&self, request_count: usize) -> usize {
        request_count.div_ceil(self.batch_size)
    }

    /// Ordered slices of the request list
    pub fn batches<'a>(&self, requests: &'a [TranslationRequest]) -> impl Iterator<Item = &'a [TranslationRequest]> {
        requests.chunks(self.batch_size)
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
