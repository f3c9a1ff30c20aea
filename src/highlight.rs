/*!
 * Deferred clearing of highlighted cells.
 *
 * After a run writes cells, the highlight may be scheduled to disappear
 * again after a delay. At most one clear job is pending at any time:
 * scheduling a new one aborts the previous one first.
 */

use log::{debug, error, info};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::errors::SheetError;
use crate::sheet::{Rgb, SharedSheet, SheetStore};

/// Reset the background of every cell colored exactly `color`
///
/// Returns the number of cells reset.
pub fn clear_highlight<S: SheetStore + ?Sized>(sheet: &mut S, color: Rgb) -> Result<usize, SheetError> {
    let (rows, columns) = sheet.dimensions();
    let mut cleared = 0;
    for row in 0..rows {
        for column in 0..columns {
            if sheet.background(row, column)? == Some(color) {
                sheet.set_background(row, column, None)?;
                cleared += 1;
            }
        }
    }
    if cleared > 0 {
        sheet.flush()?;
    }
    Ok(cleared)
}

fn run_clear<S: SheetStore>(sheet: &SharedSheet<S>, color: Rgb) {
    let mut guard = sheet.lock();
    match clear_highlight(&mut *guard, color) {
        Ok(cleared) => info!("Cleared highlight {} from {} cell(s)", color, cleared),
        Err(e) => error!("Failed to clear highlight {}: {}", color, e),
    }
}

/// Single slot holding the pending clear job
#[derive(Debug, Default)]
pub struct ClearSlot {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ClearSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a clear of `color` after `delay`, replacing any pending job
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<S>(&self, sheet: SharedSheet<S>, color: Rgb, delay: Duration)
    where
        S: SheetStore + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                debug!("Replacing pending highlight clear");
            }
            previous.abort();
        }

        info!("Highlight {} will be cleared in {:?}", color, delay);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            run_clear(&sheet, color);
        }));
    }

    /// Abort the pending job; returns whether one was still waiting
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether a job is scheduled and has not run yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait until the pending job, if any, has run
    pub async fn wait(&self) {
        let handle = self.pending.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Highlight clear task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for ClearSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
