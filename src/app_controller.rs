use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::LocalizationResult;
use crate::highlight::{self, ClearSlot};
use crate::planner::{self, Plan};
use crate::providers::TranslationClient;
use crate::sheet::{Rgb, SharedSheet, SheetStore};
use crate::translation::{BatchPayload, BatchScheduler};
use crate::validation::ResponseValidator;
use crate::write_back::{WriteBackEngine, WriteStats};

// @module: Application controller for sheet localization runs

const STATUS_TITLE: &str = "Localization";

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Data rows with a label and source text
    pub rows_processed: usize,
    /// Rows sent to the API
    pub requests: usize,
    /// API calls made
    pub batches: usize,
    pub cells_written: usize,
    /// Cells filled by someone else while the run was in flight
    pub cells_skipped: usize,
    pub elapsed: Duration,
    /// Whether a deferred highlight clear was scheduled
    pub clear_scheduled: bool,
}

impl RunSummary {
    pub fn is_noop(&self) -> bool {
        self.requests == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row(s) processed, {} cell(s) written in {} batch(es), {}",
            self.rows_processed,
            self.cells_written,
            self.batches,
            Controller::format_duration(self.elapsed)
        )?;
        if self.cells_skipped > 0 {
            write!(f, ", {} cell(s) left untouched", self.cells_skipped)?;
        }
        Ok(())
    }
}

/// Drives a localization run over one sheet
pub struct Controller {
    // @field: App configuration
    config: Config,
    client: TranslationClient,
    highlight: Option<Rgb>,
    clear_slot: ClearSlot,
    show_progress: bool,
}

impl Controller {
    /// Create a controller whose client is built from the configuration
    pub fn with_config(config: Config) -> LocalizationResult<Self> {
        config.validate()?;
        let client = TranslationClient::from_config(&config)?;
        Self::from_parts(config, client)
    }

    /// Create a controller around an existing client
    pub fn with_client(config: Config, client: TranslationClient) -> LocalizationResult<Self> {
        config.validate()?;
        Self::from_parts(config, client)
    }

    fn from_parts(config: Config, client: TranslationClient) -> LocalizationResult<Self> {
        let highlight = config.highlight.rgb()?;
        Ok(Self {
            config,
            client,
            highlight,
            clear_slot: ClearSlot::new(),
            show_progress: false,
        })
    }

    /// Show an indicatif progress bar over the batches
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &TranslationClient {
        &self.client
    }

    /// Slot holding the pending highlight clear
    pub fn clear_slot(&self) -> &ClearSlot {
        &self.clear_slot
    }

    /// Plan the run without calling the API
    pub fn plan<S: SheetStore>(&self, sheet: &SharedSheet<S>) -> LocalizationResult<Plan> {
        let mut guard = sheet.lock();
        planner::plan(&mut *guard, &self.config.source_column)
    }

    /// Fill every empty translation cell of the sheet
    ///
    /// Batches run one after another. A failing batch aborts the run; cells
    /// written by earlier batches stay written and their highlight clear is
    /// still scheduled.
    pub async fn run<S>(&self, sheet: &SharedSheet<S>) -> LocalizationResult<RunSummary>
    where
        S: SheetStore + Send + 'static,
    {
        let start_time = Instant::now();
        let plan = self.plan(sheet)?;

        if plan.is_empty() {
            sheet
                .lock()
                .show_status(STATUS_TITLE, "Nothing to translate: every target cell is filled");
            return Ok(RunSummary {
                rows_processed: plan.rows_considered,
                elapsed: start_time.elapsed(),
                ..RunSummary::default()
            });
        }

        let scheduler = BatchScheduler::new(self.config.effective_batch_size());
        let batch_count = scheduler.batch_count(plan.requests.len());
        info!(
            "Translating {} row(s), {} cell(s) in {} batch(es) via {}",
            plan.requests.len(),
            plan.requested_cells(),
            batch_count,
            self.client.backend_name()
        );

        let progress_bar = self.progress_bar(batch_count as u64);
        let mut stats = WriteStats::default();

        for (batch_index, slice) in scheduler.batches(&plan.requests).enumerate() {
            let payload = BatchPayload::from_requests(slice, self.config.include_prompt);
            debug!(
                "Batch {}/{} labels: {}",
                batch_index + 1,
                batch_count,
                slice.iter().map(|r| r.label.as_str()).collect::<Vec<_>>().join(", ")
            );

            let outcome = match self.client.send(&payload).await {
                Ok(response) => self.apply_batch(sheet, &plan, &response, slice),
                Err(e) => Err(e.into()),
            };
            let written = match outcome {
                Ok(written) => written,
                Err(e) => {
                    progress_bar.abandon_with_message("failed");
                    // Earlier batches stay written and tinted
                    if self.schedule_clear(sheet, stats.cells_written) {
                        debug!("Highlight clear scheduled for {} cell(s) of the aborted run", stats.cells_written);
                    }
                    return Err(e);
                }
            };
            stats.absorb(written);

            let message = format!(
                "Batch {}/{}: {} cell(s) written",
                batch_index + 1,
                batch_count,
                written.cells_written
            );
            sheet.lock().show_status(STATUS_TITLE, &message);
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("done");

        let clear_scheduled = self.schedule_clear(sheet, stats.cells_written);
        let summary = RunSummary {
            rows_processed: plan.rows_considered,
            requests: plan.requests.len(),
            batches: batch_count,
            cells_written: stats.cells_written,
            cells_skipped: stats.cells_skipped,
            elapsed: start_time.elapsed(),
            clear_scheduled,
        };

        sheet
            .lock()
            .show_status(STATUS_TITLE, &format!("Done: {}", summary));
        Ok(summary)
    }

    /// Reset the configured highlight color right away
    pub fn clear_highlights<S: SheetStore>(&self, sheet: &SharedSheet<S>) -> LocalizationResult<usize> {
        let Some(color) = self.highlight else {
            info!("No highlight color configured, nothing to clear");
            return Ok(0);
        };
        self.clear_slot.cancel();
        let cleared = highlight::clear_highlight(&mut *sheet.lock(), color)?;
        info!("Cleared highlight {} from {} cell(s)", color, cleared);
        Ok(cleared)
    }

    /// Wait for the pending highlight clear, if any
    pub async fn wait_for_clear(&self) {
        if self.clear_slot.is_pending() {
            info!("Waiting for the highlight clear to run");
        }
        self.clear_slot.wait().await;
    }

    fn apply_batch<S: SheetStore>(
        &self,
        sheet: &SharedSheet<S>,
        plan: &Plan,
        response: &Value,
        slice: &[planner::TranslationRequest],
    ) -> LocalizationResult<WriteStats> {
        let mut guard = sheet.lock();
        let validator = ResponseValidator::new(&plan.index, plan.layout.header.label);
        let results = validator.validate(response, slice, &mut *guard)?;
        WriteBackEngine::new(&plan.index, self.highlight).write(&mut *guard, &results)
    }

    fn schedule_clear<S>(&self, sheet: &SharedSheet<S>, cells_written: usize) -> bool
    where
        S: SheetStore + Send + 'static,
    {
        let minutes = self.config.highlight.auto_clear_minutes;
        match self.highlight {
            Some(color) if cells_written > 0 && minutes > 0 => {
                self.clear_slot
                    .schedule(sheet.clone(), color, Duration::from_secs(minutes.saturating_mul(60)));
                true
            }
            _ => false,
        }
    }

    fn progress_bar(&self, batches: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(batches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Human readable duration
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
