//! Terminal progress bar.
//!
//! Thin wrapper over `indicatif` implementing the core's
//! [`ProgressSink`], so the engine stays ignorant of terminals.

use indicatif::{ProgressBar as Bar, ProgressStyle};

use crate::error::Result;
use crate::types::ProgressSink;

const TEMPLATE: &str = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Byte-count progress bar for one file operation.
pub struct ProgressBar {
    bar: Bar,
}

impl ProgressBar {
    /// Creates a bar expecting `total` bytes, labelled with `message`.
    #[must_use]
    pub fn new(total: u64, message: &'static str) -> Self {
        let bar = Bar::new(total);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message);
        Self { bar }
    }

    /// Completes the bar, leaving it at 100%.
    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl ProgressSink for ProgressBar {
    #[inline]
    fn add(&self, delta: u64) -> Result<()> {
        self.bar.inc(delta);
        Ok(())
    }
}
