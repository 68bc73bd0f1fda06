//! Progress display for dependency checking
//!
//! Provides visual feedback while registry fetches are in flight, using
//! indicatif. The bar is internally reference-counted, so a clone can be
//! ticked from any resolution task.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter shared across resolution tasks
#[derive(Clone)]
pub struct Progress {
    /// Current progress bar, absent in quiet mode
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Start a progress bar for a known number of dependencies
    pub fn start(total: u64, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] {pos}/{len}  {msg}")
                .expect("Invalid template")
                .progress_chars("**-"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self { bar: None }
    }

    /// Record one checked dependency
    pub fn tick(&self, name: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("-> {}", name.cyan()));
            bar.inc(1);
        }
    }

    /// Finish with a closing message
    pub fn finish(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
            bar.finish();
        }
    }
}
