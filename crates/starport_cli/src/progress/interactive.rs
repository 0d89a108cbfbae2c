use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use starport::StarsProgress;

/// Bars for the current run.
#[derive(Default)]
struct ProgressState {
    /// Page fetching; a spinner until the last page is known.
    fetch_bar: Option<ProgressBar>,
    /// Serialization and write.
    export_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub fn handle(&self, event: StarsProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            StarsProgress::FetchingPages { subject, .. } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", subject));
                pb.set_message("Fetching starred repositories...");
                state.fetch_bar = Some(pb);
            }

            StarsProgress::FetchedPage {
                page,
                total_so_far,
                last_page,
                ..
            } => {
                if let Some(pb) = &state.fetch_bar {
                    if let Some(last) = last_page
                        && pb.length().is_none()
                    {
                        pb.set_length(u64::from(last));
                        pb.set_style(Self::bar_style());
                    }
                    pb.set_position(u64::from(page));
                    pb.set_message(format!("{} repos", total_so_far));
                }
            }

            StarsProgress::Truncated {
                pages_fetched,
                page_cap,
            } => {
                if let Some(pb) = &state.fetch_bar {
                    pb.println(format!(
                        "Warning: stopped after {} pages (cap {}); results are incomplete",
                        pages_fetched, page_cap
                    ));
                }
            }

            StarsProgress::FetchComplete { total, pages } => {
                if let Some(pb) = state.fetch_bar.take() {
                    pb.set_style(Self::done_style());
                    pb.finish_with_message(format!("{} repos from {} pages", total, pages));
                }
            }

            StarsProgress::Serializing { format, count } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "export"));
                pb.set_message(format!("Writing {} repos as {}...", count, format));
                state.export_bar = Some(pb);
            }

            StarsProgress::Persisted { location, bytes } => {
                if let Some(pb) = state.export_bar.take() {
                    pb.set_style(Self::done_style());
                    pb.finish_with_message(format!("{} ({} bytes)", location, bytes));
                }
            }

            _ => {}
        }
    }

    /// Finish any bars still running.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for pb in [state.fetch_bar.take(), state.export_bar.take()]
            .into_iter()
            .flatten()
        {
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn done_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {msg:.green}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
