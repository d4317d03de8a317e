//! Progress spinner for the directory walk.

use indicatif::{ProgressBar, ProgressStyle};

use crate::scan::{EventSink, ScanEvent};

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{pos} files, {elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Forwards events to an inner sink while ticking a spinner.
///
/// The inner sink runs inside [`ProgressBar::suspend`] so its log lines do
/// not interleave with the spinner line.
pub struct SpinnerSink<S> {
    bar: ProgressBar,
    inner: S,
}

impl<S: EventSink> SpinnerSink<S> {
    pub fn new(bar: ProgressBar, inner: S) -> Self {
        Self { bar, inner }
    }

    pub fn finish(self) -> S {
        self.bar.finish_and_clear();
        self.inner
    }
}

impl<S: EventSink> EventSink for SpinnerSink<S> {
    fn emit(&mut self, event: &ScanEvent) {
        if is_terminal(event) {
            self.bar.inc(1);
        }
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.emit(event));
    }
}

/// Whether the event is the final decision for a file.
fn is_terminal(event: &ScanEvent) -> bool {
    !matches!(
        event,
        ScanEvent::TimestampFallback { .. } | ScanEvent::WalkError { .. }
    )
}
