use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a CSV import runs; hidden when stdout is not a terminal
pub struct ImportProgress {
    pb: ProgressBar,
}

impl ImportProgress {
    pub fn new(source: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({pos} rows)") {
            pb.set_style(style);
        }
        pb.set_message(format!("Importing {}", source));
        Self { pb }
    }

    pub fn row_imported(&self, line: u64) {
        self.pb.inc(1);
        self.pb.set_message(format!("Imported line {}", line));
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
