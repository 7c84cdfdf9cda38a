use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Progress readout and cancellation switch for a running load
///
/// Shared through `Arc` between the parsing thread and any observer. The
/// parser is the only writer of the row counters; the cancellation flag may
/// be set from any thread and is observed before every open or close tag.
#[derive(Debug, Default)]
pub struct LoadProgress {
    parsed_rows: AtomicUsize,
    total_rows: AtomicUsize,
    canceled: AtomicBool,
}

impl LoadProgress {
    /// Fresh tracker with no rows parsed
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of declared rows parsed so far
    ///
    /// Zero until the total row count has been read from the document.
    pub fn progress(&self) -> f64 {
        let total = self.total_rows.load(Ordering::Acquire);
        if total == 0 {
            return 0.0;
        }
        self.parsed_rows.load(Ordering::Acquire) as f64 / total as f64
    }

    /// Rows appended to the peak list so far
    pub fn parsed_rows(&self) -> usize {
        self.parsed_rows.load(Ordering::Acquire)
    }

    /// Total row count declared by the document, zero if not yet seen
    pub fn total_rows(&self) -> usize {
        self.total_rows.load(Ordering::Acquire)
    }

    /// Request that loading stop at the next tag
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Zero the row counters, leaving any cancellation request in place
    pub(crate) fn reset_rows(&self) {
        self.parsed_rows.store(0, Ordering::Release);
        self.total_rows.store(0, Ordering::Release);
    }

    pub(crate) fn set_total_rows(&self, total: usize) {
        self.total_rows.store(total, Ordering::Release);
    }

    /// Count one appended row, returning the new count
    pub(crate) fn record_row(&self) -> usize {
        self.parsed_rows.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_progress_unknown_total() {
        let progress = LoadProgress::new();
        progress.record_row();
        assert_eq!(progress.progress(), 0.0);
    }

    #[test]
    fn test_progress_ratio() {
        let progress = LoadProgress::new();
        progress.set_total_rows(4);
        progress.record_row();
        assert_eq!(progress.progress(), 0.25);
        assert_eq!(progress.record_row(), 2);
        assert_eq!(progress.progress(), 0.5);
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let progress = Arc::new(LoadProgress::new());
        assert!(!progress.is_canceled());

        let handle = {
            let progress = Arc::clone(&progress);
            thread::spawn(move || progress.cancel())
        };
        handle.join().unwrap();

        assert!(progress.is_canceled());
    }

    #[test]
    fn test_reset_rows_keeps_cancel() {
        let progress = LoadProgress::new();
        progress.set_total_rows(2);
        progress.record_row();
        progress.cancel();

        progress.reset_rows();
        assert_eq!(progress.parsed_rows(), 0);
        assert_eq!(progress.total_rows(), 0);
        assert!(progress.is_canceled());
    }
}
