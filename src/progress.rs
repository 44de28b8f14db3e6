// src/progress.rs
/// Stage reporting for a run. The runner calls into this as sources are fetched
/// and charts rendered; frontends decide how (or whether) to show it.
pub trait Progress {
    /// Called at the start with the number of sources in the job.
    fn begin(&mut self, _total: usize) {}

    /// One source made it all the way to a file on disk.
    fn item_done(&mut self, _source: &str) {}

    /// One source was dropped from the run.
    fn item_failed(&mut self, _source: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Progress as `[n/total]` log lines.
#[derive(Default)]
pub struct LogProgress {
    total: usize,
    seen: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn item_done(&mut self, source: &str) {
        self.seen += 1;
        logf!("[{}/{}] {source}: ok", self.seen, self.total);
    }

    fn item_failed(&mut self, source: &str, reason: &str) {
        self.seen += 1;
        logf!("[{}/{}] {source}: skipped ({reason})", self.seen, self.total);
    }

    fn finish(&mut self) {
        logd!("progress: {}/{} sources handled", self.seen, self.total);
    }
}
