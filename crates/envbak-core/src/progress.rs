//! Progress tracking helpers shared by the mirror and archive passes.
//!
//! - **`ProgressTracker`**: numbers entries and forwards lifecycle events
//! - **`ProgressReader`**: reader wrapper that reports bytes read in batches

use crate::ProgressCallback;
use std::io::Read;
use std::path::Path;

/// Forwards progress events with automatic entry numbering.
///
/// # Examples
///
/// ```
/// use envbak_core::NoopProgress;
/// use envbak_core::progress::ProgressTracker;
/// use std::path::Path;
///
/// let mut progress = NoopProgress;
/// let mut tracker = ProgressTracker::new(&mut progress, 2);
///
/// tracker.on_entry_start(Path::new("proj_bak/"));
/// tracker.on_entry_complete(Path::new("proj_bak/"));
/// assert_eq!(tracker.current(), 1);
/// ```
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for a pass of `total_entries` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Number of entries started so far.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current_entry
    }

    /// Reports that processing started for an entry.
    pub fn on_entry_start(&mut self, path: &Path) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(path, self.total_entries, self.current_entry);
    }

    /// Reports copied bytes directly.
    pub fn on_bytes_written(&mut self, bytes: u64) {
        self.progress.on_bytes_written(bytes);
    }

    /// Reports that processing completed for an entry.
    pub fn on_entry_complete(&mut self, path: &Path) {
        self.progress.on_entry_complete(path);
    }

    /// Reports that the whole pass completed.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Wraps `inner` so that bytes read are reported to this tracker's
    /// callback.
    pub fn reader<R: Read>(&mut self, inner: R) -> ProgressReader<'_, R> {
        ProgressReader::new(inner, &mut *self.progress)
    }
}

/// Reader wrapper that reports bytes read to a progress callback.
///
/// Updates are batched (1 MB by default) and flushed on drop.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Creates a reader with the default 1 MB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, 1024 * 1024)
    }

    /// Creates a reader that reports every `batch_threshold` bytes.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            batch_threshold,
        }
    }

    fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_since_last_update += n as u64;
        if self.bytes_since_last_update >= self.batch_threshold {
            self.flush_progress();
        }
        Ok(n)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct Recorder {
        starts: Vec<(String, usize, usize)>,
        byte_updates: Vec<u64>,
        completed: usize,
        finished: bool,
    }

    impl ProgressCallback for Recorder {
        fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
            self.starts
                .push((path.display().to_string(), total, current));
        }

        fn on_bytes_written(&mut self, bytes: u64) {
            self.byte_updates.push(bytes);
        }

        fn on_entry_complete(&mut self, _path: &Path) {
            self.completed += 1;
        }

        fn on_complete(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_tracker_numbers_entries() {
        let mut recorder = Recorder::default();
        {
            let mut tracker = ProgressTracker::new(&mut recorder, 2);
            tracker.on_entry_start(Path::new("a"));
            tracker.on_entry_complete(Path::new("a"));
            tracker.on_entry_start(Path::new("b"));
            tracker.on_entry_complete(Path::new("b"));
            tracker.on_complete();
        }

        assert_eq!(
            recorder.starts,
            [("a".to_string(), 2, 1), ("b".to_string(), 2, 2)]
        );
        assert_eq!(recorder.completed, 2);
        assert!(recorder.finished);
    }

    #[test]
    fn test_reader_batches_and_flushes_on_drop() {
        let mut recorder = Recorder::default();
        {
            let data = vec![7u8; 10];
            let mut reader =
                ProgressReader::with_batch_threshold(Cursor::new(data), &mut recorder, 4);
            let mut buf = [0u8; 3];
            while reader.read(&mut buf).unwrap() > 0 {}
        }

        assert_eq!(recorder.byte_updates.iter().sum::<u64>(), 10);
        assert!(recorder.byte_updates.len() >= 2);
    }

    #[test]
    fn test_tracker_reader_reports_to_callback() {
        let mut recorder = Recorder::default();
        {
            let mut tracker = ProgressTracker::new(&mut recorder, 1);
            let mut reader = tracker.reader(Cursor::new(b"A=1".to_vec()));
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
        }
        assert_eq!(recorder.byte_updates, [3]);
    }
}
