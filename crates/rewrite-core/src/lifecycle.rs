//! Rewriter lifecycle tracking.

use std::time::{Duration, Instant};

/// Lifecycle phases of a rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPhase {
    /// Handlers can still be registered.
    Configuring,
    /// Input has been written; handlers are frozen.
    Streaming,
    /// `end` completed and all output was flushed.
    Ended,
    /// The engine reported an error.
    Failed(String),
}

impl StreamPhase {
    /// Whether handlers may still be registered.
    pub fn accepts_handlers(&self) -> bool {
        matches!(self, Self::Configuring)
    }

    /// Whether input may still be written.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Configuring | Self::Streaming)
    }
}

/// Byte and chunk counters for one rewriting pass.
#[derive(Debug, Clone)]
pub struct StreamStats {
    start: Instant,
    finished: Option<Instant>,
    /// Number of `write` calls.
    pub chunks_in: usize,
    /// Total bytes written.
    pub bytes_in: usize,
    /// Number of chunks handed to the output sink.
    pub chunks_out: usize,
    /// Total bytes handed to the output sink.
    pub bytes_out: usize,
}

impl StreamStats {
    /// Create new stats, starting the clock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            finished: None,
            chunks_in: 0,
            bytes_in: 0,
            chunks_out: 0,
            bytes_out: 0,
        }
    }

    /// Record an input chunk.
    pub fn record_input(&mut self, len: usize) {
        self.chunks_in += 1;
        self.bytes_in += len;
    }

    /// Record an output chunk.
    pub fn record_output(&mut self, len: usize) {
        self.chunks_out += 1;
        self.bytes_out += len;
    }

    /// Stop the clock.
    pub fn finish(&mut self) {
        self.finished.get_or_insert_with(Instant::now);
    }

    /// Time from start to finish, or to now if still running.
    pub fn elapsed(&self) -> Duration {
        match self.finished {
            Some(end) => end.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    /// Output size relative to input size; `None` before any input.
    pub fn size_ratio(&self) -> Option<f64> {
        if self.bytes_in == 0 {
            None
        } else {
            Some(self.bytes_out as f64 / self.bytes_in as f64)
        }
    }
}

impl Default for StreamStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert!(StreamPhase::Configuring.accepts_handlers());
        assert!(StreamPhase::Configuring.accepts_input());
        assert!(!StreamPhase::Streaming.accepts_handlers());
        assert!(StreamPhase::Streaming.accepts_input());
        assert!(!StreamPhase::Ended.accepts_input());
        assert!(!StreamPhase::Failed("x".into()).accepts_input());
    }

    #[test]
    fn test_stats_counters() {
        let mut stats = StreamStats::new();
        assert_eq!(stats.size_ratio(), None);

        stats.record_input(10);
        stats.record_input(10);
        stats.record_output(25);

        assert_eq!(stats.chunks_in, 2);
        assert_eq!(stats.bytes_in, 20);
        assert_eq!(stats.chunks_out, 1);
        assert_eq!(stats.bytes_out, 25);
        assert_eq!(stats.size_ratio(), Some(1.25));
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut stats = StreamStats::new();
        stats.finish();
        let first = stats.elapsed();
        stats.finish();
        assert_eq!(stats.elapsed(), first);
    }
}
