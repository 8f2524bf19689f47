//! Output sinks for rewritten chunks.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::string::FromUtf8Error;

pub use lol_html::OutputSink;
use rewrite_core::StreamStats;

/// Append-only accumulator of output chunks.
///
/// Clones share the same buffer, so one clone can be handed to the
/// rewriter while the caller keeps another to read the result.
#[derive(Debug, Clone, Default)]
pub struct ChunkCollector {
    chunks: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl ChunkCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the chunks received so far, in emission order.
    pub fn chunks(&self) -> Vec<Vec<u8>> {
        self.chunks.borrow().clone()
    }

    /// Number of non-empty chunks received.
    pub fn chunk_count(&self) -> usize {
        self.chunks.borrow().len()
    }

    /// Total bytes received.
    pub fn len(&self) -> usize {
        self.chunks.borrow().iter().map(Vec::len).sum()
    }

    /// Whether no bytes were received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate all chunks.
    pub fn concat(&self) -> Vec<u8> {
        self.chunks.borrow().concat()
    }

    /// Concatenate all chunks and decode as UTF-8.
    pub fn to_utf8(&self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.concat())
    }
}

impl OutputSink for ChunkCollector {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        // The engine signals end-of-stream with an empty chunk.
        if !chunk.is_empty() {
            self.chunks.borrow_mut().push(chunk.to_vec());
        }
    }
}

/// Sink forwarding chunks to an `io::Write`.
///
/// The engine's sink callback can't fail, so the first I/O error is
/// kept and later chunks are dropped. Check `take_error` after `end`.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: Rc::new(RefCell::new(None)),
        }
    }

    /// Handle for reading the deferred I/O error after the sink was moved.
    pub fn error_handle(&self) -> SinkErrorHandle {
        SinkErrorHandle(Rc::clone(&self.error))
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        if self.error.borrow().is_some() {
            return;
        }

        let result = if chunk.is_empty() {
            self.writer.flush()
        } else {
            self.writer.write_all(chunk)
        };

        if let Err(e) = result {
            *self.error.borrow_mut() = Some(e);
        }
    }
}

/// Shared view of a `WriterSink`'s deferred error.
#[derive(Debug, Clone)]
pub struct SinkErrorHandle(Rc<RefCell<Option<io::Error>>>);

impl SinkErrorHandle {
    /// Take the recorded I/O error, if any.
    pub fn take_error(&self) -> Option<io::Error> {
        self.0.borrow_mut().take()
    }
}

/// Sink wrapper that records output counters.
pub struct CountingSink<O: OutputSink> {
    inner: O,
    stats: Rc<RefCell<StreamStats>>,
}

impl<O: OutputSink> CountingSink<O> {
    /// Wrap a sink, recording into shared stats.
    pub fn new(inner: O, stats: Rc<RefCell<StreamStats>>) -> Self {
        Self { inner, stats }
    }
}

impl<O: OutputSink> OutputSink for CountingSink<O> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        if !chunk.is_empty() {
            self.stats.borrow_mut().record_output(chunk.len());
        }
        self.inner.handle_chunk(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_shares_buffer_between_clones() {
        let collector = ChunkCollector::new();
        let mut sink = collector.clone();

        sink.handle_chunk(b"<div>");
        sink.handle_chunk(b"");
        sink.handle_chunk(b"</div>");

        assert_eq!(collector.chunk_count(), 2);
        assert_eq!(collector.len(), 11);
        assert_eq!(collector.concat(), b"<div></div>");
        assert_eq!(collector.to_utf8().unwrap(), "<div></div>");
    }

    #[test]
    fn test_collector_starts_empty() {
        let collector = ChunkCollector::new();
        assert!(collector.is_empty());
        collector.clone().handle_chunk(b"");
        assert!(collector.is_empty());
        assert_eq!(collector.chunk_count(), 0);
    }

    #[test]
    fn test_writer_sink_writes_in_order() {
        let mut sink = WriterSink::new(Vec::new());
        sink.handle_chunk(b"one ");
        sink.handle_chunk(b"two");
        sink.handle_chunk(b"");
        assert!(sink.error_handle().take_error().is_none());
        assert_eq!(sink.writer, b"one two");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_keeps_first_error() {
        let mut sink = WriterSink::new(FailingWriter);
        let handle = sink.error_handle();

        sink.handle_chunk(b"x");
        sink.handle_chunk(b"y");

        let err = handle.take_error().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(handle.take_error().is_none());
    }

    #[test]
    fn test_counting_sink_records_output() {
        let stats = Rc::new(RefCell::new(StreamStats::new()));
        let collector = ChunkCollector::new();
        let mut sink = CountingSink::new(collector.clone(), Rc::clone(&stats));

        sink.handle_chunk(b"hello");
        sink.handle_chunk(b"");

        assert_eq!(stats.borrow().chunks_out, 1);
        assert_eq!(stats.borrow().bytes_out, 5);
        assert_eq!(collector.concat(), b"hello");
    }
}
