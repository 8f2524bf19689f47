//! Register-then-stream HTML rewriter.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use lol_html::errors::RewritingError;
use lol_html::{
    AsciiCompatibleEncoding, DocumentContentHandlers as NativeDocumentContentHandlers,
    ElementContentHandlers as NativeElementContentHandlers, HtmlRewriter as NativeHtmlRewriter,
    MemorySettings, Selector, Settings,
};
use rewrite_core::{RewriteError, RewriteRule, RewriterConfig, StreamPhase, StreamStats};
use tracing::debug;

use crate::handlers::{DocumentHandlers, ElementHandlers};
use crate::rules::compile_rule;
use crate::sink::{CountingSink, OutputSink};

/// Streaming HTML rewriter.
///
/// Handlers are registered first; the engine is built on the first
/// `write` (or on `end` if nothing was written), after which the
/// handler set is frozen. Output reaches the sink in write order.
pub struct HtmlRewriter<O: OutputSink> {
    encoding: &'static Encoding,
    strict: bool,
    max_memory_bytes: Option<usize>,
    element_handlers: Vec<(Selector, ElementHandlers)>,
    document_handlers: Vec<DocumentHandlers>,
    output_sink: Option<O>,
    inner: Option<NativeHtmlRewriter<'static, CountingSink<O>>>,
    phase: StreamPhase,
    stats: Rc<RefCell<StreamStats>>,
}

impl<O: OutputSink> HtmlRewriter<O> {
    /// Create a rewriter for the given encoding label.
    ///
    /// Labels follow the WHATWG encoding standard ("utf8", "utf-8",
    /// "latin1", ...). Only ASCII-compatible encodings are supported.
    pub fn new(encoding: &str, output_sink: O) -> Result<Self, RewriteError> {
        let encoding = resolve_encoding(encoding)?;

        Ok(Self {
            encoding,
            strict: true,
            max_memory_bytes: None,
            element_handlers: Vec::new(),
            document_handlers: Vec::new(),
            output_sink: Some(output_sink),
            inner: None,
            phase: StreamPhase::Configuring,
            stats: Rc::new(RefCell::new(StreamStats::new())),
        })
    }

    /// Create a rewriter from a config, registering its rules in order.
    pub fn from_config(config: &RewriterConfig, output_sink: O) -> Result<Self, RewriteError> {
        config.validate()?;

        let mut rewriter = Self::new(&config.encoding, output_sink)?;
        rewriter.strict = config.strict;
        rewriter.max_memory_bytes = config.max_memory_bytes;

        for rule in &config.rules {
            rewriter.on_rule(rule)?;
        }

        Ok(rewriter)
    }

    /// Set strict mode. Must be called before the first write.
    pub fn set_strict(&mut self, strict: bool) -> Result<(), RewriteError> {
        self.assert_not_fully_constructed()?;
        self.strict = strict;
        Ok(())
    }

    /// Limit engine buffering. Must be called before the first write.
    pub fn set_max_memory_bytes(&mut self, bytes: usize) -> Result<(), RewriteError> {
        self.assert_not_fully_constructed()?;
        self.max_memory_bytes = Some(bytes);
        Ok(())
    }

    /// Register handlers for elements matching `selector`.
    pub fn on(&mut self, selector: &str, handlers: ElementHandlers) -> Result<(), RewriteError> {
        self.assert_not_fully_constructed()?;

        let parsed = selector
            .parse::<Selector>()
            .map_err(|source| RewriteError::InvalidSelector {
                selector: selector.to_string(),
                source,
            })?;

        self.element_handlers.push((parsed, handlers));

        Ok(())
    }

    /// Register document-level handlers.
    pub fn on_document(&mut self, handlers: DocumentHandlers) -> Result<(), RewriteError> {
        self.assert_not_fully_constructed()?;
        self.document_handlers.push(handlers);

        Ok(())
    }

    /// Register a declarative rule.
    pub fn on_rule(&mut self, rule: &RewriteRule) -> Result<(), RewriteError> {
        self.on(&rule.selector, compile_rule(rule))?;
        debug!(rule = %rule.describe(), "registered rule");
        Ok(())
    }

    /// Feed a chunk of input. Chunk boundaries may fall anywhere.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), RewriteError> {
        self.ensure_inner()?;

        let result = match self.inner.as_mut() {
            Some(inner) => inner.write(chunk),
            None => return Err(self.unusable()),
        };
        result.map_err(|e| self.fail(e))?;

        self.stats.borrow_mut().record_input(chunk.len());
        Ok(())
    }

    /// Flush remaining buffered state and finish the stream.
    pub fn end(&mut self) -> Result<StreamStats, RewriteError> {
        self.ensure_inner()?;

        let Some(inner) = self.inner.take() else {
            return Err(self.unusable());
        };

        inner.end().map_err(|e| self.fail(e))?;

        self.phase = StreamPhase::Ended;
        let mut stats = self.stats.borrow_mut();
        stats.finish();

        debug!(
            chunks_in = stats.chunks_in,
            bytes_in = stats.bytes_in,
            chunks_out = stats.chunks_out,
            bytes_out = stats.bytes_out,
            elapsed_us = stats.elapsed().as_micros() as u64,
            "rewriter ended"
        );

        Ok(stats.clone())
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> &StreamPhase {
        &self.phase
    }

    /// Canonical name of the resolved encoding.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    fn assert_not_fully_constructed(&self) -> Result<(), RewriteError> {
        if self.phase.accepts_handlers() {
            Ok(())
        } else {
            Err(RewriteError::HandlersAfterWrite)
        }
    }

    fn unusable(&self) -> RewriteError {
        match &self.phase {
            StreamPhase::Failed(reason) => RewriteError::Failed(reason.clone()),
            _ => RewriteError::Ended,
        }
    }

    fn ensure_inner(&mut self) -> Result<(), RewriteError> {
        if !self.phase.accepts_input() {
            return Err(self.unusable());
        }
        if self.inner.is_some() {
            return Ok(());
        }

        let Some(encoding) = AsciiCompatibleEncoding::new(self.encoding) else {
            return Err(RewriteError::UnsupportedEncoding(
                self.encoding.name().to_string(),
            ));
        };
        let Some(output_sink) = self.output_sink.take() else {
            return Err(self.unusable());
        };

        let mut memory_settings = MemorySettings::default();
        if let Some(limit) = self.max_memory_bytes {
            // Preallocation counts against the limit.
            memory_settings.preallocated_parsing_buffer_size =
                memory_settings.preallocated_parsing_buffer_size.min(limit);
            memory_settings.max_allowed_memory_usage = limit;
        }

        let selector_count = self.element_handlers.len();
        let element_content_handlers: Vec<(
            Cow<'static, Selector>,
            NativeElementContentHandlers<'static>,
        )> = self
            .element_handlers
            .drain(..)
            .map(|(selector, handlers)| (Cow::Owned(selector), handlers.into_native()))
            .collect();
        let document_content_handlers: Vec<NativeDocumentContentHandlers<'static>> = self
            .document_handlers
            .drain(..)
            .map(DocumentHandlers::into_native)
            .collect();

        let settings = Settings {
            element_content_handlers,
            document_content_handlers,
            encoding,
            memory_settings,
            strict: self.strict,
            ..Settings::new()
        };

        let sink = CountingSink::new(output_sink, Rc::clone(&self.stats));
        self.inner = Some(NativeHtmlRewriter::new(settings, sink));
        self.phase = StreamPhase::Streaming;

        debug!(
            encoding = self.encoding.name(),
            selectors = selector_count,
            strict = self.strict,
            "rewriter engine built"
        );

        Ok(())
    }

    fn fail(&mut self, error: RewritingError) -> RewriteError {
        debug!(error = %error, "rewriting failed");
        self.inner = None;
        self.phase = StreamPhase::Failed(error.to_string());
        RewriteError::Rewriting(error)
    }
}

fn resolve_encoding(label: &str) -> Result<&'static Encoding, RewriteError> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| RewriteError::UnsupportedEncoding(label.to_string()))?;

    if AsciiCompatibleEncoding::new(encoding).is_none() {
        return Err(RewriteError::UnsupportedEncoding(label.to_string()));
    }

    Ok(encoding)
}
