//! Handler objects registered on a rewriter.
//!
//! These are collected before the engine exists and converted into the
//! engine's native handlers when the first chunk is written.

use lol_html::html_content::{Comment, Doctype, DocumentEnd, Element, TextChunk};
use lol_html::{DocumentContentHandlers, ElementContentHandlers, HandlerResult};

type ElementCallback = Box<dyn FnMut(&mut Element<'_, '_>) -> HandlerResult>;
type CommentCallback = Box<dyn FnMut(&mut Comment<'_>) -> HandlerResult>;
type TextCallback = Box<dyn FnMut(&mut TextChunk<'_>) -> HandlerResult>;
type DoctypeCallback = Box<dyn FnMut(&mut Doctype<'_>) -> HandlerResult>;
type EndCallback = Box<dyn FnMut(&mut DocumentEnd<'_>) -> HandlerResult>;

/// Callbacks for elements matching a selector.
#[derive(Default)]
pub struct ElementHandlers {
    element: Option<ElementCallback>,
    comments: Option<CommentCallback>,
    text: Option<TextCallback>,
}

impl ElementHandlers {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per matched element, at its start tag.
    pub fn element<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut Element<'_, '_>) -> HandlerResult + 'static,
    {
        self.element = Some(Box::new(handler));
        self
    }

    /// Called for comments inside matched elements.
    pub fn comments<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut Comment<'_>) -> HandlerResult + 'static,
    {
        self.comments = Some(Box::new(handler));
        self
    }

    /// Called for text chunks inside matched elements.
    pub fn text<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut TextChunk<'_>) -> HandlerResult + 'static,
    {
        self.text = Some(Box::new(handler));
        self
    }

    pub(crate) fn into_native(self) -> ElementContentHandlers<'static> {
        let mut native = ElementContentHandlers::default();

        if let Some(handler) = self.element {
            native = native.element(handler);
        }
        if let Some(handler) = self.comments {
            native = native.comments(handler);
        }
        if let Some(handler) = self.text {
            native = native.text(handler);
        }

        native
    }
}

/// Callbacks for the whole document.
#[derive(Default)]
pub struct DocumentHandlers {
    doctype: Option<DoctypeCallback>,
    comments: Option<CommentCallback>,
    text: Option<TextCallback>,
    end: Option<EndCallback>,
}

impl DocumentHandlers {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for the document type declaration.
    pub fn doctype<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut Doctype<'_>) -> HandlerResult + 'static,
    {
        self.doctype = Some(Box::new(handler));
        self
    }

    /// Called for every comment in the document.
    pub fn comments<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut Comment<'_>) -> HandlerResult + 'static,
    {
        self.comments = Some(Box::new(handler));
        self
    }

    /// Called for every text chunk in the document.
    pub fn text<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut TextChunk<'_>) -> HandlerResult + 'static,
    {
        self.text = Some(Box::new(handler));
        self
    }

    /// Called once when the input ends; content may be appended here.
    pub fn end<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut DocumentEnd<'_>) -> HandlerResult + 'static,
    {
        self.end = Some(Box::new(handler));
        self
    }

    pub(crate) fn into_native(self) -> DocumentContentHandlers<'static> {
        let mut native = DocumentContentHandlers::default();

        if let Some(handler) = self.doctype {
            native = native.doctype(handler);
        }
        if let Some(handler) = self.comments {
            native = native.comments(handler);
        }
        if let Some(handler) = self.text {
            native = native.text(handler);
        }
        if let Some(handler) = self.end {
            native = native.end(handler);
        }

        native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewriter::HtmlRewriter;
    use crate::sink::ChunkCollector;
    use lol_html::html_content::ContentType;

    fn rewrite(
        input: &str,
        selector: &str,
        element: ElementHandlers,
        document: DocumentHandlers,
    ) -> String {
        let collector = ChunkCollector::new();
        let mut rewriter = HtmlRewriter::new("utf-8", collector.clone()).unwrap();
        rewriter.on(selector, element).unwrap();
        rewriter.on_document(document).unwrap();
        rewriter.write(input.as_bytes()).unwrap();
        rewriter.end().unwrap();
        collector.to_utf8().unwrap()
    }

    #[test]
    fn test_element_scoped_text_and_comments() {
        let handlers = ElementHandlers::new()
            .comments(|c| {
                c.remove();
                Ok(())
            })
            .text(|t| {
                if !t.as_str().is_empty() {
                    t.replace("TEXT", ContentType::Text);
                }
                Ok(())
            });

        let out = rewrite(
            "<p>a<!--x--></p><i>b<!--y--></i>",
            "p",
            handlers,
            DocumentHandlers::new(),
        );
        assert_eq!(out, "<p>TEXT</p><i>b<!--y--></i>");
    }

    #[test]
    fn test_document_handlers_see_whole_document() {
        let document = DocumentHandlers::new()
            .doctype(|_| Ok(()))
            .comments(|c| {
                c.set_text("seen")?;
                Ok(())
            })
            .end(|end| {
                end.append("<!--end-->", ContentType::Html);
                Ok(())
            });

        let out = rewrite(
            "<!DOCTYPE html><!--a--><p><!--b--></p>",
            "p",
            ElementHandlers::new(),
            document,
        );
        assert_eq!(out, "<!DOCTYPE html><!--seen--><p><!--seen--></p><!--end-->");
    }
}
