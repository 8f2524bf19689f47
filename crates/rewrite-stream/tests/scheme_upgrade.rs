//! End-to-end: rewrite `href` schemes while input arrives in fragments.

use std::cell::RefCell;
use std::rc::Rc;

use rewrite_stream::conformance;
use rewrite_stream::{
    check_chunk_invariance, ElementHandlers, HtmlRewriter, RewriteRule, RewriterConfig,
};

#[test]
fn test_href_scheme_upgrade_over_fragments() {
    let chunks: Rc<RefCell<Vec<Vec<u8>>>> = Rc::default();
    let sink_chunks = Rc::clone(&chunks);
    let sink = move |chunk: &[u8]| sink_chunks.borrow_mut().push(chunk.to_vec());

    let mut rewriter = HtmlRewriter::new("utf8", sink).unwrap();
    rewriter
        .on(
            "a[href]",
            ElementHandlers::new().element(|el| {
                let href = el
                    .get_attribute("href")
                    .unwrap_or_default()
                    .replacen("http:", "https:", 1);
                el.set_attribute("href", &href)?;
                Ok(())
            }),
        )
        .unwrap();

    for part in ["<div><a href=", "http://example.com>", "</a></div>"] {
        rewriter.write(part.as_bytes()).unwrap();
    }
    rewriter.end().unwrap();

    let output = String::from_utf8(chunks.borrow().concat()).unwrap();
    assert_eq!(output, r#"<div><a href="https://example.com"></a></div>"#);
}

#[test]
fn test_conformance_module_passes() {
    let outcome = conformance::run().unwrap();
    assert!(outcome.passed());
}

#[test]
fn test_every_split_point_gives_same_output() {
    let input = conformance::FRAGMENTS.concat();

    for at in 1..input.len() {
        let (head, tail) = input.as_bytes().split_at(at);
        let outcome = conformance::run_with_fragments([head, tail]).unwrap();
        assert!(
            outcome.passed(),
            "split at {} produced {:?}",
            at,
            String::from_utf8_lossy(&outcome.output)
        );
    }
}

#[test]
fn test_rule_based_rewrite_is_chunk_invariant() {
    let config = RewriterConfig::new().with_rule(RewriteRule::upgrade_scheme("a[href]", "href"));
    let input = conformance::FRAGMENTS.concat();

    let report = check_chunk_invariance(&config, input.as_bytes()).unwrap();

    assert!(report.is_invariant());
    assert_eq!(report.expected, conformance::EXPECTED.as_bytes());
}
