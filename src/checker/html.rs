// src/checker/html.rs
// =============================================================================
// This module extracts link targets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which never fails on malformed markup
//
// The href values are taken verbatim. The page URL only names the tracing
// span; relative links are NOT resolved against it, they are filtered out.
// =============================================================================

use crate::config::LinkFilter;
use scraper::{Html, Selector};
use tracing::{trace, trace_span, Dispatch};
use url::Url;

#[derive(Clone)]
pub struct LinkExtractor {
    filter: LinkFilter,
    dispatch: Dispatch,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(LinkFilter::default())
    }
}

impl LinkExtractor {
    // Logs go to whatever subscriber is the default when the extractor is
    // built; with none installed (tests) they are dropped
    pub fn new(filter: LinkFilter) -> Self {
        Self {
            filter,
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Sends this extractor's diagnostics to `dispatch` instead
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn filter(&self) -> LinkFilter {
        self.filter
    }

    // Extracts all link targets from HTML content
    //
    // Parameters:
    //   page_url: the URL the page came from (diagnostics only)
    //   html: the HTML document
    //
    // Returns: the surviving href values in document order. A page without
    // anchors, an empty string or broken markup all give an empty Vec.
    //
    // Example:
    //   html = "<a href='http://a.example'></a><a href='/docs'></a>"
    //   result = ["http://a.example"]
    pub fn extract(&self, page_url: &str, html: &str) -> Vec<String> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            let _span = trace_span!("extract_links", page = page_url).entered();

            let document = Html::parse_document(html);

            // "a[href]" is a constant, known-valid selector
            let selector = Selector::parse("a[href]").expect("a[href] is a valid CSS selector");

            document
                .select(&selector)
                .filter_map(|element| element.value().attr("href"))
                .inspect(|href| trace!(link = %href, "raw link"))
                .filter(|href| self.accepts(href))
                .map(str::to_string)
                .collect()
        })
    }

    // Whether a raw href value is kept as a link target
    fn accepts(&self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        match self.filter {
            LinkFilter::HttpPrefix => href.starts_with("http"),
            LinkFilter::HttpScheme => is_http_url(href),
        }
    }
}

// Absolute URL with an http or https scheme
fn is_http_url(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Extracts link targets with the default (prefix) filter
pub fn extract_links(page_url: &str, html: &str) -> Vec<String> {
    LinkExtractor::default().extract(page_url, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/page";

    #[test]
    fn test_keeps_only_http_prefixed_links() {
        let html = r#"<a href="http://good.example"></a><a href="ftp://skip.example"></a><a href="/relative"></a>"#;
        let links = extract_links(PAGE, html);
        assert_eq!(links, vec!["http://good.example"]);
    }

    #[test]
    fn test_href_taken_verbatim() {
        // No normalization: no trailing slash is added
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_links(PAGE, html);
        assert_eq!(links, vec!["https://www.rust-lang.org"]);
    }

    #[test]
    fn test_skips_missing_and_empty_href() {
        let html = r##"
            <a name="top">Top</a>
            <a href="">Empty</a>
            <a href="https://rust-lang.org">Rust</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="#section">Anchor</a>
        "##;
        let links = extract_links(PAGE, html);
        assert_eq!(links, vec!["https://rust-lang.org"]);
    }

    #[test]
    fn test_document_order_and_duplicates_kept() {
        let html = r#"
            <p><a href="https://b.example">B</a></p>
            <a href="http://a.example">A</a>
            <a href="https://b.example">B again</a>
        "#;
        let links = extract_links(PAGE, html);
        assert_eq!(
            links,
            vec!["https://b.example", "http://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_no_anchors_gives_empty_vec() {
        assert!(extract_links(PAGE, "<html><body><p>nothing</p></body></html>").is_empty());
        assert!(extract_links(PAGE, "").is_empty());
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = r#"<div><a href="https://ok.example">unclosed <b><p></div></span></table>"#;
        let links = extract_links(PAGE, html);
        assert_eq!(links, vec!["https://ok.example"]);
    }

    #[test]
    fn test_prefix_filter_is_loose() {
        let html = r#"<a href="httpfoo">odd</a>"#;
        assert_eq!(extract_links(PAGE, html), vec!["httpfoo"]);
    }

    #[test]
    fn test_scheme_filter_is_strict() {
        let html = r#"
            <a href="httpfoo">odd</a>
            <a href="http://a.example">A</a>
            <a href="https://b.example/x?y=1">B</a>
            <a href="http:/">broken</a>
        "#;
        let extractor = LinkExtractor::new(LinkFilter::HttpScheme);
        assert_eq!(
            extractor.extract(PAGE, html),
            vec!["http://a.example", "https://b.example/x?y=1"]
        );
    }

    // io::Write sink shared between the test and the subscriber
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_raw_links_traced_to_injected_dispatch() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let extractor = LinkExtractor::default().with_dispatch(Dispatch::new(subscriber));
        let links = extractor.extract(PAGE, r#"<a href="/relative"></a><a href="http://a.example"></a>"#);
        assert_eq!(links, vec!["http://a.example"]);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        // Every raw href is traced, including the ones filtered out
        assert!(output.contains("/relative"));
        assert!(output.contains("http://a.example"));
        assert!(output.contains(PAGE));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = r#"<a href="http://a.example"></a><a href="/x"></a><a href="https://b.example"></a>"#;
        let extractor = LinkExtractor::default().with_dispatch(Dispatch::none());
        assert_eq!(extractor.extract(PAGE, html), extractor.extract(PAGE, html));
    }
}
