//! HTML link extraction
//!
//! Pulls raw `href` values out of anchor tags. Resolution, filtering and
//! deduplication happen later, in the URL normalizer and the coordinator.

use scraper::{Html, Selector};

/// A parsed HTML document ready for link extraction
pub struct ParsedPage {
    document: Html,
    anchors: Option<Selector>,
}

/// Parses HTML content
///
/// html5ever recovers from any input, so malformed markup or a non-HTML
/// body (an image, a PDF) simply produces a document with no anchors.
///
/// # Example
///
/// ```
/// use moss::crawler::parse_html;
///
/// let page = parse_html(r#"<p><a href="/a">A</a><a href="b.html">B</a></p>"#);
/// let hrefs: Vec<&str> = page.hrefs().collect();
/// assert_eq!(hrefs, vec!["/a", "b.html"]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    ParsedPage {
        document: Html::parse_document(html),
        anchors: Selector::parse("a[href]").ok(),
    }
}

impl ParsedPage {
    /// Raw `href` attribute values of every anchor, in document order
    ///
    /// Duplicates are kept.
    pub fn hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.anchors
            .iter()
            .flat_map(move |selector| self.document.select(selector))
            .filter_map(|element| element.value().attr("href"))
    }
}

/// Convenience function returning owned hrefs from an HTML body
pub fn extract_links(html: &str) -> Vec<String> {
    parse_html(html).hrefs().map(str::to_string).collect()
}
