//! Link extraction from page content
//!
//! Extraction is best-effort: html5ever recovers from malformed markup, so a
//! broken page yields fewer links rather than an error.

use scraper::{Html, Selector};

/// Extracts raw hyperlink targets from page content
///
/// Every element carrying an `href` attribute contributes its value verbatim,
/// in document order. Duplicates are kept; empty values are skipped.
///
/// # Example
///
/// ```
/// use link_atlas::crawler::extract_links;
///
/// let html = r#"<a href="/x">x</a><link rel="stylesheet" href="style.css"><a href="/x">again</a>"#;
/// assert_eq!(extract_links(html), vec!["/x", "style.css", "/x"]);
/// ```
pub fn extract_links(body: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(body);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_in_document_order() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <a href="https://other.com/page3">Link 3</a>
                <a href="page2">Link 2</a>
            </body>
            </html>
        "#;
        assert_eq!(
            extract_links(html),
            vec!["/page1", "https://other.com/page3", "page2"]
        );
    }

    #[test]
    fn test_duplicates_preserved() {
        let html = r#"<a href="/x">1</a><a href="/x">2</a>"#;
        assert_eq!(extract_links(html), vec!["/x", "/x"]);
    }

    #[test]
    fn test_raw_values_not_resolved() {
        let html = r##"<a href="../up?q=1#frag">x</a><a href="mailto:me@a.test">m</a>"##;
        assert_eq!(
            extract_links(html),
            vec!["../up?q=1#frag", "mailto:me@a.test"]
        );
    }

    #[test]
    fn test_non_anchor_href_elements_included() {
        let html = r#"<head><link rel="canonical" href="/canonical"></head><map><area href="/area"></map>"#;
        assert_eq!(extract_links(html), vec!["/canonical", "/area"]);
    }

    #[test]
    fn test_empty_href_skipped() {
        let html = r#"<a href="">empty</a><a href="  ">blank</a><a>none</a><a href="/ok">ok</a>"#;
        assert_eq!(extract_links(html), vec!["/ok"]);
    }

    #[test]
    fn test_single_quoted_and_unquoted() {
        let html = r#"<a href='/single'>s</a><a href=/bare>b</a>"#;
        assert_eq!(extract_links(html), vec!["/single", "/bare"]);
    }

    #[test]
    fn test_malformed_markup_tolerated() {
        let html = r#"<div><a href="/first">unclosed <p><a href="/second"</div></body"#;
        let links = extract_links(html);
        assert_eq!(links.first().map(String::as_str), Some("/first"));
    }

    #[test]
    fn test_non_html_content() {
        assert!(extract_links("{\"json\": true}").is_empty());
        assert!(extract_links("").is_empty());
    }
}
