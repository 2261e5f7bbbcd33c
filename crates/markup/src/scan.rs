//! Placeholder discovery over raw editor markup.

use crate::consts;
use scraper::Html;

/// Reference ids of every image placeholder in `markup`, in document order.
///
/// Parsing is error-tolerant (html5ever recovers from malformed markup the
/// same way a browser would), so this never fails; broken markup simply
/// yields whatever placeholders survive parsing. Editor content is a
/// fragment, not a full document, and is parsed as one.
pub fn placeholder_refs(markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(markup);
    fragment
        .select(&consts::PLACEHOLDER_SELECTOR)
        .filter_map(|element| element.value().attr(consts::REFERENCE_ATTR))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_finds_placeholders_in_document_order() {
        let markup = r#"
            <p>before</p>
            <img data-image-ref="first" />
            <p>middle <img data-image-ref="second"></p>
            <img data-image-ref="third">
        "#;
        assert_eq!(placeholder_refs(markup), ["first", "second", "third"]);
    }

    #[rstest]
    // Plain images without the reference attribute are not placeholders.
    #[case(r#"<img src="https://example.org/logo.png"><img data-image-ref="a">"#)]
    // The reference attribute on a non-img element is ignored.
    #[case(r#"<div data-image-ref="not-an-image"></div><img data-image-ref="a">"#)]
    // Attribute values are taken as-is, no trimming or validation.
    #[case(r#"<img data-image-ref="a" src="blob:already-bound">"#)]
    fn test_only_img_placeholders_count(#[case] markup: &str) {
        assert_eq!(placeholder_refs(markup), ["a"]);
    }

    #[test]
    fn test_empty_markup_has_no_placeholders() {
        assert!(placeholder_refs("").is_empty());
        assert!(placeholder_refs("<p>just text</p>").is_empty());
    }

    #[test]
    fn test_malformed_markup_still_yields_placeholders() {
        // Unclosed tags and stray brackets; html5ever recovers.
        let markup = r#"<p><b>bold<img data-image-ref="survivor"<p>tail"#;
        assert_eq!(placeholder_refs(markup), ["survivor"]);
    }

    #[test]
    fn test_duplicate_ids_are_reported_per_occurrence() {
        // The scanner reports occurrences; dedup policy belongs to callers.
        let markup = r#"<img data-image-ref="a"><img data-image-ref="a">"#;
        assert_eq!(placeholder_refs(markup), ["a", "a"]);
    }
}
