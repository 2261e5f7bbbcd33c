use scraper::Selector;
use std::sync::LazyLock;

/// The attribute an image placeholder carries to name its staged blob.
pub const REFERENCE_ATTR: &str = "data-image-ref";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

// Only img elements count as placeholders; the reference attribute on
// anything else is ignored.
selector!(PLACEHOLDER_SELECTOR, format!("img[{REFERENCE_ATTR}]").as_str());
