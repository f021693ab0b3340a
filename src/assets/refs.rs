//! Image reference extraction from markdown prose.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `![alt](path)`
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("markdown image pattern is valid")
});

/// `<img ... src="path">` with either quote style
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).expect("html image pattern is valid")
});

const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "//"];

/// Collects local image paths referenced by `content`.
///
/// Both markdown image syntax and HTML `<img>` tags are recognized.
/// Remote URLs are dropped. The same path referenced twice, in either
/// syntax, appears once.
pub fn extract_image_references(content: &str) -> BTreeSet<String> {
    let markdown = MARKDOWN_IMAGE
        .captures_iter(content)
        .filter_map(|caps| caps.get(2));
    let html = HTML_IMAGE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1));

    markdown
        .chain(html)
        .map(|m| m.as_str())
        .filter(|path| !is_remote(path))
        .map(str::to_string)
        .collect()
}

fn is_remote(path: &str) -> bool {
    REMOTE_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}
