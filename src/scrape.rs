//! Documentation scraping: fetch a page and flatten its paragraphs, code
//! blocks and labeled sections into one text blob, in document order, each
//! element prefixed with a 1-based label ("Code 3: ...").

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScrapeError;

static ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<p[^>]*>(.*?)</p>|<code[^>]*>(.*?)</code>|<div[^>]*class="[^"]*section[^"]*"[^>]*>(.*?)</div>"#,
    )
    .expect("invalid element pattern")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid tag pattern"));

/// Fetch `url` and extract its documentation text.
pub async fn fetch_and_extract(client: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    extract_documentation(&html)
}

/// Flatten raw HTML into labeled documentation text.
pub fn extract_documentation(html: &str) -> Result<String, ScrapeError> {
    let mut extracted = String::new();
    let mut index = 0usize;

    for captures in ELEMENT.captures_iter(html) {
        let (kind, raw) = if let Some(m) = captures.get(1) {
            ("Paragraph", m.as_str())
        } else if let Some(m) = captures.get(2) {
            ("Code", m.as_str())
        } else if let Some(m) = captures.get(3) {
            ("Section", m.as_str())
        } else {
            continue;
        };

        let text = clean(raw);
        if text.is_empty() {
            continue;
        }
        index += 1;
        let _ = write!(extracted, "\n{kind} {index}: {text}");
    }

    if extracted.is_empty() {
        return Err(ScrapeError::Empty);
    }
    Ok(extracted)
}

// Strip nested tags and decode the entities that matter for code snippets.
fn clean(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, "");
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
