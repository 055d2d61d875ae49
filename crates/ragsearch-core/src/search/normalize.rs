//! Result normalization
//!
//! Extracts display fields from raw hits. Every lookup is safe: missing
//! fields fall back to sentinel strings and never propagate an error.

use super::SearchHit;

/// Sentinel when the body field is absent
pub const NO_BODY: &str = "No body content available";

/// Sentinel when neither `additional_urls` nor `url` is present
pub const NO_URL: &str = "No URL available";

/// Sentinel when the title field is absent
pub const NO_TITLE: &str = "No title available";

/// Sentinel when the passages collection exists but yields no text
pub const NO_PASSAGE_TEXT: &str = "No passages text available";

/// Sentinel when the passages collection is absent entirely.
///
/// Kept distinct from [`NO_PASSAGE_TEXT`] to match observed behavior.
pub const NO_PASSAGES: &str = "No passages available";

/// Score display for hits the engine scored as null
pub const SCORE_UNAVAILABLE: &str = "Not Applicable";

/// Display-ready fields extracted from one hit
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHit {
    pub body: String,
    pub url: String,
    pub title: String,
    pub first_passage: String,
    pub score: Option<f64>,
}

/// Extract display fields from a hit, applying sentinel defaults
pub fn normalize(hit: &SearchHit) -> NormalizedHit {
    let source = &hit.source;

    let body = source
        .body_content
        .clone()
        .unwrap_or_else(|| NO_BODY.to_string());

    // Prefer the first additional URL over the primary url field
    let url = source
        .additional_urls
        .as_ref()
        .and_then(|urls| urls.first().cloned())
        .or_else(|| source.url.clone())
        .unwrap_or_else(|| NO_URL.to_string());

    let title = source
        .title
        .clone()
        .unwrap_or_else(|| NO_TITLE.to_string());

    let first_passage = match &source.passages {
        None => NO_PASSAGES.to_string(),
        Some(passages) => passages
            .first()
            .and_then(|p| p.text.clone())
            .unwrap_or_else(|| NO_PASSAGE_TEXT.to_string()),
    };

    NormalizedHit {
        body,
        url,
        title,
        first_passage,
        score: hit.score,
    }
}

/// Format a relevance score for display
pub fn display_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}", s),
        None => SCORE_UNAVAILABLE.to_string(),
    }
}
