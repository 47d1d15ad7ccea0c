/*!
 * Markup artifact detection and cleanup.
 *
 * Generation occasionally leaks structure into prose output: HTML tags
 * from the source, XML entities, placeholder tokens, or chain-of-thought
 * wrappers. Reasoning wrappers are stripped before validation; everything
 * else fails the chunk.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?>").expect("html tag regex"));

static XML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:[A-Za-z]+|#\d+);").expect("xml entity regex"));

static REASONING_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("reasoning block regex"));

/// Placeholder the upstream text extractor uses for tab characters
const TAB_PLACEHOLDER: &str = "_TAB_";

/// Remove `<think>...</think>` reasoning blocks emitted by some models.
///
/// Applied before validation so a model that reasons out loud is not
/// rejected for the wrapper alone.
pub fn strip_reasoning_tags(text: &str) -> String {
    REASONING_BLOCK.replace_all(text, "").trim().to_string()
}

/// Raw markup artifacts present in the text, one sample per kind
pub fn find_markup_artifacts(text: &str) -> Vec<String> {
    let mut artifacts = Vec::new();

    if let Some(m) = HTML_TAG.find(text) {
        artifacts.push(m.as_str().to_string());
    }
    if let Some(m) = XML_ENTITY.find(text) {
        artifacts.push(m.as_str().to_string());
    }
    if text.contains(TAB_PLACEHOLDER) {
        artifacts.push(TAB_PLACEHOLDER.to_string());
    }

    artifacts
}
