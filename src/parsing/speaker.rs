use regex::Regex;
use std::sync::LazyLock;

static SPEAKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*'''(.*?):'''\s*(.*)$").unwrap());

/// Splits a `*'''Name:''' text` line into speaker and utterance.
///
/// Only the first match on the line is used. Doubled single quotes (wiki
/// italics) in the utterance collapse to a plain apostrophe-style quote.
/// Bold-name lines without a colon yield `None`.
pub fn extract_speaker_and_utterance(content: &str) -> Option<(String, String)> {
    let caps = SPEAKER_LINE.captures(content)?;
    let speaker = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let utterance = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .trim()
        .replace("''", "'");
    Some((speaker, utterance))
}
