//! Rule-based line classifier.
//!
//! Every line maps to exactly one [`SegmentType`]. Rules are tried top to
//! bottom and the first one whose pattern matches at the start of the line
//! wins; trailing content after the matched prefix is ignored.

use crate::types::segment::SegmentType;
use regex::Regex;
use std::sync::LazyLock;

/// Speaker-line variants, tried in this order.
const DIALOGUE_VARIANTS: &[&str] = &[
    // *'''Name:''' ''Quoted'' or *'''Name:''' bare text
    r"\*'''.*?:'''(?:\s*''.*?''|\s*.*?$)",
    // **'''Name:''' ''Quoted''
    r"\*\*'''.*?:'''(?:\s*''.*?''|$)",
    // * '''Name:''' ''Quoted''
    r"\* '''.*?:'''(?:\s*''.*?''|$)",
    // *'''Name''' ''Quoted'' (no colon)
    r"\*'''.*?'''(?:\s*''.*?''|$)",
    // *'''Name''': ''Quoted''
    r"\*'''.*?''':\s*''.*?''",
    // **'''Name''','' with optional ''Quoted''
    r"\*\*'''.*?''',?''(?:\s*''.*?''|$)",
    // *'''Name''' '''Bold text'''
    r"\*'''[^']*?'''\s*'''[^']*?'''",
    r"\*'''.*?'''\s*''.*?''",
];

const PLAYER_CHOICE: &[&str] = &[r"\|-", r"\s*.*="];

const CONDITION_VARIANTS: &[&str] = &[
    r#"\(If ".*" (?:is|was)?\s*(?:chosen|asked|choose)?[.?!"']?\)"#,
    r#"\(If players (?:choose|chose|asked) ".*"[.?!"']?\)"#,
    r#"\(Asked ".*"[.?!"']?\)"#,
    r#"\(-> ".*"[.?!"']?\)"#,
    r#"\(If ".*" was chosen[.?!"']?\)"#,
    r#"\((?:Chose|Choose) ".*"[.?!"']?\)"#,
    r"\(If players? .*\)",
    r"\*\*If players choose .*",
    r"\*If players met .*",
    r"\*If players went straight to .*",
];

/// One entry of the ordered rule table.
#[derive(Debug)]
pub(crate) struct ClassificationRule {
    pub(crate) segment_type: SegmentType,
    pattern: Regex,
}

impl ClassificationRule {
    /// Builds a rule matching any of `alternatives` at the start of a line.
    fn new(segment_type: SegmentType, alternatives: &[&str]) -> Self {
        Self::with_flags(segment_type, "", alternatives)
    }

    fn with_flags(segment_type: SegmentType, flags: &str, alternatives: &[&str]) -> Self {
        let source = format!("{}^(?:{})", flags, alternatives.join("|"));
        let pattern = Regex::new(&source)
            .unwrap_or_else(|e| panic!("invalid {} pattern {:?}: {}", segment_type, source, e));
        ClassificationRule { segment_type, pattern }
    }

    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Ordered rule table: specific markers first, then parenthesized asides,
/// then the plain-prose catch-all.
static RULES: LazyLock<Vec<ClassificationRule>> = LazyLock::new(|| {
    vec![
        ClassificationRule::new(SegmentType::Dialogue, DIALOGUE_VARIANTS),
        ClassificationRule::new(SegmentType::PlayerChoice, PLAYER_CHOICE),
        ClassificationRule::new(SegmentType::Condition, CONDITION_VARIANTS),
        ClassificationRule::with_flags(SegmentType::TabberStart, "(?i)", &["<tabber>"]),
        ClassificationRule::with_flags(SegmentType::TabberEnd, "(?i)", &["</tabber>"]),
        ClassificationRule::new(
            SegmentType::NestedTabberStart,
            &[r"\{\{#tag:tabber\|", r"\{\{#tag: tabber\|"],
        ),
        ClassificationRule::new(SegmentType::NestedTabberEnd, &[r"\}\}"]),
        ClassificationRule::new(SegmentType::NestedChoiceDelimiter, &[r"\{\{!\}\}-\{\{!\}\}"]),
        ClassificationRule::new(SegmentType::ImageFile, &[r"\[\[File:.*?\|thumb\|\d+px\|.*?\]\]"]),
        ClassificationRule::new(SegmentType::OptionalChoice, &[r"\(.*\)"]),
        // Needs at least one character, so the empty line falls through.
        ClassificationRule::new(SegmentType::Narrative, &[r"[^*|<\(\{].*$"]),
    ]
});

/// The rule table in evaluation order.
#[cfg(test)]
fn rules() -> &'static [ClassificationRule] {
    &RULES
}

/// Classifies one raw line. Total: anything unmatched is `Unidentified`.
pub fn classify_line(line: &str) -> SegmentType {
    RULES
        .iter()
        .find(|rule| rule.matches(line))
        .map_or(SegmentType::Unidentified, |rule| rule.segment_type)
}
