use crate::parsing::classifier::classify_line;
use crate::types::segment::{DialogueSegment, SegmentType};

/// Id counters for one run. A fresh value starts every counter at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCounters {
    global: u64,
    per_type: [u64; SegmentType::ALL.len()],
}

impl SegmentCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next `(per-type id, global id)` pair for `segment_type`.
    pub fn next_ids(&mut self, segment_type: SegmentType) -> (String, String) {
        let slot = &mut self.per_type[segment_type.index()];
        *slot += 1;
        self.global += 1;
        (
            format!("{}{}", segment_type.prefix(), *slot),
            self.global.to_string(),
        )
    }

    pub(crate) fn global(&self) -> u64 {
        self.global
    }

    pub(crate) fn count_of(&self, segment_type: SegmentType) -> u64 {
        self.per_type[segment_type.index()]
    }
}

/// Turns dialogue-section text into ordered, identified segments.
///
/// Counters live as long as the structurer. Build one per quest (or per
/// whatever unit needs its own id space); ids keep climbing across repeated
/// `process` calls on the same value.
#[derive(Debug, Default)]
pub struct DialogueStructurer {
    counters: SegmentCounters,
}

impl DialogueStructurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies and identifies every `\n`-separated line of `text`.
    ///
    /// `None` or empty text yields no segments. A trailing newline yields a
    /// trailing empty line. Classification sees the raw line; `content` is
    /// trimmed.
    pub fn process(&mut self, text: Option<&str>) -> Vec<DialogueSegment> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Vec::new(),
        };

        text.split('\n')
            .map(|line| {
                let segment_type = classify_line(line);
                let (id, global_id) = self.counters.next_ids(segment_type);
                DialogueSegment {
                    id,
                    global_id,
                    content: line.trim().to_string(),
                    segment_type,
                }
            })
            .collect()
    }

    pub(crate) fn counters(&self) -> &SegmentCounters {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(segments: &[DialogueSegment]) -> Vec<SegmentType> {
        segments.iter().map(|s| s.segment_type).collect()
    }

    #[test]
    fn absent_or_empty_text_yields_nothing() {
        let mut structurer = DialogueStructurer::new();
        assert!(structurer.process(None).is_empty());
        assert!(structurer.process(Some("")).is_empty());
        assert_eq!(structurer.counters().global(), 0);
    }

    #[test]
    fn single_dialogue_line() {
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some("*'''Kassandra:''' Hello there."));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].segment_type, SegmentType::Dialogue);
        assert_eq!(segments[0].id, "D1");
        assert_eq!(segments[0].global_id, "1");
    }

    #[test]
    fn condition_gets_c_prefix() {
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some("(If \"Leave\" is chosen)"));
        assert_eq!(segments[0].segment_type, SegmentType::Condition);
        assert_eq!(segments[0].id, "C1");
    }

    #[test]
    fn tabber_pair() {
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some("<Tabber>\n</Tabber>"));
        assert_eq!(types(&segments), vec![SegmentType::TabberStart, SegmentType::TabberEnd]);
        assert_eq!(segments[0].id, "TS1");
        assert_eq!(segments[1].id, "TE1");
        assert_eq!(segments[0].global_id, "1");
        assert_eq!(segments[1].global_id, "2");
    }

    #[test]
    fn newline_only_text_is_two_empty_lines() {
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some("\n"));
        assert_eq!(types(&segments), vec![SegmentType::Unidentified; 2]);
        assert_eq!(segments[0].id, "U1");
        assert_eq!(segments[1].id, "U2");
        assert!(segments.iter().all(|s| s.content.is_empty()));
    }

    #[test]
    fn ids_are_gapless_per_type_and_globally() {
        let text = "Intro.\n*'''A:''' Hi\n|-\n*'''B:''' Yo\nMore prose.\n\n*'''A:''' Bye\n";
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some(text));

        assert_eq!(segments.len(), text.split('\n').count());
        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.global_id, (i + 1).to_string());
        }
        for ty in SegmentType::ALL {
            let ids: Vec<&str> = segments
                .iter()
                .filter(|s| s.segment_type == ty)
                .map(|s| s.id.as_str())
                .collect();
            let expected: Vec<String> = (1..=ids.len()).map(|n| format!("{}{}", ty.prefix(), n)).collect();
            assert_eq!(ids, expected, "ids for {}", ty);
        }
        assert_eq!(structurer.counters().count_of(SegmentType::Dialogue), 3);
        assert_eq!(structurer.counters().count_of(SegmentType::Unidentified), 2);
    }

    #[test]
    fn content_is_trimmed_but_classified_raw() {
        let mut structurer = DialogueStructurer::new();
        let segments = structurer.process(Some("   *'''A:'''   spaced   out  \r"));
        assert_eq!(segments[0].segment_type, SegmentType::Narrative);
        assert_eq!(segments[0].content, "*'''A:'''   spaced   out");
    }

    #[test]
    fn counters_continue_across_calls_on_one_instance() {
        let mut structurer = DialogueStructurer::new();
        structurer.process(Some("*'''A:''' one"));
        let second = structurer.process(Some("*'''A:''' two"));
        assert_eq!(second[0].id, "D2");
        assert_eq!(second[0].global_id, "2");
    }

    #[test]
    fn fresh_instances_have_independent_id_spaces() {
        let first = DialogueStructurer::new().process(Some("*'''A:''' one\nProse."));
        let second = DialogueStructurer::new().process(Some("*'''B:''' two"));
        assert_eq!(first[0].id, "D1");
        assert_eq!(second[0].id, "D1");
        assert_eq!(second[0].global_id, "1");
    }
}
