use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Semantic role of one physical line of a quest's dialogue section.
///
/// Serializes to the variant name (`"Dialogue"`, `"PlayerChoice"`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    Dialogue,
    PlayerChoice,
    Narrative,
    Condition,
    TabberStart,
    TabberEnd,
    NestedTabberStart,
    NestedChoiceDelimiter,
    NestedTabberEnd,
    OptionalChoice,
    ImageFile,
    Unidentified,
}

impl SegmentType {
    pub const ALL: [SegmentType; 12] = [
        SegmentType::Dialogue,
        SegmentType::PlayerChoice,
        SegmentType::Narrative,
        SegmentType::Condition,
        SegmentType::TabberStart,
        SegmentType::TabberEnd,
        SegmentType::NestedTabberStart,
        SegmentType::NestedChoiceDelimiter,
        SegmentType::NestedTabberEnd,
        SegmentType::OptionalChoice,
        SegmentType::ImageFile,
        SegmentType::Unidentified,
    ];

    /// Short code used to build per-type ids such as `D3` or `NTS1`.
    pub fn prefix(self) -> &'static str {
        match self {
            SegmentType::Dialogue => "D",
            SegmentType::PlayerChoice => "PC",
            SegmentType::Narrative => "N",
            SegmentType::Condition => "C",
            SegmentType::TabberStart => "TS",
            SegmentType::TabberEnd => "TE",
            SegmentType::NestedTabberStart => "NTS",
            SegmentType::NestedChoiceDelimiter => "NTD",
            SegmentType::NestedTabberEnd => "NTE",
            SegmentType::OptionalChoice => "O",
            SegmentType::ImageFile => "I",
            SegmentType::Unidentified => "U",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentType::Dialogue => "Dialogue",
            SegmentType::PlayerChoice => "PlayerChoice",
            SegmentType::Narrative => "Narrative",
            SegmentType::Condition => "Condition",
            SegmentType::TabberStart => "TabberStart",
            SegmentType::TabberEnd => "TabberEnd",
            SegmentType::NestedTabberStart => "NestedTabberStart",
            SegmentType::NestedChoiceDelimiter => "NestedChoiceDelimiter",
            SegmentType::NestedTabberEnd => "NestedTabberEnd",
            SegmentType::OptionalChoice => "OptionalChoice",
            SegmentType::ImageFile => "ImageFile",
            SegmentType::Unidentified => "Unidentified",
        }
    }

    /// Position in [`SegmentType::ALL`], used to index per-type counters.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified, identified line of dialogue-section text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DialogueSegment {
    pub id: String,
    pub global_id: String,
    pub content: String,
    pub segment_type: SegmentType,
}

/// A quest object as produced by the upstream wiki extraction.
///
/// Only the name is typed; every other field is carried through untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuestRecord {
    #[serde(rename = "Quest_Name", default = "unknown_quest_name")]
    pub quest_name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn unknown_quest_name() -> String {
    "UnknownQuest".to_string()
}

/// A quest record decorated with its structured dialogue.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StructuredQuest {
    #[serde(flatten)]
    pub record: QuestRecord,
    /// Omitted from the output when the quest has no dialogue.
    #[serde(
        rename = "Structured_Dialogue",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub structured_dialogue: Vec<DialogueSegment>,
}

/// Flattened per-segment row for tabular export.
///
/// Quest context columns are copied from the quest record and are empty
/// strings when the record lacks them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DialogueRow {
    pub id: String,
    pub global_id: String,
    pub content: String,
    pub segment_type: SegmentType,
    #[serde(rename = "Quest_Name")]
    pub quest_name: String,
    #[serde(rename = "Chapter_Name")]
    pub chapter_name: String,
    #[serde(rename = "Chapter_Type")]
    pub chapter_type: String,
    #[serde(rename = "Quest_SequenceID")]
    pub quest_sequence_id: String,
    #[serde(rename = "Chapter_SequenceID")]
    pub chapter_sequence_id: String,
    /// `MemoryInfobox.location`
    #[serde(rename = "Quest_Location")]
    pub quest_location: String,
    /// `MemoryInfobox.date`
    #[serde(rename = "Quest_Date")]
    pub quest_date: String,
    #[serde(rename = "Speaker")]
    pub speaker: String,
    #[serde(rename = "Dialogue")]
    pub dialogue: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique_and_index_matches_all() {
        let mut seen = std::collections::HashSet::new();
        for (i, ty) in SegmentType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
            assert!(seen.insert(ty.prefix()), "duplicate prefix {}", ty.prefix());
        }
    }

    #[test]
    fn segment_type_serializes_to_declared_name() {
        for ty in SegmentType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn quest_record_keeps_unknown_fields_and_defaults_name() {
        let record: QuestRecord =
            serde_json::from_str(r#"{"Quest_ID": "42", "Section_Dialogue": "x"}"#).unwrap();
        assert_eq!(record.quest_name, "UnknownQuest");
        assert_eq!(record.fields["Quest_ID"], "42");

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["Quest_Name"], "UnknownQuest");
        assert_eq!(out["Section_Dialogue"], "x");
    }

    #[test]
    fn structured_dialogue_key_absent_when_empty() {
        let quest = StructuredQuest {
            record: QuestRecord {
                quest_name: "Quiet Harbor".to_string(),
                fields: Map::new(),
            },
            structured_dialogue: Vec::new(),
        };
        let out = serde_json::to_value(&quest).unwrap();
        assert_eq!(out["Quest_Name"], "Quiet Harbor");
        assert!(out.get("Structured_Dialogue").is_none());
    }
}
