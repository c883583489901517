//! Extract → structure → export over a batch of quest records.
//!
//! Each stage takes and returns plain records. `run_pipeline` wires them to
//! the files named in a [`Config`].

use crate::config::Config;
use crate::error::Result;
use crate::parsing::speaker::extract_speaker_and_utterance;
use crate::quest_io::{load_quests, save_json};
use crate::structurer::DialogueStructurer;
use crate::types::segment::{DialogueRow, QuestRecord, SegmentType, StructuredQuest};
use log::{debug, info, warn};
use serde_json::{Map, Value};

/// Counts gathered over one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub quests_processed: usize,
    pub quests_without_dialogue: usize,
    pub total_segments: usize,
    pub unidentified_segments: usize,
}

/// Returns the quest's dialogue text, or `None` when the field is missing,
/// not a string, or empty.
pub fn extract_dialogue<'a>(record: &'a QuestRecord, dialogue_key: &str) -> Option<&'a str> {
    match record.fields.get(dialogue_key) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            warn!(
                "Quest '{}': field '{}' is not a string ({}), treating as no dialogue",
                record.quest_name,
                dialogue_key,
                json_kind(other)
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Structures one quest with its own structurer, so ids restart at 1.
pub fn structure_quest(record: QuestRecord, dialogue_key: &str) -> StructuredQuest {
    let text = extract_dialogue(&record, dialogue_key);
    if text.is_none() {
        info!("No '{}' found for quest: {}", dialogue_key, record.quest_name);
    }

    let mut structurer = DialogueStructurer::new();
    let structured_dialogue = structurer.process(text);

    let counters = structurer.counters();
    let unidentified = counters.count_of(SegmentType::Unidentified);
    if unidentified > 0 {
        debug!(
            "Quest '{}': {} of {} segments unidentified",
            record.quest_name,
            unidentified,
            counters.global()
        );
    }

    StructuredQuest {
        record,
        structured_dialogue,
    }
}

/// Renders a context field for a row column: strings verbatim, other
/// scalars in their JSON form, missing or null as empty.
fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Per-quest columns shared by every row of that quest.
struct QuestContext {
    quest_name: String,
    chapter_name: String,
    chapter_type: String,
    quest_sequence_id: String,
    chapter_sequence_id: String,
    quest_location: String,
    quest_date: String,
}

impl QuestContext {
    fn of(record: &QuestRecord) -> Self {
        let infobox = match record.fields.get("MemoryInfobox") {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        };
        let from_infobox =
            |key: &str| infobox.map_or_else(String::new, |map| field_text(map, key));

        QuestContext {
            quest_name: record.quest_name.clone(),
            chapter_name: field_text(&record.fields, "Chapter_Name"),
            chapter_type: field_text(&record.fields, "Chapter_Type"),
            quest_sequence_id: field_text(&record.fields, "Quest_SequenceID"),
            chapter_sequence_id: field_text(&record.fields, "Chapter_SequenceID"),
            quest_location: from_infobox("location"),
            quest_date: from_infobox("date"),
        }
    }
}

/// One row per segment, decorated with the quest's context columns. Speaker
/// and dialogue columns are filled for `Dialogue` segments only.
pub fn flatten_rows(quests: &[StructuredQuest]) -> Vec<DialogueRow> {
    quests
        .iter()
        .flat_map(|quest| {
            let context = QuestContext::of(&quest.record);
            quest.structured_dialogue.iter().map(move |segment| {
                let (speaker, dialogue) = if segment.segment_type == SegmentType::Dialogue {
                    extract_speaker_and_utterance(&segment.content).unwrap_or_default()
                } else {
                    (String::new(), String::new())
                };
                DialogueRow {
                    id: segment.id.clone(),
                    global_id: segment.global_id.clone(),
                    content: segment.content.clone(),
                    segment_type: segment.segment_type,
                    quest_name: context.quest_name.clone(),
                    chapter_name: context.chapter_name.clone(),
                    chapter_type: context.chapter_type.clone(),
                    quest_sequence_id: context.quest_sequence_id.clone(),
                    chapter_sequence_id: context.chapter_sequence_id.clone(),
                    quest_location: context.quest_location.clone(),
                    quest_date: context.quest_date.clone(),
                    speaker,
                    dialogue,
                }
            })
        })
        .collect()
}

/// Structures a whole batch and tallies the run.
pub fn structure_all(
    quests: Vec<QuestRecord>,
    dialogue_key: &str,
) -> (Vec<StructuredQuest>, PipelineSummary) {
    let mut summary = PipelineSummary::default();
    let structured: Vec<StructuredQuest> = quests
        .into_iter()
        .map(|record| structure_quest(record, dialogue_key))
        .inspect(|quest| {
            summary.quests_processed += 1;
            if quest.structured_dialogue.is_empty() {
                summary.quests_without_dialogue += 1;
            }
            summary.total_segments += quest.structured_dialogue.len();
            summary.unidentified_segments += quest
                .structured_dialogue
                .iter()
                .filter(|s| s.segment_type == SegmentType::Unidentified)
                .count();
        })
        .collect();
    (structured, summary)
}

pub fn run_pipeline(config: &Config) -> Result<PipelineSummary> {
    info!("Loading quests from {}", config.input_path.display());
    let quests = load_quests(&config.input_path)?;
    info!("Loaded {} quest(s)", quests.len());

    let (structured, summary) = structure_all(quests, &config.dialogue_key);

    save_json(&structured, &config.output_path, config.pretty)?;
    info!("Saved structured quests to {}", config.output_path.display());

    if let Some(rows_path) = &config.rows_output_path {
        let rows = flatten_rows(&structured);
        save_json(&rows, rows_path, config.pretty)?;
        info!("Saved {} dialogue row(s) to {}", rows.len(), rows_path.display());
    }

    info!(
        "Processed {} quest(s): {} without '{}', {} segment(s), {} unidentified",
        summary.quests_processed,
        summary.quests_without_dialogue,
        config.dialogue_key,
        summary.total_segments,
        summary.unidentified_segments
    );
    Ok(summary)
}
