use crate::error::{Error, Result};
use crate::types::segment::QuestRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Loads the JSON array of quest objects written by the extraction step.
pub fn load_quests(file_path: &Path) -> Result<Vec<QuestRecord>> {
    let file = File::open(file_path).map_err(|source| Error::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| Error::Json {
        path: file_path.to_path_buf(),
        source,
    })
}

/// Writes any serializable value as JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(value: &T, file_path: &Path, pretty: bool) -> Result<()> {
    let io_err = |source: std::io::Error| Error::Io {
        path: file_path.to_path_buf(),
        source,
    };

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(file_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    written.map_err(|source| Error::Json {
        path: file_path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_quest_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quests.json");

        let quests: Vec<QuestRecord> = serde_json::from_str(
            r#"[{"Quest_Name": "Odyssey", "Section_Dialogue": "Prose."}, {"Quest_ID": "7"}]"#,
        )
        .unwrap();
        save_json(&quests, &path, true).unwrap();

        let loaded = load_quests(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].quest_name, "Odyssey");
        assert_eq!(loaded[1].quest_name, "UnknownQuest");
        assert_eq!(loaded[1].fields["Quest_ID"], "7");
    }

    #[test]
    fn missing_input_is_io_error() {
        let err = load_quests(Path::new("/no/such/quests.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn malformed_input_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_quests(&path).unwrap_err(), Error::Json { .. }));
    }
}
