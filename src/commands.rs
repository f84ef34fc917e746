// Command Surface
// Request/response entry points used by the HTTP layer and the CLI
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::analysis::{self, BeatAnalysis};
use crate::arranger;
use crate::encoding;
use crate::genres::{self, Genre};
use crate::pattern::{self, BeatPattern, BeatResponse};

/// MIME type of rendered files
pub const MIDI_MIME_TYPE: &str = "audio/midi";

/// File stem used when a beat has no name
pub const DEFAULT_FILE_STEM: &str = "beatmind";

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<E: std::fmt::Display> From<E> for CommandError {
    fn from(error: E) -> Self {
        CommandError {
            message: error.to_string(),
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

// ==================== MIDI COMMANDS ====================

#[derive(Debug, Deserialize)]
pub struct ExportMidiInput {
    pub beat: Value,
}

/// A rendered file ready for download or JSON transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiExport {
    pub filename: String,
    pub mime_type: String,
    pub data_base64: String,
    pub size_bytes: usize,
}

impl MidiExport {
    /// Decode the payload back to raw MIDI bytes
    pub fn bytes(&self) -> CommandResult<Vec<u8>> {
        Ok(encoding::base64_to_midi(&self.data_base64)?)
    }
}

/// Render a beat to a MIDI file
pub fn export_midi_command(input: ExportMidiInput) -> CommandResult<MidiExport> {
    let beat = BeatPattern::from_value(&input.beat)?;
    export_beat(&beat)
}

/// Render an already-decoded beat to a MIDI file
pub fn export_beat(beat: &BeatPattern) -> CommandResult<MidiExport> {
    let midi_bytes = arranger::render(&beat.tracks, beat.bpm, &beat.key)
        .map_err(|e| CommandError {
            message: format!("Failed to export MIDI: {}", e),
        })?;

    Ok(MidiExport {
        filename: midi_filename(beat.name.as_deref()),
        mime_type: MIDI_MIME_TYPE.to_string(),
        data_base64: encoding::midi_to_base64(&midi_bytes),
        size_bytes: midi_bytes.len(),
    })
}

/// Download name for a beat: `<name>.mid`, without path separators
pub fn midi_filename(name: Option<&str>) -> String {
    let stem: String = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_STEM)
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();

    format!("{}.mid", stem)
}

/// Write rendered MIDI bytes to disk
pub fn save_midi(path: &Path, midi_bytes: &[u8]) -> CommandResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, midi_bytes)?;

    log::info!("Saved MIDI file: {} ({} bytes)", path.display(), midi_bytes.len());
    Ok(())
}

// ==================== ANALYSIS COMMANDS ====================

#[derive(Debug, Deserialize)]
pub struct AnalyzeBeatInput {
    pub beat: Value,
}

/// Check a beat for groove and tempo problems
pub fn analyze_beat_command(input: AnalyzeBeatInput) -> CommandResult<BeatAnalysis> {
    let beat = BeatPattern::from_value(&input.beat)?;
    Ok(analysis::analyze(&beat.tracks, beat.bpm))
}

// ==================== RESPONSE COMMANDS ====================

/// Read a beat out of a raw model reply
pub fn parse_beat_response_command(text: &str) -> CommandResult<BeatResponse> {
    let response = pattern::parse_beat_response(text)?;

    log::info!(
        "Parsed beat {:?}: {} BPM, {} tracks",
        response.beat.name.as_deref().unwrap_or("untitled"),
        response.beat.bpm,
        response.beat.tracks.len()
    );

    Ok(response)
}

/// Accept either a bare beat object or a full reply with a `beat` field
pub fn beat_from_document(document: &Value) -> CommandResult<BeatPattern> {
    let beat = match document.get("beat") {
        Some(inner) if inner.is_object() => inner,
        _ => document,
    };
    Ok(BeatPattern::from_value(beat)?)
}

// ==================== GENRE COMMANDS ====================

/// List all available genres
pub fn list_genres_command() -> CommandResult<Vec<Genre>> {
    Ok(genres::list_genres())
}

/// Get a specific genre by id
pub fn get_genre_command(id: String) -> CommandResult<Option<Genre>> {
    Ok(genres::get_genre(&id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_beat() -> Value {
        json!({
            "bpm": 128,
            "name": "Warehouse",
            "key": "A minor",
            "tracks": [
                {"id": "kick", "steps": [true, false, false, false, true, false, false, false,
                                         true, false, false, false, true, false, false, false], "volume": 1.0},
                {"id": "snare", "steps": [false, false, false, false, true, false, false, false,
                                          false, false, false, false, true, false, false, false], "volume": 0.8},
                {"id": "bass", "steps": [true, false, false, true], "volume": 0.7},
                {"id": "melody"}
            ]
        })
    }

    #[test]
    fn test_export_midi_command() {
        let result = export_midi_command(ExportMidiInput { beat: sample_beat() });

        assert!(result.is_ok());
        let export = result.unwrap();
        assert_eq!(export.filename, "Warehouse.mid");
        assert_eq!(export.mime_type, "audio/midi");

        let bytes = export.bytes().unwrap();
        assert_eq!(bytes.len(), export.size_bytes);
        assert!(midly::Smf::parse(&bytes).is_ok());
    }

    #[test]
    fn test_export_rejects_structural_errors() {
        let result = export_midi_command(ExportMidiInput { beat: json!({"tracks": {"kick": []}}) });
        let err = result.unwrap_err();
        assert_eq!(err.message(), "Beat tracks must be a list");

        let result = export_midi_command(ExportMidiInput { beat: json!({"bpm": 2}) });
        assert!(result.unwrap_err().message().starts_with("Failed to export MIDI"));
    }

    #[test]
    fn test_midi_filename() {
        assert_eq!(midi_filename(Some("Night Drive")), "Night Drive.mid");
        assert_eq!(midi_filename(Some("  ")), "beatmind.mid");
        assert_eq!(midi_filename(None), "beatmind.mid");
        assert_eq!(midi_filename(Some("../etc/passwd")), ".._etc_passwd.mid");
    }

    #[test]
    fn test_save_midi() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("beat.mid");
        let export = export_midi_command(ExportMidiInput { beat: sample_beat() }).unwrap();
        let bytes = export.bytes().unwrap();

        let result = save_midi(&path, &bytes);
        assert!(result.is_ok());
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_analyze_beat_command() {
        let analysis = analyze_beat_command(AnalyzeBeatInput { beat: sample_beat() }).unwrap();
        assert!(analysis.is_clean());

        let slow = analyze_beat_command(AnalyzeBeatInput { beat: json!({"bpm": 45}) }).unwrap();
        assert_eq!(slow.issues.len(), 1);
    }

    #[test]
    fn test_parse_beat_response_command() {
        let reply = format!("```json\n{}\n```", json!({"beat": sample_beat(), "explanation": "Solid."}));
        let response = parse_beat_response_command(&reply).unwrap();
        assert_eq!(response.beat.bpm, 128);
        assert_eq!(response.explanation.as_deref(), Some("Solid."));

        let err = parse_beat_response_command("not json").unwrap_err();
        assert!(err.message().starts_with("JSON parse error:"));
    }

    #[test]
    fn test_beat_from_document() {
        let bare = beat_from_document(&sample_beat()).unwrap();
        let wrapped = beat_from_document(&json!({"beat": sample_beat(), "theory_tip": "x"})).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_genre_commands() {
        assert_eq!(list_genres_command().unwrap().len(), 8);
        assert!(get_genre_command("house".to_string()).unwrap().is_some());
    }
}
