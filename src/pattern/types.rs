// Beat Pattern Type Definitions
// One-bar, 16-step patterns as produced by the model and edited in the sequencer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::arranger::tables::{drum_note, MIDI_KICK};

/// Number of sixteenth-note steps in one bar
pub const STEPS_PER_BAR: usize = 16;

/// Volume used when a track does not carry one
pub const DEFAULT_VOLUME: f64 = 0.8;

/// Tempo used when a beat does not carry one
pub const DEFAULT_BPM: u32 = 120;

/// Key used when a beat does not carry one
pub const DEFAULT_KEY: &str = "C minor";

/// Errors for beats that cannot be decoded at all
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Beat must be a JSON object")]
    NotAnObject,

    #[error("Beat tracks must be a list")]
    TracksNotList,

    #[error("Invalid tempo: {0}")]
    InvalidTempo(String),
}

/// Role a track plays in the rendered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRole {
    /// Lead line, scale degrees in the key's octave
    Melody,

    /// Bass line, scale degrees one octave down
    Bass,

    /// Percussion voice with its GM drum note
    Drum(u8),
}

impl TrackRole {
    /// Classify a track id. Unknown ids become a kick-pitched drum.
    pub fn from_id(id: &str) -> Self {
        match id {
            "melody" => TrackRole::Melody,
            "bass" => TrackRole::Bass,
            other => TrackRole::Drum(drum_note(other).unwrap_or(MIDI_KICK)),
        }
    }
}

/// One instrument row of the sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Role id (kick, snare, hihat_closed, ..., bass, melody)
    #[serde(default)]
    pub id: String,

    /// Display name (e.g., "808 Kick")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Display color as hex (e.g., "#FF4757")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Step activations, one per sixteenth note
    #[serde(default = "default_steps")]
    pub steps: Vec<bool>,

    /// Track volume [0.0, 1.0]
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_steps() -> Vec<bool> {
    vec![false; STEPS_PER_BAR]
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

impl Track {
    /// Create a track with an explicit step pattern
    pub fn new(id: impl Into<String>, steps: Vec<bool>, volume: f64) -> Self {
        Track {
            id: id.into(),
            name: None,
            color: None,
            steps,
            volume,
        }
    }

    /// Create a track from the indices of its active steps
    pub fn with_active_steps(id: impl Into<String>, active: &[usize], volume: f64) -> Self {
        let mut steps = default_steps();
        for &i in active {
            if i >= steps.len() {
                steps.resize(i + 1, false);
            }
            steps[i] = true;
        }
        Track::new(id, steps, volume)
    }

    /// Decode a track from loosely-typed JSON
    ///
    /// Never fails: missing or mistyped fields fall back to an empty
    /// 16-step pattern, the default volume and a generic drum id.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            log::warn!("Track entry is not an object, treating it as silent");
            return Track::new("", default_steps(), DEFAULT_VOLUME);
        };

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let steps = match obj.get("steps").and_then(Value::as_array) {
            Some(entries) => entries.iter().map(step_is_active).collect(),
            None => default_steps(),
        };

        let volume = obj
            .get("volume")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VOLUME);

        Track {
            id,
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
            color: obj.get("color").and_then(Value::as_str).map(str::to_string),
            steps,
            volume,
        }
    }

    /// Role derived from the id
    pub fn role(&self) -> TrackRole {
        TrackRole::from_id(&self.id)
    }

    /// Number of active steps
    pub fn active_steps(&self) -> usize {
        self.steps.iter().filter(|&&s| s).count()
    }

    /// Whether the step at `index` exists and is active
    pub fn is_active(&self, index: usize) -> bool {
        self.steps.get(index).copied().unwrap_or(false)
    }

    /// MIDI velocity for this track's volume (0-127)
    pub fn velocity(&self) -> u8 {
        (self.volume.clamp(0.0, 1.0) * 127.0) as u8
    }
}

/// JSON truthiness for a single step entry
fn step_is_active(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// A complete one-bar beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatPattern {
    /// Creative beat name (used for the exported file name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short description of the beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Beats per minute
    pub bpm: u32,

    /// Musical key (e.g., "F# minor")
    pub key: String,

    /// Instrument rows
    pub tracks: Vec<Track>,
}

impl BeatPattern {
    /// Create a beat from its musical parts
    pub fn new(bpm: u32, key: impl Into<String>, tracks: Vec<Track>) -> Self {
        BeatPattern {
            name: None,
            description: None,
            bpm,
            key: key.into(),
            tracks,
        }
    }

    /// Decode a beat from loosely-typed JSON
    ///
    /// Individual tracks are decoded leniently; only a non-object beat, a
    /// non-list `tracks` field or an unusable `bpm` are rejected.
    pub fn from_value(value: &Value) -> Result<Self, PatternError> {
        let obj = value.as_object().ok_or(PatternError::NotAnObject)?;

        let tracks = match obj.get("tracks") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.iter().map(Track::from_value).collect(),
            Some(_) => return Err(PatternError::TracksNotList),
        };

        let bpm = match obj.get("bpm") {
            None | Some(Value::Null) => DEFAULT_BPM,
            Some(v) => parse_bpm(v)?,
        };

        let key = obj
            .get("key")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_KEY)
            .to_string();

        Ok(BeatPattern {
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
            description: obj.get("description").and_then(Value::as_str).map(str::to_string),
            bpm,
            key,
            tracks,
        })
    }

    /// First track with the given id
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

fn parse_bpm(value: &Value) -> Result<u32, PatternError> {
    let bpm = value
        .as_f64()
        .ok_or_else(|| PatternError::InvalidTempo(value.to_string()))?;

    if !bpm.is_finite() || bpm < 0.5 || bpm > u32::MAX as f64 {
        return Err(PatternError::InvalidTempo(value.to_string()));
    }

    Ok(bpm.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_role_classification() {
        assert_eq!(TrackRole::from_id("melody"), TrackRole::Melody);
        assert_eq!(TrackRole::from_id("bass"), TrackRole::Bass);
        assert_eq!(TrackRole::from_id("snare"), TrackRole::Drum(38));
        assert_eq!(TrackRole::from_id("crash"), TrackRole::Drum(49));
        // Unknown ids are generic drums on the kick note
        assert_eq!(TrackRole::from_id("cowbell"), TrackRole::Drum(36));
        assert_eq!(TrackRole::from_id(""), TrackRole::Drum(36));
    }

    #[test]
    fn test_track_from_value_full() {
        let track = Track::from_value(&json!({
            "id": "kick",
            "name": "808 Kick",
            "color": "#FF4757",
            "steps": [true, false, false, false, true, false, false, false,
                      true, false, false, false, true, false, false, false],
            "volume": 0.9
        }));

        assert_eq!(track.id, "kick");
        assert_eq!(track.name.as_deref(), Some("808 Kick"));
        assert_eq!(track.steps.len(), 16);
        assert_eq!(track.active_steps(), 4);
        assert_eq!(track.volume, 0.9);
    }

    #[test]
    fn test_track_from_value_defaults() {
        let track = Track::from_value(&json!({}));

        assert_eq!(track.id, "");
        assert_eq!(track.steps, vec![false; 16]);
        assert_eq!(track.volume, DEFAULT_VOLUME);
        assert_eq!(track.role(), TrackRole::Drum(36));
    }

    #[test]
    fn test_track_from_value_mistyped_fields() {
        let track = Track::from_value(&json!({
            "id": 7,
            "steps": "xxxx",
            "volume": "loud"
        }));

        assert_eq!(track.id, "");
        assert_eq!(track.steps, vec![false; 16]);
        assert_eq!(track.volume, DEFAULT_VOLUME);

        let not_an_object = Track::from_value(&json!(42));
        assert_eq!(not_an_object.active_steps(), 0);
    }

    #[test]
    fn test_step_truthiness() {
        let track = Track::from_value(&json!({
            "id": "snare",
            "steps": [1, 0, true, false, null, "yes", 0.5]
        }));

        assert_eq!(track.steps, vec![true, false, true, false, false, false, true]);
        assert!(track.is_active(0));
        assert!(!track.is_active(1));
        // Out of range reads as inactive
        assert!(!track.is_active(12));
    }

    #[test]
    fn test_velocity_scaling() {
        assert_eq!(Track::new("kick", vec![], 1.0).velocity(), 127);
        assert_eq!(Track::new("kick", vec![], 0.8).velocity(), 101);
        assert_eq!(Track::new("kick", vec![], 0.5).velocity(), 63);
        assert_eq!(Track::new("kick", vec![], 0.0).velocity(), 0);
        // Out of range volumes clamp
        assert_eq!(Track::new("kick", vec![], 1.7).velocity(), 127);
        assert_eq!(Track::new("kick", vec![], -0.2).velocity(), 0);
    }

    #[test]
    fn test_with_active_steps() {
        let track = Track::with_active_steps("melody", &[0, 4, 8], 0.7);
        assert_eq!(track.steps.len(), 16);
        assert_eq!(track.active_steps(), 3);
        assert!(track.is_active(4));
    }

    #[test]
    fn test_beat_from_value() {
        let beat = BeatPattern::from_value(&json!({
            "bpm": 92,
            "name": "Late Night",
            "key": "F# minor",
            "tracks": [
                {"id": "kick", "steps": [true], "volume": 1.0},
                {"id": "melody"}
            ]
        }))
        .unwrap();

        assert_eq!(beat.bpm, 92);
        assert_eq!(beat.key, "F# minor");
        assert_eq!(beat.name.as_deref(), Some("Late Night"));
        assert_eq!(beat.tracks.len(), 2);
        assert!(beat.track("melody").is_some());
        assert!(beat.track("snare").is_none());
    }

    #[test]
    fn test_beat_from_value_defaults() {
        let beat = BeatPattern::from_value(&json!({})).unwrap();

        assert_eq!(beat.bpm, DEFAULT_BPM);
        assert_eq!(beat.key, DEFAULT_KEY);
        assert!(beat.tracks.is_empty());
    }

    #[test]
    fn test_beat_from_value_rounds_bpm() {
        let beat = BeatPattern::from_value(&json!({"bpm": 127.6})).unwrap();
        assert_eq!(beat.bpm, 128);
    }

    #[test]
    fn test_beat_structural_errors() {
        assert!(matches!(
            BeatPattern::from_value(&json!([1, 2, 3])),
            Err(PatternError::NotAnObject)
        ));
        assert!(matches!(
            BeatPattern::from_value(&json!({"tracks": "kick"})),
            Err(PatternError::TracksNotList)
        ));
        assert!(matches!(
            BeatPattern::from_value(&json!({"bpm": "fast"})),
            Err(PatternError::InvalidTempo(_))
        ));
        assert!(matches!(
            BeatPattern::from_value(&json!({"bpm": -90})),
            Err(PatternError::InvalidTempo(_))
        ));
    }

    #[test]
    fn test_serde_defaults_match_lenient_decoding() {
        let track: Track = serde_json::from_value(json!({"id": "hihat_open"})).unwrap();
        assert_eq!(track, Track::from_value(&json!({"id": "hihat_open"})));
    }
}
