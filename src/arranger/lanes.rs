// Note Lanes - Places step-sequencer tracks onto timed MIDI note lanes
// Drums go to the percussion lane, melody and bass share the melodic lane

use serde::{Deserialize, Serialize};

use crate::pattern::{Track, TrackRole};
use super::tables::resolve_scale;

/// Length of one step in beats (a sixteenth note)
pub const STEP_BEATS: f64 = 0.25;

/// Melodic notes ring past the next step's onset
pub const MELODIC_GATE: f64 = 1.8;

/// Drum hits stop short of the next step
pub const DRUM_GATE: f64 = 0.9;

/// GM percussion channel (channel 10, 0-indexed)
pub const DRUM_CHANNEL: u8 = 9;

/// Channel used for melody and bass
pub const MELODIC_CHANNEL: u8 = 0;

pub const DRUM_LANE_NAME: &str = "Drums";
pub const MELODIC_LANE_NAME: &str = "Melody/Bass";

/// A lane of notes that becomes one MIDI track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteLane {
    /// Lane name, written as the MIDI track name
    pub name: String,

    /// MIDI channel (0-15)
    pub channel: u8,

    /// All notes in this lane
    pub events: Vec<ArrangedNote>,
}

impl NoteLane {
    /// Create a new empty lane
    pub fn new(name: impl Into<String>, channel: u8) -> Self {
        NoteLane {
            name: name.into(),
            channel,
            events: Vec::new(),
        }
    }

    /// Add a note to this lane
    pub fn add_note(&mut self, note: ArrangedNote) {
        self.events.push(note);
    }

    /// Sort notes by start time
    pub fn sort_by_time(&mut self) {
        self.events.sort_by(|a, b| {
            a.start_beats
                .partial_cmp(&b.start_beats)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// End of the last sounding note, in beats
    pub fn end_beats(&self) -> f64 {
        self.events
            .iter()
            .map(|n| n.start_beats + n.duration_beats)
            .fold(0.0, f64::max)
    }
}

/// A placed note with musical timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangedNote {
    /// MIDI note number
    pub key: u8,

    /// Onset in beats from the start of the bar
    pub start_beats: f64,

    /// Duration in beats
    pub duration_beats: f64,

    /// MIDI velocity (0-127)
    pub velocity: u8,
}

impl ArrangedNote {
    pub fn new(key: u8, start_beats: f64, duration_beats: f64, velocity: u8) -> Self {
        ArrangedNote {
            key: key.min(127),
            start_beats,
            duration_beats,
            velocity: velocity.min(127),
        }
    }
}

/// Both lanes of a rendered beat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrangement {
    /// Percussion lane (MIDI track 0, channel 9)
    pub drums: NoteLane,

    /// Melody and bass lane (MIDI track 1, channel 0)
    pub melodic: NoteLane,
}

impl Arrangement {
    /// Create an arrangement with two empty lanes
    pub fn new() -> Self {
        Arrangement {
            drums: NoteLane::new(DRUM_LANE_NAME, DRUM_CHANNEL),
            melodic: NoteLane::new(MELODIC_LANE_NAME, MELODIC_CHANNEL),
        }
    }

    /// Total number of notes across both lanes
    pub fn note_count(&self) -> usize {
        self.drums.events.len() + self.melodic.events.len()
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::new()
    }
}

/// Onset of step `index` in beats
pub fn step_start(index: usize) -> f64 {
    index as f64 * STEP_BEATS
}

/// Arrange tracks into drum and melodic lanes
///
/// Melodic tracks walk the key's scale: each active step takes the next
/// scale degree, wrapping after the last one; bass sits an octave lower.
/// Every other id is a drum hit on its GM note.
///
/// # Arguments
/// * `tracks` - Sequencer tracks, in any order
/// * `key` - Musical key; only the root before the first space is used
pub fn arrange_tracks(tracks: &[Track], key: &str) -> Arrangement {
    let scale = resolve_scale(key);
    let mut arrangement = Arrangement::new();

    for track in tracks {
        let velocity = track.velocity();
        let role = track.role();

        match role {
            TrackRole::Melody | TrackRole::Bass => {
                let mut note_idx = 0;
                for (i, _) in track.steps.iter().enumerate().filter(|(_, active)| **active) {
                    let mut pitch = scale[note_idx % scale.len()];
                    if role == TrackRole::Bass {
                        pitch = pitch.saturating_sub(12);
                    }

                    arrangement.melodic.add_note(ArrangedNote::new(
                        pitch,
                        step_start(i),
                        STEP_BEATS * MELODIC_GATE,
                        velocity,
                    ));
                    note_idx += 1;
                }

                log::debug!("Arranged {} notes for melodic track {:?}", note_idx, track.id);
            }

            TrackRole::Drum(drum_note) => {
                for (i, _) in track.steps.iter().enumerate().filter(|(_, active)| **active) {
                    arrangement.drums.add_note(ArrangedNote::new(
                        drum_note,
                        step_start(i),
                        STEP_BEATS * DRUM_GATE,
                        velocity,
                    ));
                }

                log::debug!(
                    "Arranged {} hits for drum track {:?} on note {}",
                    track.active_steps(),
                    track.id,
                    drum_note
                );
            }
        }
    }

    arrangement.drums.sort_by_time();
    arrangement.melodic.sort_by_time();

    arrangement
}
