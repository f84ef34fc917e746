// MIDI Export - Convert beat patterns to MIDI files using midly crate
// Produces a two-track Standard MIDI File: GM drums and a melodic bass/lead track

use serde::{Deserialize, Serialize};
use midly::{Smf, Header, Track, TrackEvent, TrackEventKind, MetaMessage, MidiMessage, Timing};
use thiserror::Error;

use crate::pattern::{Track as PatternTrack, STEPS_PER_BAR};
use super::lanes::{arrange_tracks, Arrangement, NoteLane, STEP_BEATS};

/// General MIDI program for the melodic track (Synth Bass 1)
pub const MELODIC_PROGRAM: u8 = 38;

/// Largest tempo a Set Tempo meta event can hold (24 bits)
const MAX_US_PER_QUARTER: u32 = 0xFF_FFFF;

/// Largest metrical division a MIDI header can hold (15 bits)
pub const MAX_PPQ: u16 = 0x7FFF;

/// Errors that can occur while rendering MIDI
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(u32),

    #[error("Invalid resolution: {0} ticks per quarter note (expected 1-32767)")]
    InvalidPpq(u16),

    #[error("Failed to write MIDI: {0}")]
    Write(String),
}

/// MIDI export options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiExportOptions {
    /// Pulses per quarter note (PPQ)
    /// 960 gives every step and gate length an exact tick count
    pub ppq: u16,

    /// Include tempo metadata on each track
    pub include_tempo: bool,

    /// Include a 4/4 time signature on the drum track
    pub include_time_signature: bool,

    /// Include track names
    pub track_names: bool,

    /// Program assigned to the melodic track
    pub melodic_program: u8,
}

impl Default for MidiExportOptions {
    fn default() -> Self {
        MidiExportOptions {
            ppq: 960,
            include_tempo: true,
            include_time_signature: false,
            track_names: true,
            melodic_program: MELODIC_PROGRAM,
        }
    }
}

/// Render tracks to MIDI file bytes with default options
///
/// # Arguments
/// * `tracks` - Sequencer tracks (drums, bass, melody)
/// * `bpm` - Tempo in beats per minute
/// * `key` - Musical key, e.g. "F# minor"
///
/// # Returns
/// MIDI file bytes ready to be written to disk or encoded for transport
pub fn render(tracks: &[PatternTrack], bpm: u32, key: &str) -> Result<Vec<u8>, RenderError> {
    render_with_options(tracks, bpm, key, &MidiExportOptions::default())
}

/// Render tracks to MIDI file bytes
pub fn render_with_options(
    tracks: &[PatternTrack],
    bpm: u32,
    key: &str,
    options: &MidiExportOptions,
) -> Result<Vec<u8>, RenderError> {
    let arrangement = arrange_tracks(tracks, key);
    let bytes = export_midi(&arrangement, bpm, options)?;

    log::info!(
        "Rendered {} tracks ({} notes) at {} BPM in {:?}: {} bytes",
        tracks.len(),
        arrangement.note_count(),
        bpm,
        key,
        bytes.len()
    );

    Ok(bytes)
}

/// Export an arrangement to MIDI file bytes
///
/// Track 0 holds the drum lane, track 1 the melodic lane. Both carry the
/// tempo at tick 0.
pub fn export_midi(
    arrangement: &Arrangement,
    bpm: u32,
    options: &MidiExportOptions,
) -> Result<Vec<u8>, RenderError> {
    let us_per_quarter = us_per_quarter(bpm)?;
    if options.ppq == 0 || options.ppq > MAX_PPQ {
        return Err(RenderError::InvalidPpq(options.ppq));
    }

    // Create MIDI header
    let timing = Timing::Metrical(options.ppq.into());
    let header = Header {
        format: midly::Format::Parallel,
        timing,
    };

    let bar_end_tick = beats_to_ticks(STEPS_PER_BAR as f64 * STEP_BEATS, options.ppq);

    let mut tracks = Vec::new();

    // Track 0: Drums
    let mut preamble = Vec::new();
    if options.include_time_signature {
        preamble.push(time_signature_event());
    }
    tracks.push(create_lane_track(
        &arrangement.drums,
        us_per_quarter,
        preamble,
        bar_end_tick,
        options,
    ));

    // Track 1: Melody/Bass with its instrument
    let program_change = TrackEventKind::Midi {
        channel: arrangement.melodic.channel.into(),
        message: MidiMessage::ProgramChange {
            program: options.melodic_program.into(),
        },
    };
    tracks.push(create_lane_track(
        &arrangement.melodic,
        us_per_quarter,
        vec![program_change],
        bar_end_tick,
        options,
    ));

    // Create SMF
    let smf = Smf {
        header,
        tracks,
    };

    // Write to bytes
    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| RenderError::Write(e.to_string()))?;

    Ok(bytes)
}

/// Ordering of events that share a tick: setup, then releases, then onsets
const PRIORITY_SETUP: u8 = 0;
const PRIORITY_NOTE_OFF: u8 = 1;
const PRIORITY_NOTE_ON: u8 = 2;

/// Create a MIDI track for a lane
fn create_lane_track<'a>(
    lane: &'a NoteLane,
    us_per_quarter: u32,
    preamble: Vec<TrackEventKind<'a>>,
    bar_end_tick: u32,
    options: &MidiExportOptions,
) -> Track<'a> {
    let mut track = Track::new();
    let mut events: Vec<(u32, u8, TrackEventKind<'a>)> = Vec::new();

    // Add track name
    if options.track_names {
        events.push((0, PRIORITY_SETUP, TrackEventKind::Meta(MetaMessage::TrackName(
            lane.name.as_bytes()
        ))));
    }

    // Add tempo
    if options.include_tempo {
        events.push((0, PRIORITY_SETUP, TrackEventKind::Meta(MetaMessage::Tempo(
            us_per_quarter.into()
        ))));
    }

    for kind in preamble {
        events.push((0, PRIORITY_SETUP, kind));
    }

    // Add note events
    for note in &lane.events {
        let tick_on = beats_to_ticks(note.start_beats, options.ppq);
        let tick_off = beats_to_ticks(note.start_beats + note.duration_beats, options.ppq);

        // Note On
        events.push((
            tick_on,
            PRIORITY_NOTE_ON,
            TrackEventKind::Midi {
                channel: lane.channel.into(),
                message: MidiMessage::NoteOn {
                    key: note.key.into(),
                    vel: note.velocity.into(),
                },
            },
        ));

        // Note Off
        events.push((
            tick_off,
            PRIORITY_NOTE_OFF,
            TrackEventKind::Midi {
                channel: lane.channel.into(),
                message: MidiMessage::NoteOff {
                    key: note.key.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    // Sort events by tick (absolute time), stable within a priority
    events.sort_by_key(|(tick, priority, _)| (*tick, *priority));

    // Convert to delta times and add to track
    let mut last_tick = 0;
    for (tick, _, kind) in events {
        let delta = tick.saturating_sub(last_tick);
        track.push(TrackEvent {
            delta: delta.into(),
            kind,
        });
        last_tick = tick;
    }

    // End of track, no earlier than the end of the bar so loops stay aligned
    let end_tick = last_tick.max(bar_end_tick);
    add_end_of_track(&mut track, end_tick - last_tick);

    track
}

/// Convert a position in beats to ticks
fn beats_to_ticks(beats: f64, ppq: u16) -> u32 {
    (beats * ppq as f64).round().max(0.0) as u32
}

/// Microseconds per quarter note for a tempo
fn us_per_quarter(bpm: u32) -> Result<u32, RenderError> {
    if bpm == 0 {
        return Err(RenderError::InvalidTempo(bpm));
    }

    let us = 60_000_000 / bpm;
    if us > MAX_US_PER_QUARTER {
        return Err(RenderError::InvalidTempo(bpm));
    }

    Ok(us)
}

/// 4/4 time signature meta message
fn time_signature_event<'a>() -> TrackEventKind<'a> {
    let numerator = 4u8;
    let denominator = 2u8; // 2^2 = 4 (quarter note)

    // MIDI clocks per metronome click (24 for quarter note)
    let clocks_per_click = 24u8;

    // 32nd notes per quarter note (8)
    let thirty_seconds_per_quarter = 8u8;

    TrackEventKind::Meta(MetaMessage::TimeSignature(
        numerator,
        denominator,
        clocks_per_click,
        thirty_seconds_per_quarter,
    ))
}

/// Add end of track message
fn add_end_of_track(track: &mut Track<'_>, delta: u32) {
    track.push(TrackEvent {
        delta: delta.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
}
