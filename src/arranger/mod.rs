// Arranger - Beat pattern to MIDI rendering
// Places sequencer steps on a sixteenth-note grid and writes a Standard MIDI File

pub mod tables;
pub mod lanes;
pub mod midi;

// Re-export main types
pub use tables::{drum_note, resolve_scale, scale_for_root, DRUM_NOTES, SCALE_NOTES};
pub use lanes::{NoteLane, ArrangedNote, Arrangement, arrange_tracks};
pub use midi::{MidiExportOptions, RenderError, export_midi, render, render_with_options};
