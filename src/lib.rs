// BeatMind - Prompt-driven step sequencer backend
// Module declarations

pub mod analysis;
pub mod arranger;
pub mod commands;
pub mod encoding;
pub mod genres;
pub mod pattern;

// Core operations
pub use analysis::{analyze, AnalyzerConfig, BeatAnalysis};
pub use arranger::{render, render_with_options, MidiExportOptions, RenderError};
pub use encoding::{base64_to_midi, midi_to_base64, EncodingError};
pub use pattern::{BeatPattern, BeatResponse, PatternError, ResponseError, Track, TrackRole};
