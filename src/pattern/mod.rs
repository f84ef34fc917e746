// Beat Pattern - Step-sequencer beat model
// Lenient decoding of model/UI JSON into tracks the renderer and analyzer consume

pub mod types;
pub mod response;

pub use types::{
    BeatPattern, Track, TrackRole, PatternError,
    STEPS_PER_BAR, DEFAULT_BPM, DEFAULT_KEY, DEFAULT_VOLUME,
};
pub use response::{BeatResponse, ResponseError, parse_beat_response};
