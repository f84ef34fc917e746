// Lookup Tables - General MIDI drum map and per-root scale tables
// Fixed data consulted by the renderer; extend here to add instrument roles

/// General Music MIDI note numbers for drums
pub const MIDI_KICK: u8 = 36;       // C1
pub const MIDI_SNARE: u8 = 38;      // D1
pub const MIDI_CLAP: u8 = 39;       // D#1
pub const MIDI_CLOSED_HIHAT: u8 = 42; // F#1
pub const MIDI_OPEN_HIHAT: u8 = 46;  // A#1
pub const MIDI_BASS_DRUM: u8 = 35;  // B0 (acoustic bass drum)
pub const MIDI_RIM: u8 = 37;        // C#1 (side stick)
pub const MIDI_CRASH: u8 = 49;      // C#2
pub const MIDI_RIDE: u8 = 51;       // D#2

/// Drum role id -> GM percussion note
pub const DRUM_NOTES: [(&str, u8); 9] = [
    ("kick", MIDI_KICK),
    ("snare", MIDI_SNARE),
    ("hihat_closed", MIDI_CLOSED_HIHAT),
    ("hihat_open", MIDI_OPEN_HIHAT),
    ("bass", MIDI_BASS_DRUM),
    ("clap", MIDI_CLAP),
    ("rim", MIDI_RIM),
    ("crash", MIDI_CRASH),
    ("ride", MIDI_RIDE),
];

/// Root used when a key cannot be resolved
pub const DEFAULT_ROOT: &str = "C";

/// Root note -> eight ascending scale degrees, used cyclically
pub const SCALE_NOTES: [(&str, [u8; 8]); 12] = [
    ("C",  [48, 50, 52, 53, 55, 57, 59, 60]),
    ("C#", [49, 51, 53, 54, 56, 58, 60, 61]),
    ("D",  [50, 52, 54, 55, 57, 59, 61, 62]),
    ("D#", [51, 53, 55, 56, 58, 60, 62, 63]),
    ("E",  [52, 54, 56, 57, 59, 61, 63, 64]),
    ("F",  [53, 55, 57, 58, 60, 62, 64, 65]),
    ("F#", [54, 56, 58, 59, 61, 63, 65, 66]),
    ("G",  [55, 57, 59, 60, 62, 64, 66, 67]),
    ("G#", [56, 58, 60, 61, 63, 65, 67, 68]),
    ("A",  [57, 59, 61, 62, 64, 66, 68, 69]),
    ("A#", [58, 60, 62, 63, 65, 67, 69, 70]),
    ("B",  [59, 61, 63, 64, 66, 68, 70, 71]),
];

/// Look up the GM percussion note for a drum role id
pub fn drum_note(id: &str) -> Option<u8> {
    DRUM_NOTES
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, note)| *note)
}

/// Look up the scale for a root note name (sharps only, case-sensitive)
pub fn scale_for_root(root: &str) -> Option<&'static [u8; 8]> {
    SCALE_NOTES
        .iter()
        .find(|(name, _)| *name == root)
        .map(|(_, scale)| scale)
}

/// Resolve the scale for a key such as "F# minor"
///
/// Only the token before the first space is used; a key without a space is
/// taken whole. Unknown roots (including flat spellings like "Eb") fall back
/// to the C table.
pub fn resolve_scale(key: &str) -> &'static [u8; 8] {
    let root = if key.contains(' ') {
        key.split_whitespace().next().unwrap_or("")
    } else {
        key
    };

    match scale_for_root(root) {
        Some(scale) => scale,
        None => {
            log::debug!("Unrecognized key root {:?}, using {} scale", root, DEFAULT_ROOT);
            &SCALE_NOTES[0].1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drum_note_lookup() {
        assert_eq!(drum_note("kick"), Some(36));
        assert_eq!(drum_note("snare"), Some(38));
        assert_eq!(drum_note("hihat_closed"), Some(42));
        assert_eq!(drum_note("hihat_open"), Some(46));
        assert_eq!(drum_note("ride"), Some(51));
        assert_eq!(drum_note("cowbell"), None);
    }

    #[test]
    fn test_scale_tables_ascend() {
        for (root, scale) in SCALE_NOTES.iter() {
            assert!(
                scale.windows(2).all(|w| w[0] < w[1]),
                "Scale for {} should be strictly ascending",
                root
            );
            // Root and its octave bracket the table
            assert_eq!(scale[7], scale[0] + 12, "Scale for {} should span an octave", root);
        }
    }

    #[test]
    fn test_resolve_scale_uses_root_token() {
        assert_eq!(resolve_scale("F# minor")[0], 54);
        assert_eq!(resolve_scale("A")[0], 57);
        assert_eq!(resolve_scale("  D major")[0], 50);
    }

    #[test]
    fn test_resolve_scale_fallback() {
        let c_scale = scale_for_root("C").unwrap();
        assert_eq!(resolve_scale("H minor"), c_scale);
        assert_eq!(resolve_scale("Eb major"), c_scale);
        assert_eq!(resolve_scale("c minor"), c_scale);
        assert_eq!(resolve_scale(""), c_scale);
    }

    #[test]
    fn test_resolve_scale_needs_a_space_separator() {
        let c_scale = scale_for_root("C").unwrap();
        assert_eq!(resolve_scale("D\tminor"), c_scale);
        assert_eq!(resolve_scale("D\nmajor"), c_scale);
        assert_eq!(resolve_scale("D \tminor")[0], 50);
    }
}
