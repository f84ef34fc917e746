// Transport Encoding - Base64 for MIDI payloads
// Lets rendered files travel inside JSON responses

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Convert MIDI bytes to a base64 string
pub fn midi_to_base64(midi_bytes: &[u8]) -> String {
    STANDARD.encode(midi_bytes)
}

/// Convert a base64 string back to MIDI bytes
pub fn base64_to_midi(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(STANDARD.decode(encoded.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        // Standard MIDI File header chunk id
        assert_eq!(midi_to_base64(b"MThd"), "TVRoZA==");
        assert_eq!(midi_to_base64(&[]), "");
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let bytes: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        let decoded = base64_to_midi(&midi_to_base64(&bytes)).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_round_trip_rendered_file() {
        let tracks = vec![crate::pattern::Track::with_active_steps("kick", &[0, 8], 0.9)];
        let midi = crate::arranger::render(&tracks, 120, "C").unwrap();

        assert_eq!(base64_to_midi(&midi_to_base64(&midi)).unwrap(), midi);
    }

    #[test]
    fn test_invalid_payload() {
        assert!(base64_to_midi("not base64!").is_err());
    }
}
