// Beat Quality Heuristics
// Rule-based checks on kick density, snare backbeat and tempo range

use serde::{Deserialize, Serialize};

use crate::pattern::Track;

pub const NO_KICK: &str = "No kick drum pattern detected";
pub const BUSY_KICK: &str = "Kick drum pattern may be too busy";
pub const SIMPLER_KICK: &str = "Try a simpler kick pattern for better groove";
pub const SNARE_BACKBEAT: &str = "Consider placing snare on beats 2 and 4 for more groove";
pub const TEMPO_TOO_SLOW: &str = "BPM is very slow, consider increasing it";
pub const TEMPO_TOO_FAST: &str = "BPM is very fast, consider slowing down";

/// Issues and suggestions for a beat, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatAnalysis {
    /// Detected problems
    pub issues: Vec<String>,

    /// Actionable advice
    pub suggestions: Vec<String>,
}

impl BeatAnalysis {
    /// True when no rule fired
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.suggestions.is_empty()
    }

    fn issue(&mut self, message: &str) {
        self.issues.push(message.to_string());
    }

    fn suggest(&mut self, message: &str) {
        self.suggestions.push(message.to_string());
    }
}

/// Thresholds for the quality rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Kick patterns with more active steps than this are flagged as busy
    pub max_kick_hits: usize,

    /// Slowest tempo accepted without an issue
    pub min_bpm: u32,

    /// Fastest tempo accepted without an issue
    pub max_bpm: u32,

    /// Step indices of beats 2 and 4 in a 16-step bar
    pub backbeat_steps: [usize; 2],
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_kick_hits: 8,
            min_bpm: 60,
            max_bpm: 200,
            backbeat_steps: [4, 12],
        }
    }
}

/// Analyse a beat with the default thresholds
pub fn analyze(tracks: &[Track], bpm: u32) -> BeatAnalysis {
    analyze_with_config(tracks, bpm, &AnalyzerConfig::default())
}

/// Analyse a beat and return quality issues and suggestions
///
/// Missing kick or snare tracks simply skip their rules.
pub fn analyze_with_config(tracks: &[Track], bpm: u32, config: &AnalyzerConfig) -> BeatAnalysis {
    let mut analysis = BeatAnalysis::default();

    let find = |id: &str| tracks.iter().find(|t| t.id == id);

    if let Some(kick) = find("kick") {
        check_kick(kick, config, &mut analysis);
    }

    if let Some(snare) = find("snare") {
        check_snare(snare, config, &mut analysis);
    }

    check_tempo(bpm, config, &mut analysis);

    log::debug!(
        "Beat analysis: {} issues, {} suggestions",
        analysis.issues.len(),
        analysis.suggestions.len()
    );

    analysis
}

fn check_kick(kick: &Track, config: &AnalyzerConfig, analysis: &mut BeatAnalysis) {
    let kick_count = kick.active_steps();

    if kick_count == 0 {
        analysis.issue(NO_KICK);
    } else if kick_count > config.max_kick_hits {
        analysis.issue(BUSY_KICK);
        analysis.suggest(SIMPLER_KICK);
    }
}

fn check_snare(snare: &Track, config: &AnalyzerConfig, analysis: &mut BeatAnalysis) {
    let [beat_two, beat_four] = config.backbeat_steps;

    // Patterns too short to reach beat 4 are not judged
    if snare.steps.len() <= beat_four {
        return;
    }

    if !snare.is_active(beat_two) && !snare.is_active(beat_four) {
        analysis.suggest(SNARE_BACKBEAT);
    }
}

fn check_tempo(bpm: u32, config: &AnalyzerConfig, analysis: &mut BeatAnalysis) {
    if bpm < config.min_bpm {
        analysis.issue(TEMPO_TOO_SLOW);
    } else if bpm > config.max_bpm {
        analysis.issue(TEMPO_TOO_FAST);
    }
}
