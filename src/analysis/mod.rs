// Beat Analysis - Heuristic groove and tempo checks
// The soft error channel: musical quality problems, never structural failures

pub mod quality;

pub use quality::{AnalyzerConfig, BeatAnalysis, analyze, analyze_with_config};
