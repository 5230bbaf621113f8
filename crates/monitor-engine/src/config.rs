//! Engine Configuration

use alert_synth::SynthesizerConfig;
use dedup_store::RetentionPolicy;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
///
/// Layered at load time: built-in defaults, then an optional TOML file,
/// then `WARD_MONITOR_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Refresh-loop interval in seconds (default: 30)
    pub refresh_interval_secs: u64,
    /// Candidate-alert synthesis tunables
    pub synthesizer: SynthesizerConfig,
    /// Acknowledgement retention windows
    pub retention: RetentionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            synthesizer: SynthesizerConfig::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration, layering an optional file and the environment
    /// over the defaults
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("WARD_MONITOR").separator("__"),
        );
        builder.build()?.try_deserialize()
    }
}
