use crate::application::scoring::{PenaltyTable, PrecautionPolicy, ScoringEngine};
use crate::domain::damage::DamageObservation;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InspectorConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub demo: DemoSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScoringSettings {
    /// Overrides for the built-in penalty weights
    #[serde(default)]
    pub penalties: HashMap<String, u32>,
    #[serde(default)]
    pub precaution_policy: PrecautionPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoSettings {
    /// Observation scored locally when the backend cannot analyse a photo
    #[serde(default = "default_demo_damages")]
    pub damages: HashMap<String, u32>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            damages: default_demo_damages(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_demo_damages() -> HashMap<String, u32> {
    HashMap::from([
        ("minor_crack".to_string(), 2),
        ("spalling".to_string(), 1),
        ("stain".to_string(), 3),
    ])
}

impl InspectorConfig {
    pub fn scoring_engine(&self) -> ScoringEngine {
        ScoringEngine::new(
            PenaltyTable::with_overrides(&self.scoring.penalties),
            self.scoring.precaution_policy,
        )
    }

    pub fn demo_observation(&self) -> DamageObservation {
        self.demo
            .damages
            .iter()
            .fold(DamageObservation::new(), |observation, (label, count)| {
                observation.with(label.as_str(), *count)
            })
    }
}

/// Reads `config/inspector.toml` when present, then `INSPECTOR__*` variables
/// (for example `INSPECTOR__BACKEND__TOKEN`).
pub fn load_inspector_config() -> anyhow::Result<InspectorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/inspector").required(false))
        .add_source(config::Environment::with_prefix("INSPECTOR").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> InspectorConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse("");

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.token, None);
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.scoring.precaution_policy, PrecautionPolicy::Fixed);
        assert_eq!(
            config.demo_observation(),
            DamageObservation::new()
                .with("minor_crack", 2)
                .with("spalling", 1)
                .with("stain", 3)
        );
    }

    #[test]
    fn test_file_overrides() {
        let config = parse(
            r#"
            [backend]
            base_url = "https://inspect.example.org/"
            token = "abc123"

            [scoring]
            precaution_policy = "per_category"

            [scoring.penalties]
            stain = 9

            [demo.damages]
            algae = 1
            "#,
        );

        assert_eq!(config.backend.base_url, "https://inspect.example.org/");
        assert_eq!(config.backend.token.as_deref(), Some("abc123"));
        assert_eq!(config.scoring.precaution_policy, PrecautionPolicy::PerCategory);

        let engine = config.scoring_engine();
        let damages = DamageObservation::new().with("stain", 2).with("spalling", 1);
        assert_eq!(engine.health_score(&damages), 62);

        let demo = config.demo_observation();
        assert_eq!(demo.count("algae"), 1);
        assert_eq!(demo.total_detections(), 1);
    }
}
