use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::registry::EffectId;

pub const DEFAULT_DURATION: f32 = 0.6;
pub const DEFAULT_CHARACTER_DELAY: f32 = 0.026;

/// Morphing options. JSON keys follow the label's property names (`morphingDuration`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Seconds for one transition, excluding per-character delay.
    #[serde(rename = "morphingDuration")]
    pub duration: f32,

    /// Seconds each successive character lags behind the previous one.
    #[serde(rename = "morphingCharacterDelay")]
    pub character_delay: f32,

    /// When false, text changes apply instantly.
    #[serde(rename = "morphingEnabled")]
    pub enabled: bool,

    #[serde(rename = "morphingEffect")]
    pub effect: EffectId,

    pub easing: Easing,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            character_delay: DEFAULT_CHARACTER_DELAY,
            enabled: true,
            effect: EffectId::Scale,
            easing: Easing::EaseOutQuint,
        }
    }
}

impl MorphConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("morphingDuration", self.duration)?;
        non_negative("morphingCharacterDelay", self.character_delay)?;

        if self.effect.name().trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "morphingEffect",
                reason: "effect name is empty".to_owned(),
            });
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative number of seconds, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_label_defaults() {
        let config = MorphConfig::default();

        assert_eq!(config.duration, 0.6);
        assert_eq!(config.character_delay, 0.026);
        assert!(config.enabled);
        assert_eq!(config.effect, EffectId::Scale);
        assert_eq!(config.easing, Easing::EaseOutQuint);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(MorphConfig::from_json_str("{}").unwrap(), MorphConfig::default());
    }

    #[test]
    fn parses_property_names() {
        let config = MorphConfig::from_json_str(
            r#"{
                "morphingDuration": 1.5,
                "morphingCharacterDelay": 0.01,
                "morphingEnabled": false,
                "morphingEffect": "lift",
                "easing": "linear"
            }"#,
        )
        .unwrap();

        assert_eq!(config.duration, 1.5);
        assert_eq!(config.character_delay, 0.01);
        assert!(!config.enabled);
        assert_eq!(config.effect, EffectId::Lift);
        assert_eq!(config.easing, Easing::Linear);
    }

    #[test]
    fn unknown_effect_becomes_custom() {
        let config = MorphConfig::from_json_str(r#"{ "morphingEffect": "sparkle" }"#).unwrap();

        assert_eq!(config.effect, EffectId::Custom("sparkle".to_owned()));
    }

    #[test]
    fn rejects_negative_duration() {
        let err = MorphConfig::from_json_str(r#"{ "morphingDuration": -1.0 }"#).unwrap_err();

        assert!(
            matches!(err, ConfigError::Invalid { field: "morphingDuration", .. }),
            "{err}"
        );
    }

    #[test]
    fn rejects_blank_effect_name() {
        let err = MorphConfig::from_json_str(r#"{ "morphingEffect": "  " }"#).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { field: "morphingEffect", .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MorphConfig::from_json_str("{ morphingDuration: }").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("morph-label-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "morphingEffect": "fade" }}"#).unwrap();
        drop(file);

        let config = MorphConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.effect, EffectId::Fade);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MorphConfig::load("/definitely/not/here.json").unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
