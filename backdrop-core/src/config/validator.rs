//! Configuration validation.

use crate::config::types::{BackdropConfig, SpriteTable};
use crate::error::{Error, Result};
use crate::scene::is_video_url;

/// Validator for backdrop configurations.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Creates a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a backdrop configuration.
    pub fn validate(&self, config: &BackdropConfig) -> Result<()> {
        self.validate_rate("video_playback_rate", config.video_playback_rate)?;
        self.validate_unit_range("opacity", config.opacity)?;
        self.validate_unit_range("vignette", config.vignette)?;
        self.validate_sprite_table(&config.sprite_sheets)?;
        Ok(())
    }

    fn validate_rate(&self, field: &str, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::ConfigValidation(
                field.to_string(),
                format!("Playback rate must be positive, got {}", rate),
            ));
        }
        Ok(())
    }

    fn validate_unit_range(&self, field: &str, value: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::ConfigValidation(
                field.to_string(),
                format!("Must be between 0.0 and 1.0, got {}", value),
            ));
        }
        Ok(())
    }

    fn validate_sprite_table(&self, table: &SpriteTable) -> Result<()> {
        let default = table.default_entry().ok_or_else(|| {
            Error::ConfigValidation(
                "sprite_sheets.default".to_string(),
                "A default entry is required".to_string(),
            )
        })?;

        let default_has_video = [false, true]
            .iter()
            .filter_map(|&is_night| default.url_for(is_night))
            .any(is_video_url);
        if !default_has_video {
            return Err(Error::ConfigValidation(
                "sprite_sheets.default".to_string(),
                "Default entry must point at a supported video (.mp4, .webm, .mov, .m4v)"
                    .to_string(),
            ));
        }

        for (scene, entry) in table.iter() {
            if let Some(rate) = entry.playback_rate() {
                self.validate_rate(&format!("sprite_sheets.{}.playback_rate", scene), rate)?;
            }
            let urls: Vec<&str> = [false, true]
                .iter()
                .filter_map(|&is_night| entry.url_for(is_night))
                .collect();
            if urls.is_empty() || !urls.iter().all(|url| is_video_url(url)) {
                // Not fatal: the resolver falls back to the default entry at runtime
                tracing::warn!(
                    "Scene '{}' has no supported video media; it will fall back to default",
                    scene
                );
            }
        }

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SpriteEntry;

    fn minimal_config() -> BackdropConfig {
        let mut sprite_sheets = SpriteTable::default();
        sprite_sheets.insert("default", SpriteEntry::single("clear.mp4"));
        BackdropConfig {
            sprite_sheets,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_builtin_defaults() {
        let validator = ConfigValidator::new();
        assert!(validator.validate(&BackdropConfig::default()).is_ok());
        assert!(validator.validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_validate_missing_default_entry() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config.sprite_sheets = SpriteTable::default();
        config.sprite_sheets.insert("rain", SpriteEntry::single("rain.mp4"));

        let result = validator.validate(&config);
        assert!(matches!(result, Err(Error::ConfigValidation(field, _)) if field == "sprite_sheets.default"));
    }

    #[test]
    fn test_validate_default_without_video() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config
            .sprite_sheets
            .insert("default", SpriteEntry::pair("day.png", "night.gif"));
        assert!(validator.validate(&config).is_err());
    }

    #[test]
    fn test_validate_default_with_one_video_slot() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config
            .sprite_sheets
            .insert("default", SpriteEntry::pair("day.png", "night.mp4"));
        assert!(validator.validate(&config).is_ok());
    }

    #[test]
    fn test_validate_non_video_scene_is_warning_only() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config.sprite_sheets.insert("fog", SpriteEntry::single("fog.gif"));
        assert!(validator.validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_rates() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config.video_playback_rate = 0.0;
        assert!(validator.validate(&config).is_err());

        let mut config = minimal_config();
        config
            .sprite_sheets
            .insert("rain", SpriteEntry::slots(Some("rain.mp4"), None, Some(-1.0)));
        assert!(validator.validate(&config).is_err());
    }

    #[test]
    fn test_validate_cosmetic_ranges() {
        let validator = ConfigValidator::new();
        let mut config = minimal_config();
        config.opacity = 1.5;
        assert!(validator.validate(&config).is_err());

        let mut config = minimal_config();
        config.vignette = -0.1;
        assert!(validator.validate(&config).is_err());
    }
}
