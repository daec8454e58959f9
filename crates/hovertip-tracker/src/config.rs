use hovertip_core::TipError;
use hovertip_layout::{PlacementMetrics, TipStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub enabled: bool,
    /// Hover time before a tip appears.
    pub show_delay_ms: u64,
    /// How long a tip stays up; 0 keeps it until hidden explicitly.
    pub hide_delay_ms: u64,
    /// Window after a hide during which another target shows without delay.
    pub reshow_delay_ms: u64,
    pub overlap_threshold_percent: f32,
    pub metrics: PlacementMetrics,
    #[serde(default)]
    pub style: TipStyle,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_delay_ms: 500,
            hide_delay_ms: 5000,
            reshow_delay_ms: 100,
            overlap_threshold_percent: 25.0,
            metrics: PlacementMetrics::default(),
            style: TipStyle::default(),
        }
    }
}

impl TooltipConfig {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn reshow_delay(&self) -> Duration {
        Duration::from_millis(self.reshow_delay_ms)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hovertip").join("tooltip.json"))
    }

    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        if let Some(path) = Self::default_path() {
            tracing::info!("Loading tooltip config from {:?}", path);
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::error!("Failed to load tooltip config: {}", e),
                }
            } else {
                tracing::info!("Tooltip config not found, using defaults");
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, TipError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TipError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| TipError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TipError> {
        if !(0.0..=100.0).contains(&self.overlap_threshold_percent) {
            return Err(TipError::Config(format!(
                "overlap_threshold_percent must be within 0..=100, got {}",
                self.overlap_threshold_percent
            )));
        }
        let m = &self.metrics;
        if [m.padding, m.border, m.icon_size.x, m.icon_size.y].iter().any(|v| *v < 0.0) {
            return Err(TipError::Config("metrics must not be negative".into()));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TipError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| TipError::Config(format!("{}: {e}", dir.display())))?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| TipError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| TipError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) {
        if let Some(path) = Self::default_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::error!("Failed to save tooltip config: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = TooltipConfig::default();
        assert_eq!(config.show_delay(), Duration::from_millis(500));
        assert_eq!(config.hide_delay(), Duration::from_secs(5));
        assert_eq!(config.reshow_delay(), Duration::from_millis(100));
        assert_eq!(config.overlap_threshold_percent, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tooltip.json");
        let config = TooltipConfig {
            show_delay_ms: 250,
            hide_delay_ms: 0,
            ..TooltipConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = TooltipConfig::load_from(&path).unwrap();
        assert_eq!(loaded.show_delay_ms, 250);
        assert_eq!(loaded.hide_delay(), Duration::ZERO);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tooltip.json");
        std::fs::write(&path, r#"{ "reshow_delay_ms": 40 }"#).unwrap();
        let loaded = TooltipConfig::load_from(&path).unwrap();
        assert_eq!(loaded.reshow_delay_ms, 40);
        assert_eq!(loaded.show_delay_ms, 500);
        assert!(loaded.enabled);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tooltip.json");
        std::fs::write(&path, r#"{ "overlap_threshold_percent": 140.0 }"#).unwrap();
        assert!(matches!(
            TooltipConfig::load_from(&path),
            Err(TipError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = TooltipConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_fatal());
    }
}
