use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use facecam_core::detection::domain::detector_selection::DetectorSelection;
use facecam_core::shared::constants::{DEFAULT_FRAME_BUDGET_MS, DEFAULT_RELATIVE_FACE_SIZE};

/// Defaults persisted between runs. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum face size in percent of frame height.
    pub face_size_percent: u32,
    /// Detector key, `scale-space` or `tracking`.
    pub detector: String,
    pub frame_budget_ms: f64,
    pub model_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            face_size_percent: (DEFAULT_RELATIVE_FACE_SIZE * 100.0).round() as u32,
            detector: DetectorSelection::default().key().to_string(),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
            model_path: None,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("facecam").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("no config directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn relative_face_size(&self) -> f64 {
        self.face_size_percent as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.face_size_percent, 20);
        assert_eq!(s.detector, "scale-space");
        assert!(s.model_path.is_none());
        assert!((s.relative_face_size() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.json");
        let s = Settings {
            face_size_percent: 40,
            detector: "tracking".into(),
            frame_budget_ms: 50.0,
            model_path: Some(PathBuf::from("/models/seeta.bin")),
        };
        s.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), s);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            Settings::load_from(&tmp.path().join("none.json")),
            Settings::default()
        );
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"face_size_percent": 50}"#).unwrap();

        let s = Settings::load_from(&path);
        assert_eq!(s.face_size_percent, 50);
        assert_eq!(s.detector, "scale-space");
    }
}
