//! Render settings.
//!
//! Settings come from an optional JSON file; the binary then applies its
//! command-line overrides and calls [`RenderSettings::validate`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::util::{Error, Result};

/// Everything one render run needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    // Files
    pub input: Option<PathBuf>,
    pub output: PathBuf,

    pub backend: Backend,

    // Image
    pub width: u32,
    pub height: u32,
    /// Multiplies the camera's aspect ratio.
    pub adjust_aspect: f32,

    /// Skip the per-object box test and intersect every triangle.
    pub disable_bounding_boxes: bool,

    /// Seed for object colors. Entropy from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from("render.png"),
            backend: Backend::Cpu,
            width: 640,
            height: 480,
            adjust_aspect: 1.0,
            disable_bounding_boxes: false,
            seed: None,
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check that a render can start with these settings.
    pub fn validate(&self) -> Result<()> {
        match &self.input {
            None => return Err(Error::settings("no input scene given")),
            Some(p) if p.as_os_str().is_empty() => return Err(Error::settings("input path is empty")),
            Some(_) => {}
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::settings("output path is empty"));
        }
        self.validate_image()
    }

    /// Check the image size and aspect adjustment only.
    pub fn validate_image(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::settings(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.adjust_aspect.is_finite() && self.adjust_aspect > 0.0) {
            return Err(Error::settings(format!(
                "aspect adjustment must be positive, got {}",
                self.adjust_aspect
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn use_bounding_boxes(&self) -> bool {
        !self.disable_bounding_boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RenderSettings {
        RenderSettings {
            input: Some(PathBuf::from("scene.json")),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let s = RenderSettings::default();
        assert_eq!(s.backend, Backend::Cpu);
        assert_eq!((s.width, s.height), (640, 480));
        assert!(s.use_bounding_boxes());
        assert!(s.validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let s: RenderSettings = serde_json::from_str(r#"{ "backend": "gpu", "width": 32 }"#).unwrap();
        assert_eq!(s.backend, Backend::Gpu);
        assert_eq!(s.width, 32);
        assert_eq!(s.height, 480);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_validate_rejects() {
        let mut s = valid();
        s.width = 0;
        assert!(matches!(s.validate(), Err(Error::InvalidSettings(_))));

        let mut s = valid();
        s.adjust_aspect = 0.0;
        assert!(s.validate().is_err());

        let mut s = valid();
        s.adjust_aspect = f32::NAN;
        assert!(s.validate().is_err());

        let mut s = valid();
        s.input = Some(PathBuf::new());
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RenderSettings::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
