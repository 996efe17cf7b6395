#![forbid(unsafe_code)]

//! Harness configuration.
//!
//! Every knob has a default matching the stock harness (white background,
//! 100x100 markers, 30px timestamps, red for A, blue for B), so
//! `HarnessConfig::default()` needs no file at all.
//!
//! # Loading
//!
//! With the `config` feature, configs load from TOML or JSON:
//!
//! ```toml
//! # surfswitch.toml
//! asset_root = "assets/transform"
//! unsupported_renderer = "abort"
//!
//! [overlay]
//! background = "#ffffff"
//! marker_a = "#ff0000"
//! marker_b = "#0000ff"
//! text_size = 30
//! marker_size = { width = 100, height = 100 }
//! ```
//!
//! ```rust,ignore
//! let config = HarnessConfig::from_toml_file("surfswitch.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::path::PathBuf;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use surfswitch_core::geometry::Size;
use surfswitch_core::surface::InputSlot;
use surfswitch_render::color::Rgba;
use surfswitch_render::marker::MarkerStyle;

/// What to do when the renderer's capability probe fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum UnsupportedRendererPolicy {
    /// Log a warning and keep going; the renderer degrades on its own.
    #[default]
    Degrade,
    /// Fail setup with [`HarnessError::RendererUnsupported`](crate::HarnessError::RendererUnsupported).
    Abort,
}

/// Overlay marker appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverlayConfig {
    pub background: Rgba,
    pub marker_a: Rgba,
    pub marker_b: Rgba,
    pub text_size: u32,
    pub marker_size: Size,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            marker_a: Rgba::RED,
            marker_b: Rgba::BLUE,
            text_size: MarkerStyle::DEFAULT_TEXT_SIZE,
            marker_size: MarkerStyle::DEFAULT_MARKER_SIZE,
        }
    }
}

impl OverlayConfig {
    /// Largest accepted `text_size`, in pixels.
    pub const MAX_TEXT_SIZE: u32 = Size::MAX_EDGE;

    /// Marker style for one input slot.
    #[must_use]
    pub fn style(&self, slot: InputSlot) -> MarkerStyle {
        let color = match slot {
            InputSlot::A => self.marker_a,
            InputSlot::B => self.marker_b,
        };
        MarkerStyle {
            background: self.background,
            color,
            marker_size: self.marker_size,
            text_size: self.text_size,
        }
    }
}

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HarnessConfig {
    /// Handed to the renderer as its asset source.
    pub asset_root: PathBuf,
    pub unsupported_renderer: UnsupportedRendererPolicy,
    pub overlay: OverlayConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            unsupported_renderer: UnsupportedRendererPolicy::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format from its extension.
    ///
    /// `.json` is parsed as JSON; anything else as TOML.
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check parameters are usable. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let overlay = &self.overlay;

        if overlay.marker_size.is_empty() {
            errors.push(format!(
                "overlay.marker_size must be non-empty, got {}x{}",
                overlay.marker_size.width, overlay.marker_size.height
            ));
        }
        if !overlay.marker_size.within_max_edge() {
            errors.push(format!(
                "overlay.marker_size must be at most {max}x{max}, got {}x{}",
                overlay.marker_size.width,
                overlay.marker_size.height,
                max = Size::MAX_EDGE
            ));
        }
        if overlay.text_size == 0 {
            errors.push("overlay.text_size must be > 0".into());
        } else if overlay.text_size > OverlayConfig::MAX_TEXT_SIZE {
            errors.push(format!(
                "overlay.text_size must be at most {}, got {}",
                OverlayConfig::MAX_TEXT_SIZE,
                overlay.text_size
            ));
        }
        if overlay.marker_a == overlay.marker_b {
            errors.push(format!(
                "overlay.marker_a and overlay.marker_b must differ, both are {}",
                overlay.marker_a
            ));
        }
        for (name, color) in [("marker_a", overlay.marker_a), ("marker_b", overlay.marker_b)] {
            if color == overlay.background {
                errors.push(format!(
                    "overlay.{name} must differ from overlay.background ({color})"
                ));
            }
        }
        if self.asset_root.as_os_str().is_empty() {
            errors.push("asset_root must not be empty".into());
        }

        errors
    }

    /// Validate, turning any problems into an error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`HarnessConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
