#![forbid(unsafe_code)]

//! Floating window configuration as data.
//!
//! Every tunable of the floating window lives in [`FloatingConfig`], which
//! can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! # pip.toml
//! snap_edges = "LEFT | RIGHT"
//! collapse_edges = "LEFT | RIGHT"
//! max_velocity = 2400.0
//!
//! [snap_insets]
//! top = 8.0
//! left = 8.0
//! bottom = 8.0
//! right = 8.0
//!
//! [placeholder_layout]
//! bottom = 0.3
//! trailing = 0.0
//! ```
//!
//! Missing keys take their defaults, so an empty document is a valid
//! configuration.

use std::path::Path;

use pip_core::animation::spring::{DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use pip_core::physics::{DEFAULT_DECELERATION_REFERENCE_SPEED, DEFAULT_MAX_VELOCITY};
use pip_core::{Edges, FlingConfig, Insets, Layout, RegionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Storage key the window layout is persisted under.
pub const DEFAULT_LAYOUT_KEY: &str = "pip.floating.layout";

/// Layout used the first time a window is shown.
#[must_use]
pub fn default_placeholder_layout() -> Layout {
    Layout::new(None, None, Some(0.45), Some(0.0), None).unwrap_or_default()
}

/// Tunables for one floating window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingConfig {
    /// Edges the window may rest flush against.
    pub snap_edges: Edges,
    /// Edges the window may dock partially past.
    pub collapse_edges: Edges,
    /// Snap region inset from the safe area.
    pub snap_insets: Insets,
    /// Collapse region inset from the safe area.
    pub collapse_insets: Insets,
    /// Release speed (points/s) that carries a window center to edge.
    pub deceleration_reference_speed: f64,
    /// Cap on the larger release velocity component (points/s).
    pub max_velocity: f64,
    /// Stiffness of the settle glide.
    pub spring_strength: f64,
    /// Damping of the settle glide.
    pub resistance: f64,
    /// Layout used when nothing has been persisted yet.
    pub placeholder_layout: Layout,
    /// Key the settled layout is stored under.
    pub layout_key: String,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            snap_edges: Edges::empty(),
            collapse_edges: Edges::empty(),
            snap_insets: Insets::ZERO,
            collapse_insets: Insets::ZERO,
            deceleration_reference_speed: DEFAULT_DECELERATION_REFERENCE_SPEED,
            max_velocity: DEFAULT_MAX_VELOCITY,
            spring_strength: DEFAULT_STIFFNESS,
            resistance: DEFAULT_DAMPING,
            placeholder_layout: default_placeholder_layout(),
            layout_key: DEFAULT_LAYOUT_KEY.to_owned(),
        }
    }
}

impl FloatingConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let positive = [
            (
                "deceleration_reference_speed",
                self.deceleration_reference_speed,
            ),
            ("max_velocity", self.max_velocity),
            ("spring_strength", self.spring_strength),
            // An undamped spring never comes to rest.
            ("resistance", self.resistance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be finite and > 0, got {value}"));
            }
        }

        if !self.snap_insets.is_valid() {
            errors.push(format!(
                "snap_insets must be finite and >= 0, got {:?}",
                self.snap_insets
            ));
        }
        if !self.collapse_insets.is_valid() {
            errors.push(format!(
                "collapse_insets must be finite and >= 0, got {:?}",
                self.collapse_insets
            ));
        }
        if self.layout_key.is_empty() {
            errors.push("layout_key must not be empty".into());
        }

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(RuntimeError::InvalidConfig(errors))
        }
    }

    #[must_use]
    pub fn region_config(&self) -> RegionConfig {
        RegionConfig {
            snap_edges: self.snap_edges,
            collapse_edges: self.collapse_edges,
            snap_insets: self.snap_insets,
            collapse_insets: self.collapse_insets,
        }
    }

    #[must_use]
    pub fn fling_config(&self) -> FlingConfig {
        FlingConfig {
            deceleration_reference_speed: self.deceleration_reference_speed,
            max_velocity: self.max_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FloatingConfig::default();
        assert_eq!(config.deceleration_reference_speed, 1000.0);
        assert_eq!(config.max_velocity, 2000.0);
        assert_eq!(config.spring_strength, 90.0);
        assert_eq!(config.resistance, 13.0);
        assert_eq!(config.placeholder_layout.bottom(), Some(0.45));
        assert_eq!(config.placeholder_layout.trailing(), Some(0.0));
        assert_eq!(config.layout_key, "pip.floating.layout");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_documents_give_defaults() {
        assert_eq!(
            FloatingConfig::from_toml_str("").unwrap(),
            FloatingConfig::default()
        );
        assert_eq!(
            FloatingConfig::from_json_str("{}").unwrap(),
            FloatingConfig::default()
        );
    }

    #[test]
    fn toml_overrides() {
        let config = FloatingConfig::from_toml_str(
            r#"
snap_edges = "LEFT | RIGHT"
max_velocity = 2400.0

[collapse_insets]
left = 40.0
right = 40.0

[placeholder_layout]
top = 0.1
leading = 0.0
"#,
        )
        .unwrap();
        assert_eq!(config.snap_edges, Edges::LEFT | Edges::RIGHT);
        assert_eq!(config.max_velocity, 2400.0);
        assert_eq!(config.collapse_insets, Insets::new(0.0, 40.0, 0.0, 40.0));
        assert_eq!(config.placeholder_layout.top(), Some(0.1));
        assert_eq!(config.spring_strength, 90.0);
    }

    #[test]
    fn invalid_placeholder_is_a_parse_error() {
        let err = FloatingConfig::from_json_str(
            r#"{"placeholder_layout": {"top": 0.1, "bottom": 0.2, "leading": 0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuntimeError::Json(_)));
    }

    #[test]
    fn validate_catches_bad_physics() {
        let config = FloatingConfig {
            max_velocity: 0.0,
            resistance: f64::NAN,
            snap_insets: Insets::all(-1.0),
            ..FloatingConfig::default()
        };
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("max_velocity")));
        assert!(errors.iter().any(|e| e.contains("resistance")));
        assert!(errors.iter().any(|e| e.contains("snap_insets")));
        assert!(matches!(
            config.validated(),
            Err(RuntimeError::InvalidConfig(list)) if list.len() == 3
        ));
    }

    #[test]
    fn zero_resistance_is_rejected() {
        let config = FloatingConfig {
            resistance: 0.0,
            ..FloatingConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("resistance must be finite and > 0"));
        assert!(FloatingConfig::default().validate().is_empty());
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pip.toml");
        std::fs::write(&path, "spring_strength = 120.0\n").unwrap();
        let config = FloatingConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.spring_strength, 120.0);
        assert!(matches!(
            FloatingConfig::from_toml_file(dir.path().join("missing.toml")),
            Err(RuntimeError::Io(_))
        ));
    }

    #[test]
    fn derived_configs() {
        let config = FloatingConfig {
            snap_edges: Edges::all(),
            max_velocity: 1500.0,
            ..FloatingConfig::default()
        };
        assert_eq!(config.region_config().snap_edges, Edges::all());
        assert_eq!(config.fling_config().max_velocity, 1500.0);
        assert_eq!(config.fling_config().deceleration_reference_speed, 1000.0);
    }
}
