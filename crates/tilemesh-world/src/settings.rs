use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read render settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid render settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("ambient_light must be within 0..=1, got {0}")]
    InvalidAmbientLight(f32),
}

/// Optional inclusive limits per axis. Missing limits are unbounded.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenderBounds {
    pub min_x: Option<i32>,
    pub max_x: Option<i32>,
    pub min_y: Option<i32>,
    pub max_y: Option<i32>,
    pub min_z: Option<i32>,
    pub max_z: Option<i32>,
}

impl RenderBounds {
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let within = |v: i32, lo: Option<i32>, hi: Option<i32>| {
            lo.is_none_or(|lo| v >= lo) && hi.is_none_or(|hi| v <= hi)
        };
        within(x, self.min_x, self.max_x)
            && within(y, self.min_y, self.max_y)
            && within(z, self.min_z, self.max_z)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RenderSettings {
    /// Light floor applied to representative colors, `0..=1`.
    #[serde(default = "default_ambient_light")]
    pub ambient_light: f32,
    /// Faces below this height with no light in the cave channel are dropped.
    #[serde(default = "default_remove_caves_below_y")]
    pub remove_caves_below_y: i32,
    /// Use block light instead of sky light to detect caves.
    #[serde(default)]
    pub cave_detection_uses_block_light: bool,
    /// Treat everything outside `bounds` as open air so edge faces render.
    #[serde(default = "default_render_edges")]
    pub render_edges: bool,
    #[serde(default)]
    pub bounds: RenderBounds,
}

fn default_ambient_light() -> f32 {
    0.1
}
fn default_remove_caves_below_y() -> i32 {
    55
}
fn default_render_edges() -> bool {
    true
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ambient_light: default_ambient_light(),
            remove_caves_below_y: default_remove_caves_below_y(),
            cave_detection_uses_block_light: false,
            render_edges: default_render_edges(),
            bounds: RenderBounds::default(),
        }
    }
}

impl RenderSettings {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: RenderSettings = toml::from_str(s)?;
        if !(0.0..=1.0).contains(&settings.ambient_light) {
            return Err(SettingsError::InvalidAmbientLight(settings.ambient_light));
        }
        Ok(settings)
    }

    #[inline]
    pub fn is_inside_render_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        self.bounds.contains(x, y, z)
    }
}
