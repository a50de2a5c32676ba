use std::path::PathBuf;

use thiserror::Error;

/// Load-time failures of the resource-pack catalog. The meshing core only
/// ever sees validated models.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read resource pack {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid resource pack: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid color {value:?} for {context}")]
    InvalidColor { context: String, value: String },
    #[error("model {model:?} references unknown texture {texture:?}")]
    UnknownTexture { model: String, texture: String },
    #[error("block {block:?} references unknown model {model:?}")]
    UnknownModel { block: String, model: String },
    #[error("model {model:?} uses unknown face direction {name:?}")]
    UnknownDirection { model: String, name: String },
    #[error("model {model:?} has element rotation {angle}, expected one of -45, -22.5, 0, 22.5, 45")]
    InvalidElementRotation { model: String, angle: f32 },
    #[error("model {model:?} has face rotation {rotation}, expected a multiple of 90")]
    InvalidFaceRotation { model: String, rotation: i32 },
    #[error("block {block:?} has variant rotation ({x}, {y}), expected multiples of 90")]
    InvalidVariantRotation { block: String, x: f32, y: f32 },
    #[error("default biome {0:?} is not defined")]
    UnknownBiome(String),
    #[error("block {block:?} has unknown tint source {tint:?}")]
    UnknownTint { block: String, tint: String },
}
