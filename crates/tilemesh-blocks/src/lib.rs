//! Block states, block models and the resource-pack catalog.
#![forbid(unsafe_code)]

pub mod config;
pub mod direction;
pub mod error;
pub mod model;
pub mod pack;
pub mod types;

pub use direction::Direction;
pub use error::PackError;
pub use model::{BlockModel, ModelElement, ModelFace, TransformedBlockModel};
pub use pack::ResourcePack;
pub use types::{Biome, BlockProperties, BlockState, Texture, TextureId, TintSource};
