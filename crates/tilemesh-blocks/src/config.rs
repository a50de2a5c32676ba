//! Serde layout of `pack.toml`.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct PackConfig {
    #[serde(default)]
    pub textures: BTreeMap<String, TextureEntry>,
    #[serde(default)]
    pub biomes: BTreeMap<String, BiomeDef>,
    #[serde(default = "default_biome_name")]
    pub default_biome: String,
    #[serde(default)]
    pub colors: ColorsDef,
    #[serde(default)]
    pub models: BTreeMap<String, ModelDef>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

fn default_biome_name() -> String {
    "plains".to_string()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TextureEntry {
    // Simple: stone = "#7d7d7d"
    Color(String),
    // Detailed: leaves = { color = "#4a7a2a", alpha = 0.8 }
    Detail {
        color: String,
        alpha: Option<f32>,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct BiomeDef {
    #[serde(default = "default_grass_color")]
    pub grass_color: String,
    #[serde(default = "default_foliage_color")]
    pub foliage_color: String,
    #[serde(default = "default_water_color")]
    pub water_color: String,
}

fn default_grass_color() -> String {
    "#91bd59".to_string()
}
fn default_foliage_color() -> String {
    "#77ab2f".to_string()
}
fn default_water_color() -> String {
    "#3f76e4".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct ColorsDef {
    /// Horizontal radius (in blocks) over which biome tints are averaged.
    #[serde(default = "default_blend_radius")]
    pub blend_radius: i32,
}

fn default_blend_radius() -> i32 {
    2
}

impl Default for ColorsDef {
    fn default() -> Self {
        Self {
            blend_radius: default_blend_radius(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ModelDef {
    #[serde(default = "default_true")]
    pub ambient_occlusion: bool,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct ElementDef {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub rotation: Option<ElementRotationDef>,
    #[serde(default)]
    pub faces: BTreeMap<String, FaceDef>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ElementRotationDef {
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    pub axis: Axis,
    pub angle: f32,
    #[serde(default)]
    pub rescale: bool,
}

fn default_origin() -> [f32; 3] {
    [8.0, 8.0, 8.0]
}

#[derive(Clone, Debug, Deserialize)]
pub struct FaceDef {
    pub texture: String,
    pub uv: Option<[f32; 4]>,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub tinted: bool,
    pub cullface: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default = "default_true")]
    pub culling: bool,
    #[serde(default = "default_true")]
    pub occluding: bool,
    #[serde(default)]
    pub random_offset: bool,
    pub tint: Option<TintDef>,
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TintDef {
    // tint = "grass" | "foliage" | "water"
    Named(String),
    // tint = { color = "#80a755" }
    Fixed { color: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct VariantDef {
    /// Properties the block state must carry for this variant to apply.
    #[serde(default)]
    pub when: BTreeMap<String, String>,
    pub model: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub uvlock: bool,
}
