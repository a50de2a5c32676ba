use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tilemesh_geom::{Color, Mat4, Vec3, deg_sin_cos};

use crate::config::{
    Axis, BiomeDef, BlockDef, ElementDef, ModelDef, PackConfig, TextureEntry, TintDef,
};
use crate::direction::Direction;
use crate::error::PackError;
use crate::model::{BlockModel, ModelElement, ModelFace, TransformedBlockModel};
use crate::types::{
    Biome, BlockProperties, BlockState, Texture, TextureId, TintSource, strip_namespace,
};

#[derive(Clone, Debug)]
struct Variant {
    when: BTreeMap<String, String>,
    model: TransformedBlockModel,
}

impl Variant {
    fn matches(&self, state: &BlockState) -> bool {
        self.when
            .iter()
            .all(|(k, v)| state.property(k) == Some(v.as_str()))
    }
}

#[derive(Clone, Debug)]
struct BlockEntry {
    properties: BlockProperties,
    tint: TintSource,
    variants: Vec<Variant>,
}

/// Immutable catalog of textures, biomes, block models and block-state
/// variants. Shared read-only between tile builders.
#[derive(Clone, Debug)]
pub struct ResourcePack {
    textures: Vec<Texture>,
    texture_ids: HashMap<String, TextureId>,
    models: HashMap<String, Arc<BlockModel>>,
    blocks: HashMap<String, BlockEntry>,
    biomes: HashMap<String, Biome>,
    default_biome: Biome,
    blend_radius: i32,
}

impl ResourcePack {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PackError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, PackError> {
        let cfg: PackConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: PackConfig) -> Result<Self, PackError> {
        // BTreeMap iteration is sorted, so TextureId assignment is stable.
        let mut textures = Vec::with_capacity(cfg.textures.len());
        let mut texture_ids = HashMap::with_capacity(cfg.textures.len());
        for (key, entry) in cfg.textures {
            let (value, alpha) = match entry {
                TextureEntry::Color(c) => (c, None),
                TextureEntry::Detail { color, alpha } => (color, alpha),
            };
            let mut color = parse_color(&format!("texture {key}"), &value)?;
            if let Some(a) = alpha {
                color.a = a.clamp(0.0, 1.0);
            }
            let id = TextureId(textures.len() as u32);
            texture_ids.insert(key.clone(), id);
            textures.push(Texture { id, key, color });
        }

        let mut biomes = HashMap::with_capacity(cfg.biomes.len());
        for (id, def) in cfg.biomes {
            let biome = compile_biome(&id, &def)?;
            biomes.insert(id, biome);
        }
        let default_biome = match biomes.get(&cfg.default_biome) {
            Some(b) => b.clone(),
            None if biomes.is_empty() => {
                let def = BiomeDef {
                    grass_color: "#91bd59".into(),
                    foliage_color: "#77ab2f".into(),
                    water_color: "#3f76e4".into(),
                };
                let biome = compile_biome(&cfg.default_biome, &def)?;
                biomes.insert(cfg.default_biome.clone(), biome.clone());
                biome
            }
            None => return Err(PackError::UnknownBiome(cfg.default_biome)),
        };

        let mut models = HashMap::with_capacity(cfg.models.len());
        for (name, def) in cfg.models {
            let model = compile_model(&name, def, &texture_ids)?;
            models.insert(name, Arc::new(model));
        }

        let mut blocks = HashMap::with_capacity(cfg.blocks.len());
        for def in cfg.blocks {
            let name = strip_namespace(&def.name).to_string();
            let entry = compile_block(&name, def, &models)?;
            blocks.insert(name, entry);
        }

        log::info!(
            "resource pack loaded: {} textures, {} models, {} blocks, {} biomes",
            textures.len(),
            models.len(),
            blocks.len(),
            biomes.len()
        );

        Ok(Self {
            textures,
            texture_ids,
            models,
            blocks,
            biomes,
            default_biome,
            blend_radius: cfg.colors.blend_radius.max(0),
        })
    }

    /// Render flags for a block state. Air and unknown blocks get
    /// [`BlockProperties::AIR`].
    pub fn block_properties(&self, state: &BlockState) -> BlockProperties {
        if state.is_air() {
            return BlockProperties::AIR;
        }
        self.blocks
            .get(state.base_name())
            .map_or(BlockProperties::AIR, |b| b.properties)
    }

    /// The model of the first variant whose property filter matches, or
    /// `None` if the state has no geometry.
    pub fn resolved_model(&self, state: &BlockState) -> Option<&TransformedBlockModel> {
        if state.is_air() {
            return None;
        }
        let entry = self.blocks.get(state.base_name())?;
        let variant = entry.variants.iter().find(|v| v.matches(state));
        if variant.is_none() {
            log::debug!("no variant of {} matches {}", state.base_name(), state);
        }
        variant
            .map(|v| &v.model)
            .filter(|m| !m.model().elements.is_empty())
    }

    pub fn tint_source(&self, state: &BlockState) -> TintSource {
        self.blocks
            .get(state.base_name())
            .map_or(TintSource::None, |b| b.tint)
    }

    #[inline]
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn texture_id(&self, key: &str) -> Option<TextureId> {
        self.texture_ids.get(key).copied()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn model(&self, name: &str) -> Option<&Arc<BlockModel>> {
        self.models.get(name)
    }

    /// Biome by world id; unknown ids fall back to the default biome.
    pub fn biome(&self, id: &str) -> &Biome {
        self.biomes
            .get(strip_namespace(id))
            .or_else(|| self.biomes.get(id))
            .unwrap_or(&self.default_biome)
    }

    pub fn default_biome(&self) -> &Biome {
        &self.default_biome
    }

    /// Horizontal radius over which biome tints are blended.
    pub fn blend_radius(&self) -> i32 {
        self.blend_radius
    }
}

fn parse_color(context: &str, value: &str) -> Result<Color, PackError> {
    Color::from_hex(value).ok_or_else(|| PackError::InvalidColor {
        context: context.to_string(),
        value: value.to_string(),
    })
}

fn compile_biome(id: &str, def: &BiomeDef) -> Result<Biome, PackError> {
    Ok(Biome {
        id: id.to_string(),
        grass_color: parse_color(&format!("biome {id} grass"), &def.grass_color)?,
        foliage_color: parse_color(&format!("biome {id} foliage"), &def.foliage_color)?,
        water_color: parse_color(&format!("biome {id} water"), &def.water_color)?,
    })
}

fn compile_model(
    name: &str,
    def: ModelDef,
    texture_ids: &HashMap<String, TextureId>,
) -> Result<BlockModel, PackError> {
    let elements = def
        .elements
        .into_iter()
        .map(|el| compile_element(name, el, texture_ids))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BlockModel {
        elements,
        ambient_occlusion: def.ambient_occlusion,
    })
}

fn compile_element(
    model: &str,
    def: ElementDef,
    texture_ids: &HashMap<String, TextureId>,
) -> Result<ModelElement, PackError> {
    let mut element = ModelElement::new(Vec3::from(def.from), Vec3::from(def.to));

    if let Some(rot) = &def.rotation {
        if ![-45.0, -22.5, 0.0, 22.5, 45.0].contains(&rot.angle) {
            return Err(PackError::InvalidElementRotation {
                model: model.to_string(),
                angle: rot.angle,
            });
        }
        element.rotation = element_rotation_matrix(rot.origin, rot.axis, rot.angle, rot.rescale);
    }

    for (dir_name, face) in def.faces {
        let Some(dir) = Direction::from_name(&dir_name) else {
            return Err(PackError::UnknownDirection {
                model: model.to_string(),
                name: dir_name,
            });
        };
        let texture_key = face.texture.trim_start_matches('#');
        let Some(&texture) = texture_ids.get(texture_key) else {
            return Err(PackError::UnknownTexture {
                model: model.to_string(),
                texture: face.texture,
            });
        };
        if face.rotation % 90 != 0 {
            return Err(PackError::InvalidFaceRotation {
                model: model.to_string(),
                rotation: face.rotation,
            });
        }
        let cullface = match face.cullface.as_deref() {
            None => None,
            Some(n) => Some(Direction::from_name(n).ok_or_else(|| {
                PackError::UnknownDirection {
                    model: model.to_string(),
                    name: n.to_string(),
                }
            })?),
        };
        let uv = face.uv.unwrap_or_else(|| element.default_uv(dir));
        element.faces[dir.index()] = Some(ModelFace {
            texture,
            uv,
            rotation: face.rotation,
            tinted: face.tinted,
            cullface,
        });
    }
    Ok(element)
}

/// `translate(origin) * rescale * rotate(axis, angle) * translate(-origin)`.
pub fn element_rotation_matrix(origin: [f32; 3], axis: Axis, angle: f32, rescale: bool) -> Mat4 {
    if angle == 0.0 {
        return Mat4::IDENTITY;
    }
    let rot = match axis {
        Axis::X => Mat4::from_rotation_x(angle),
        Axis::Y => Mat4::from_rotation_y(angle),
        Axis::Z => Mat4::from_rotation_z(angle),
    };
    let mut m = Mat4::IDENTITY
        .translate(-origin[0], -origin[1], -origin[2])
        .then(&rot);
    if rescale {
        let (_, cos) = deg_sin_cos(angle);
        let s = 1.0 / cos.abs();
        m = match axis {
            Axis::X => m.scale(1.0, s, s),
            Axis::Y => m.scale(s, 1.0, s),
            Axis::Z => m.scale(s, s, 1.0),
        };
    }
    m.translate(origin[0], origin[1], origin[2])
}

fn compile_block(
    name: &str,
    def: BlockDef,
    models: &HashMap<String, Arc<BlockModel>>,
) -> Result<BlockEntry, PackError> {
    let tint = match def.tint {
        None => TintSource::None,
        Some(TintDef::Named(kind)) => match kind.as_str() {
            "grass" => TintSource::Grass,
            "foliage" => TintSource::Foliage,
            "water" => TintSource::Water,
            "none" => TintSource::None,
            _ => {
                return Err(PackError::UnknownTint {
                    block: name.to_string(),
                    tint: kind,
                });
            }
        },
        Some(TintDef::Fixed { color }) => {
            TintSource::Fixed(parse_color(&format!("block {name} tint"), &color)?)
        }
    };

    let mut variants = Vec::with_capacity(def.variants.len());
    for v in def.variants {
        let Some(model) = models.get(&v.model) else {
            return Err(PackError::UnknownModel {
                block: name.to_string(),
                model: v.model,
            });
        };
        if v.x % 90.0 != 0.0 || v.y % 90.0 != 0.0 {
            return Err(PackError::InvalidVariantRotation {
                block: name.to_string(),
                x: v.x,
                y: v.y,
            });
        }
        variants.push(Variant {
            when: v.when,
            model: TransformedBlockModel::new(Arc::clone(model), v.x, v.y, v.uvlock),
        });
    }

    Ok(BlockEntry {
        properties: BlockProperties {
            culling: def.culling,
            occluding: def.occluding,
            random_offset: def.random_offset,
        },
        tint,
        variants,
    })
}
