use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use tilemesh_geom::Color;

static AIR: LazyLock<BlockState> = LazyLock::new(|| BlockState::new("minecraft:air"));

/// A block name plus its sorted state properties. Cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    name: Arc<str>,
    properties: Arc<BTreeMap<String, String>>,
}

impl BlockState {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            properties: Arc::new(BTreeMap::new()),
        }
    }

    pub fn with_properties(name: &str, properties: BTreeMap<String, String>) -> Self {
        Self {
            name: Arc::from(name),
            properties: Arc::new(properties),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        Arc::make_mut(&mut self.properties).insert(key.to_string(), value.to_string());
        self
    }

    /// The canonical air state.
    pub fn air() -> BlockState {
        AIR.clone()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the default `minecraft:` namespace.
    #[inline]
    pub fn base_name(&self) -> &str {
        strip_namespace(&self.name)
    }

    #[inline]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is_air(&self) -> bool {
        matches!(self.base_name(), "air" | "cave_air" | "void_air")
    }
}

pub(crate) fn strip_namespace(name: &str) -> &str {
    name.strip_prefix("minecraft:").unwrap_or(name)
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (k, v)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{k}={v}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Parses `name` or `name[key=value,...]`.
impl FromStr for BlockState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(open) = s.find('[') else {
            if s.is_empty() {
                return Err("empty block state".to_string());
            }
            return Ok(BlockState::new(s));
        };
        let Some(body) = s[open + 1..].strip_suffix(']') else {
            return Err(format!("unterminated property list in {s:?}"));
        };
        let mut props = BTreeMap::new();
        for pair in body.split(',').filter(|p| !p.trim().is_empty()) {
            let Some((k, v)) = pair.split_once('=') else {
                return Err(format!("property {pair:?} in {s:?} is missing '='"));
            };
            props.insert(k.trim().to_string(), v.trim().to_string());
        }
        Ok(BlockState::with_properties(&s[..open], props))
    }
}

/// Render-relevant flags of a block state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockProperties {
    /// Hides neighbor faces whose cullface points at this block.
    pub culling: bool,
    /// Darkens neighbor vertices through ambient occlusion.
    pub occluding: bool,
    pub random_offset: bool,
}

impl BlockProperties {
    pub const AIR: BlockProperties = BlockProperties {
        culling: false,
        occluding: false,
        random_offset: false,
    };
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Clone, Debug)]
pub struct Texture {
    pub id: TextureId,
    pub key: String,
    /// Average texture color, straight alpha.
    pub color: Color,
}

impl Texture {
    #[inline]
    pub fn color_premultiplied(&self) -> Color {
        self.color.to_premultiplied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Biome {
    pub id: String,
    pub grass_color: Color,
    pub foliage_color: Color,
    pub water_color: Color,
}

/// Where the tint of a block's tinted faces comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TintSource {
    #[default]
    None,
    Grass,
    Foliage,
    Water,
    Fixed(Color),
}
