use tilemesh_blocks::{BlockState, Direction, PackError, ResourcePack, TextureId, TintSource};

fn load_sample_pack() -> ResourcePack {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    ResourcePack::from_path(root.join("../../assets/pack.toml")).unwrap()
}

const MINIMAL: &str = r##"
    [textures]
    zeta = "#ffffff"
    alpha = "#000000"

    [models.cube]
    [[models.cube.elements]]
    from = [0, 0, 0]
    to = [16, 16, 16]
    faces.up = { texture = "#alpha", cullface = "up" }
    faces.north = { texture = "zeta", rotation = 270 }

    [models.slab]
    ambient_occlusion = false
    [[models.slab.elements]]
    from = [0, 0, 0]
    to = [16, 8, 16]
    faces.south = { texture = "zeta" }

    [models.nothing]

    [[blocks]]
    name = "minecraft:thing"
    variants = [
        { when = { half = "bottom" }, model = "slab" },
        { model = "cube", y = 90, uvlock = true },
    ]

    [[blocks]]
    name = "barrier"
    culling = false
    variants = [{ model = "nothing" }]
"##;

#[test]
fn texture_ids_follow_sorted_keys() {
    let pack = ResourcePack::from_toml_str(MINIMAL).unwrap();
    assert_eq!(pack.texture_id("alpha"), Some(TextureId(0)));
    assert_eq!(pack.texture_id("zeta"), Some(TextureId(1)));
    assert_eq!(pack.texture(TextureId(1)).unwrap().key, "zeta");
    assert!(pack.texture(TextureId(2)).is_none());
}

#[test]
fn faces_are_compiled_with_default_uvs() {
    let pack = ResourcePack::from_toml_str(MINIMAL).unwrap();
    let cube = pack.model("cube").unwrap();
    let el = &cube.elements[0];
    let up = el.face(Direction::Up).unwrap();
    assert_eq!(up.texture, TextureId(0));
    assert_eq!(up.cullface, Some(Direction::Up));
    assert_eq!(up.uv, [0.0, 0.0, 16.0, 16.0]);
    assert_eq!(el.face(Direction::North).unwrap().rotation, 270);
    assert!(el.face(Direction::Down).is_none());

    let slab = pack.model("slab").unwrap();
    assert!(!slab.ambient_occlusion);
    assert_eq!(
        slab.elements[0].face(Direction::South).unwrap().uv,
        [0.0, 8.0, 16.0, 16.0]
    );
}

#[test]
fn variants_match_in_declaration_order() {
    let pack = ResourcePack::from_toml_str(MINIMAL).unwrap();
    let bottom = BlockState::new("thing").with_property("half", "bottom");
    let top = BlockState::new("minecraft:thing").with_property("half", "top");

    let m = pack.resolved_model(&bottom).unwrap();
    assert!(!m.has_rotation());
    assert_eq!(m.model().elements[0].to.y, 8.0);

    let m = pack.resolved_model(&top).unwrap();
    assert!(m.has_rotation());
    assert!(m.is_uv_lock());
    assert_eq!(m.rotation().unwrap().y, 90.0);
}

#[test]
fn air_unknown_and_empty_models_have_no_geometry() {
    let pack = ResourcePack::from_toml_str(MINIMAL).unwrap();
    assert!(pack.resolved_model(&BlockState::air()).is_none());
    assert!(pack.resolved_model(&BlockState::new("missing")).is_none());
    assert!(pack.resolved_model(&BlockState::new("barrier")).is_none());

    let air = pack.block_properties(&BlockState::air());
    assert!(!air.culling && !air.occluding && !air.random_offset);
    let thing = pack.block_properties(&BlockState::new("thing"));
    assert!(thing.culling && thing.occluding);
    assert!(!pack.block_properties(&BlockState::new("barrier")).culling);
}

#[test]
fn unknown_texture_is_a_load_error() {
    let err = ResourcePack::from_toml_str(
        r##"
        [models.bad]
        [[models.bad.elements]]
        from = [0, 0, 0]
        to = [16, 16, 16]
        faces.up = { texture = "nope" }
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::UnknownTexture { ref texture, .. } if texture == "nope"));
    assert!(err.to_string().contains("bad"));
}

#[test]
fn invalid_rotations_are_rejected() {
    let err = ResourcePack::from_toml_str(
        r##"
        [textures]
        t = "#ffffff"
        [models.m]
        [[models.m.elements]]
        from = [0, 0, 0]
        to = [16, 16, 16]
        rotation = { axis = "y", angle = 30 }
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::InvalidElementRotation { .. }));

    let err = ResourcePack::from_toml_str(
        r##"
        [textures]
        t = "#ffffff"
        [models.m]
        [[models.m.elements]]
        from = [0, 0, 0]
        to = [16, 16, 16]
        faces.up = { texture = "t" }
        [[blocks]]
        name = "b"
        variants = [{ model = "m", y = 45 }]
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::InvalidVariantRotation { .. }));
}

#[test]
fn unknown_model_and_direction_are_rejected() {
    let err = ResourcePack::from_toml_str(
        r##"
        [[blocks]]
        name = "b"
        variants = [{ model = "ghost" }]
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::UnknownModel { .. }));

    let err = ResourcePack::from_toml_str(
        r##"
        [textures]
        t = "#ffffff"
        [models.m]
        [[models.m.elements]]
        from = [0, 0, 0]
        to = [16, 16, 16]
        faces.sideways = { texture = "t" }
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::UnknownDirection { .. }));
}

#[test]
fn missing_default_biome_is_rejected() {
    let err = ResourcePack::from_toml_str(
        r##"
        default_biome = "ocean"
        [biomes.plains]
        grass_color = "#91bd59"
    "##,
    )
    .unwrap_err();
    assert!(matches!(err, PackError::UnknownBiome(ref b) if b == "ocean"));
}

#[test]
fn sample_pack_loads() {
    let pack = load_sample_pack();
    assert_eq!(pack.blend_radius(), 1);
    assert_eq!(
        pack.tint_source(&BlockState::new("minecraft:grass_block")),
        TintSource::Grass
    );
    assert_eq!(pack.biome("minecraft:desert").id, "desert");
    assert_eq!(pack.biome("the_void").id, "plains");
    let grass = pack.block_properties(&BlockState::new("short_grass"));
    assert!(grass.random_offset && !grass.culling);

    let log_x = BlockState::new("oak_log").with_property("axis", "x");
    let m = pack.resolved_model(&log_x).unwrap();
    let r = m.rotation().unwrap();
    assert_eq!((r.x, r.y), (90.0, 90.0));
}
