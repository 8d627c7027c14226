use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use lane_rush_rendering::{Color, SpriteKey};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Position in screen-space pixels where the sprite's top-left corner is placed.
    pub(crate) position: Vec2,
    /// Desired size in screen-space pixels.
    pub(crate) size: Vec2,
    /// Tint applied to the sprite.
    pub(crate) tint: Color,
}

impl DrawParams {
    /// Creates draw parameters anchored at the provided position and size.
    #[must_use]
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Overrides the tint colour used when drawing the sprite.
    #[must_use]
    pub(crate) fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads the default sprite manifest from disk.
    pub(crate) fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_path(Self::default_manifest_path())
    }

    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Draws the requested sprite using the supplied parameters.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            draw_params,
        );

        Ok(())
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Returns the source dimensions of the texture stored for the key.
    #[must_use]
    pub(crate) fn texture_size(&self, key: SpriteKey) -> Option<Vec2> {
        self.textures
            .get(&key)
            .map(|texture| Vec2::new(texture.width(), texture.height()))
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    if !resolved.is_empty() {
        let unexpected = resolved
            .into_keys()
            .map(|key| format!("{key:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("sprite manifest contains unexpected keys: {unexpected}");
    }

    Ok(ordered)
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Background" => Ok(SpriteKey::Background),
        "PlayerCar" => Ok(SpriteKey::PlayerCar),
        "FuelCan" => Ok(SpriteKey::FuelCan),
        "EnemyCoupe" => Ok(SpriteKey::EnemyCoupe),
        "EnemySedan" => Ok(SpriteKey::EnemySedan),
        "EnemyTaxi" => Ok(SpriteKey::EnemyTaxi),
        "EnemyVan" => Ok(SpriteKey::EnemyVan),
        _ => bail!("unknown sprite key `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, path::Path};

    const FULL_MANIFEST: &str = r#"
        version = 1

        [sprites]
        Background = "background.png"
        PlayerCar = "main_car.png"
        FuelCan = "petrol.png"
        EnemyCoupe = "enemy1.png"
        EnemySedan = "enemy2.png"
        EnemyTaxi = "enemy3.png"
        EnemyVan = "enemy4.png"
    "#;

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            Background = "background.png"
            PlayerCar = "main_car.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing enemy sprites should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = format!("{FULL_MANIFEST}\nExtra = \"extra.png\"\n");
        let result = parse_manifest(&manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_unsupported_versions() {
        let manifest = FULL_MANIFEST.replace("version = 1", "version = 2");
        let result = parse_manifest(&manifest, Path::new("assets"));
        assert!(result.is_err(), "future versions must be rejected");
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed =
            parse_manifest(FULL_MANIFEST, Path::new("root")).expect("manifest should parse");
        assert_eq!(parsed.len(), SpriteKey::ALL.len());
        assert_eq!(
            parsed[0],
            (SpriteKey::Background, PathBuf::from("root/background.png"))
        );
        assert_eq!(
            parsed[6],
            (SpriteKey::EnemyVan, PathBuf::from("root/enemy4.png"))
        );
    }

    #[test]
    fn atlas_loads_textures_using_deterministic_order() {
        let entries =
            parse_manifest(FULL_MANIFEST, Path::new("assets")).expect("manifest parses");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
    }

    #[test]
    fn atlas_loads_each_texture_exactly_once() {
        let entries =
            parse_manifest(FULL_MANIFEST, Path::new("assets")).expect("manifest parses");
        let load_counts = RefCell::new(HashMap::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            *load_counts.borrow_mut().entry(key).or_insert(0) += 1;
            Ok(Texture2D::empty())
        })
        .expect("atlas should load textures once");

        for key in SpriteKey::ALL {
            assert!(atlas.contains(key));
            assert_eq!(
                load_counts.borrow().get(&key),
                Some(&1),
                "loader should be invoked exactly once per key"
            );
        }
    }
}
