use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::app::rendering::TERRAIN_COLUMNS;
use crate::app::{Tilemap, TilemapError, Vec2, FACING_ROWS};

/// Largest pixel extent accepted for the world frame or any scaled atlas.
pub const MAX_PIXEL_EXTENT: u32 = 8192;

#[derive(Debug, Error)]
pub enum WorldDefError {
    #[error("failed to read world definition '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse world definition '{path}' at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid world definition at {field}: {message}")]
    Invalid { field: String, message: String },
    #[error(transparent)]
    Tilemap(#[from] TilemapError),
}

/// World size, entity spawn and static overlays, read from `world.json`.
/// Missing fields fall back to the stock 20x20 world.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldDef {
    pub width: u32,
    pub height: u32,
    /// Pixels per tile on screen.
    pub scale: u32,
    pub entity: EntityDef,
    pub tiles: Vec<TileDef>,
    pub atlases: AtlasFiles,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityDef {
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Tiles per frame.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileDef {
    pub x: u32,
    pub y: u32,
    pub code: u8,
}

/// Atlas image names, relative to the assets directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtlasFiles {
    pub terrain: String,
    pub entity: String,
    pub highlight: String,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            scale: 50,
            entity: EntityDef::default(),
            tiles: vec![TileDef { x: 5, y: 5, code: 1 }],
            atlases: AtlasFiles::default(),
        }
    }
}

impl Default for EntityDef {
    fn default() -> Self {
        Self {
            spawn_x: 15.0,
            spawn_y: 15.0,
            speed: 0.12,
        }
    }
}

impl Default for AtlasFiles {
    fn default() -> Self {
        Self {
            terrain: "terrain.png".to_string(),
            entity: "entity.png".to_string(),
            highlight: "highlight.png".to_string(),
        }
    }
}

impl WorldDef {
    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.entity.spawn_x, self.entity.spawn_y)
    }

    pub fn build_tilemap(&self) -> Result<Tilemap, WorldDefError> {
        let tiles = self.tiles.iter().map(|tile| (tile.x, tile.y, tile.code));
        Ok(Tilemap::with_tiles(self.width, self.height, tiles)?)
    }

    pub fn validate(&self) -> Result<(), WorldDefError> {
        if self.width == 0 {
            return Err(invalid("width", "must be positive"));
        }
        if self.height == 0 {
            return Err(invalid("height", "must be positive"));
        }
        if self.scale == 0 {
            return Err(invalid("scale", "must be positive"));
        }
        for (field, cells) in [
            ("width", self.width),
            ("height", self.height),
            ("scale", TERRAIN_COLUMNS),
            ("scale", FACING_ROWS * 2),
        ] {
            check_pixel_extent(field, cells, self.scale)?;
        }
        if !(self.entity.speed.is_finite() && self.entity.speed > 0.0) {
            return Err(invalid(
                "entity.speed",
                format!("expected positive finite number, got {}", self.entity.speed),
            ));
        }
        check_spawn_axis("entity.spawn_x", self.entity.spawn_x, self.width)?;
        check_spawn_axis("entity.spawn_y", self.entity.spawn_y, self.height)?;

        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.x >= self.width || tile.y >= self.height {
                return Err(invalid(
                    &format!("tiles[{index}]"),
                    format!(
                        "({}, {}) is outside the {}x{} world",
                        tile.x, tile.y, self.width, self.height
                    ),
                ));
            }
        }

        for (field, name) in [
            ("atlases.terrain", &self.atlases.terrain),
            ("atlases.entity", &self.atlases.entity),
            ("atlases.highlight", &self.atlases.highlight),
        ] {
            if name.trim().is_empty() {
                return Err(invalid(field, "file name must not be empty"));
            }
        }
        Ok(())
    }
}

fn check_spawn_axis(field: &str, value: f32, extent: u32) -> Result<(), WorldDefError> {
    if value.is_finite() && value >= 0.0 && value < extent as f32 {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("expected value in [0, {extent}), got {value}"),
        ))
    }
}

fn check_pixel_extent(field: &str, cells: u32, scale: u32) -> Result<(), WorldDefError> {
    match cells.checked_mul(scale) {
        Some(extent) if extent <= MAX_PIXEL_EXTENT => Ok(()),
        _ => Err(invalid(
            field,
            format!("{cells} cells at scale {scale} exceed {MAX_PIXEL_EXTENT} px"),
        )),
    }
}

fn invalid(field: &str, message: impl Into<String>) -> WorldDefError {
    WorldDefError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Reads and validates a world definition. A missing file yields the default world.
pub fn load_world_def(path: &Path) -> Result<WorldDef, WorldDefError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "world_def_missing_using_defaults");
            return Ok(WorldDef::default());
        }
        Err(source) => {
            return Err(WorldDefError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_world_def(&raw, path)
}

pub fn parse_world_def(raw: &str, path: &Path) -> Result<WorldDef, WorldDefError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let world_def = serde_path_to_error::deserialize::<_, WorldDef>(&mut deserializer).map_err(
        |error| {
            let field = error.path().to_string();
            WorldDefError::Parse {
                path: path.to_path_buf(),
                field,
                source: error.into_inner(),
            }
        },
    )?;
    world_def.validate()?;
    Ok(world_def)
}
