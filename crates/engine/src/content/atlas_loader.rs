use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageError, ImageReader};
use thiserror::Error;
use tracing::debug;

use crate::app::rendering::TERRAIN_COLUMNS;
use crate::app::{
    AtlasSet, AtlasSetError, PixelBuffer, PixelBufferError, FACING_ROWS, WALK_CYCLE_COLUMNS,
};

use super::{WorldDef, WorldDefError};

#[derive(Debug, Error)]
pub enum AtlasLoadError {
    #[error("failed to open atlas '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode atlas '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error(transparent)]
    Buffer(#[from] PixelBufferError),
    #[error(transparent)]
    AtlasSet(#[from] AtlasSetError),
    #[error(transparent)]
    WorldDef(#[from] WorldDefError),
}

/// Decodes the three atlases named by the world definition and scales each so
/// one atlas cell covers exactly one tile (entity cells: one by two tiles).
pub fn load_atlas_set(assets_dir: &Path, world: &WorldDef) -> Result<AtlasSet, AtlasLoadError> {
    let tile_px = world.scale;
    if tile_px == 0 {
        return Err(AtlasSetError::ZeroTileSize.into());
    }
    world.validate()?;

    let terrain = load_scaled_atlas(
        &assets_dir.join(&world.atlases.terrain),
        TERRAIN_COLUMNS * tile_px,
        tile_px,
    )?;
    let entity = load_scaled_atlas(
        &assets_dir.join(&world.atlases.entity),
        WALK_CYCLE_COLUMNS * tile_px,
        FACING_ROWS * tile_px * 2,
    )?;
    let highlight = load_scaled_atlas(&assets_dir.join(&world.atlases.highlight), tile_px, tile_px)?;

    Ok(AtlasSet::new(terrain, entity, highlight, tile_px)?)
}

pub fn load_scaled_atlas(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, AtlasLoadError> {
    let decoded = ImageReader::open(path)
        .map_err(|source| AtlasLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| AtlasLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (source_width, source_height) = decoded.dimensions();
    let scaled = if (source_width, source_height) == (width, height) {
        decoded
    } else {
        imageops::resize(&decoded, width, height, FilterType::Nearest)
    };
    debug!(
        path = %path.display(),
        source_width,
        source_height,
        width,
        height,
        "atlas_loaded"
    );

    Ok(PixelBuffer::from_rgba(width, height, scaled.into_raw())?)
}
