use std::fmt;

use thiserror::Error;

use crate::app::{EntitySheetLayout, TileCode, FACING_ROWS, WALK_CYCLE_COLUMNS};

use super::pixel_buffer::{AtlasRect, PixelBuffer};

pub const TERRAIN_COLUMNS: u32 = 4;

/// Cell positions on the terrain atlas, one row of tile-sized cells:
/// ground, wall, shrub, path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainLayout {
    tile_px: u32,
}

impl TerrainLayout {
    pub fn new(tile_px: u32) -> Self {
        Self { tile_px }
    }

    pub fn tile_px(&self) -> u32 {
        self.tile_px
    }

    pub fn ground_rect(&self) -> AtlasRect {
        AtlasRect::cell(terrain_column(TileCode::Ground), 0, self.tile_px, self.tile_px)
    }

    /// Overlay sprite for a non-ground code; ground has no overlay.
    pub fn overlay_rect(&self, code: TileCode) -> Option<AtlasRect> {
        if code.is_default() {
            return None;
        }
        Some(AtlasRect::cell(
            terrain_column(code),
            0,
            self.tile_px,
            self.tile_px,
        ))
    }

    fn required_size(&self) -> (u32, u32) {
        (TERRAIN_COLUMNS * self.tile_px, self.tile_px)
    }
}

fn terrain_column(code: TileCode) -> u32 {
    match code {
        TileCode::Ground => 0,
        TileCode::Wall => 1,
        TileCode::Shrub => 2,
        TileCode::Path => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasKind {
    Terrain,
    Entity,
    Highlight,
}

impl fmt::Display for AtlasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AtlasKind::Terrain => "terrain",
            AtlasKind::Entity => "entity",
            AtlasKind::Highlight => "highlight",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AtlasSetError {
    #[error("tile size must be positive")]
    ZeroTileSize,
    #[error(
        "{kind} atlas is {actual_width}x{actual_height}px, needs at least {required_width}x{required_height}px"
    )]
    TooSmall {
        kind: AtlasKind,
        actual_width: u32,
        actual_height: u32,
        required_width: u32,
        required_height: u32,
    },
}

/// The three decoded, pre-scaled atlases the pipeline renders from.
#[derive(Debug, Clone)]
pub struct AtlasSet {
    terrain: PixelBuffer,
    entity: PixelBuffer,
    highlight: PixelBuffer,
    terrain_layout: TerrainLayout,
    entity_layout: EntitySheetLayout,
}

impl AtlasSet {
    pub fn new(
        terrain: PixelBuffer,
        entity: PixelBuffer,
        highlight: PixelBuffer,
        tile_px: u32,
    ) -> Result<Self, AtlasSetError> {
        if tile_px == 0 {
            return Err(AtlasSetError::ZeroTileSize);
        }
        let terrain_layout = TerrainLayout::new(tile_px);
        let entity_layout = EntitySheetLayout::for_tile(tile_px);

        ensure_fits(AtlasKind::Terrain, &terrain, terrain_layout.required_size())?;
        ensure_fits(
            AtlasKind::Entity,
            &entity,
            (
                WALK_CYCLE_COLUMNS * entity_layout.cell_width,
                FACING_ROWS * entity_layout.cell_height,
            ),
        )?;
        ensure_fits(AtlasKind::Highlight, &highlight, (tile_px, tile_px))?;

        Ok(Self {
            terrain,
            entity,
            highlight,
            terrain_layout,
            entity_layout,
        })
    }

    pub fn terrain(&self) -> &PixelBuffer {
        &self.terrain
    }

    pub fn entity(&self) -> &PixelBuffer {
        &self.entity
    }

    pub fn highlight(&self) -> &PixelBuffer {
        &self.highlight
    }

    pub fn terrain_layout(&self) -> TerrainLayout {
        self.terrain_layout
    }

    pub fn entity_layout(&self) -> EntitySheetLayout {
        self.entity_layout
    }

    pub fn highlight_rect(&self) -> AtlasRect {
        let tile_px = self.terrain_layout.tile_px;
        AtlasRect::new(0, 0, tile_px, tile_px)
    }

    pub fn tile_px(&self) -> u32 {
        self.terrain_layout.tile_px
    }
}

fn ensure_fits(
    kind: AtlasKind,
    atlas: &PixelBuffer,
    (required_width, required_height): (u32, u32),
) -> Result<(), AtlasSetError> {
    if atlas.width() >= required_width && atlas.height() >= required_height {
        return Ok(());
    }
    Err(AtlasSetError::TooSmall {
        kind,
        actual_width: atlas.width(),
        actual_height: atlas.height(),
        required_width,
        required_height,
    })
}
