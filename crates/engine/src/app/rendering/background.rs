use tracing::debug;

use crate::app::Tilemap;

use super::atlas::AtlasSet;
use super::pixel_buffer::{BlendMode, PixelBuffer};

/// Static world layer, composed once from the tilemap and reused every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundCache {
    pixels: PixelBuffer,
    tile_px: u32,
}

impl BackgroundCache {
    pub fn build(tilemap: &Tilemap, atlases: &AtlasSet) -> Self {
        let tile_px = atlases.tile_px();
        let width_px = tilemap.width() * tile_px;
        let height_px = tilemap.height() * tile_px;
        let mut pixels = PixelBuffer::new(width_px, height_px);
        let layout = atlases.terrain_layout();

        // Runs one tile past each edge; the blit clips the overhang.
        let ground = layout.ground_rect();
        for y in (0..=height_px).step_by(tile_px as usize) {
            for x in (0..=width_px).step_by(tile_px as usize) {
                pixels.blit(
                    atlases.terrain(),
                    ground,
                    x as i32,
                    y as i32,
                    tile_px,
                    tile_px,
                    BlendMode::Replace,
                );
            }
        }

        let mut overlay_count = 0usize;
        for (x, y, code) in tilemap.overlay_cells() {
            let Some(source) = layout.overlay_rect(code) else {
                continue;
            };
            pixels.blit(
                atlases.terrain(),
                source,
                (x * tile_px) as i32,
                (y * tile_px) as i32,
                tile_px,
                tile_px,
                BlendMode::Over,
            );
            overlay_count += 1;
        }

        debug!(width_px, height_px, overlay_count, "background_cache_built");
        Self { pixels, tile_px }
    }

    /// Recomposes from scratch. Only needed if the tilemap ever changes after load.
    pub fn rebuild(&mut self, tilemap: &Tilemap, atlases: &AtlasSet) {
        *self = Self::build(tilemap, atlases);
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn tile_px(&self) -> u32 {
        self.tile_px
    }
}
