use tracing::trace;

use crate::app::{SimState, Tilemap, Vec2};

use super::atlas::AtlasSet;
use super::background::BackgroundCache;
use super::pixel_buffer::{BlendMode, PixelBuffer};

/// Cells farther than this from the entity on either axis are skipped.
pub const VIEW_CULL_RADIUS_TILES: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedFrame {
    pub pixels: PixelBuffer,
    /// Non-ground cells inside the cull radius. Nothing draws them yet.
    pub visible_dynamic_cells: usize,
}

/// Layers background, highlight marker and entity sprite, in that order.
#[derive(Debug, Clone, Copy)]
pub struct FrameCompositor {
    view_cull_radius: f32,
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self {
            view_cull_radius: VIEW_CULL_RADIUS_TILES,
        }
    }
}

impl FrameCompositor {
    pub fn compose(
        &self,
        background: &BackgroundCache,
        state: &SimState,
        atlases: &AtlasSet,
    ) -> ComposedFrame {
        let tile_px = background.tile_px();
        let mut pixels = background.pixels().clone();

        let visible_dynamic_cells = count_visible_dynamic_cells(
            state.tilemap(),
            state.entity().position,
            self.view_cull_radius,
        );
        trace!(visible_dynamic_cells, "viewport_cull");

        if let Some(tile) = state.highlight().active_tile() {
            pixels.blit(
                atlases.highlight(),
                atlases.highlight_rect(),
                tile.x.saturating_mul(tile_px as i32),
                tile.y.saturating_mul(tile_px as i32),
                tile_px,
                tile_px,
                BlendMode::Over,
            );
        }

        let entity = state.entity();
        pixels.blit(
            atlases.entity(),
            entity.active_frame,
            (entity.position.x * tile_px as f32) as i32,
            (entity.position.y * tile_px as f32) as i32,
            tile_px,
            tile_px * 2,
            BlendMode::Over,
        );

        ComposedFrame {
            pixels,
            visible_dynamic_cells,
        }
    }
}

/// Walks the map the way per-frame tile drawing would, skipping cells outside
/// the cull radius, and counts the non-ground cells left.
pub fn count_visible_dynamic_cells(tilemap: &Tilemap, focus: Vec2, radius: f32) -> usize {
    let mut visible = 0usize;
    for y in 0..tilemap.height() {
        for x in 0..tilemap.width() {
            if (focus.x - x as f32).abs() > radius || (focus.y - y as f32).abs() > radius {
                continue;
            }
            if tilemap.tile_at(x, y).is_some_and(|code| !code.is_default()) {
                visible += 1;
            }
        }
    }
    visible
}
