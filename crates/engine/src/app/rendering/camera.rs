use crate::app::Vec2;

use super::pixel_buffer::{AtlasRect, BlendMode, PixelBuffer};

/// Cleared to this outside the world frame.
pub const VOID_COLOR: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Keeps a world position at the viewport centre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FollowCamera {
    pub focus: Vec2,
}

impl FollowCamera {
    pub fn new(focus: Vec2) -> Self {
        Self { focus }
    }

    /// Screen position of the world frame's top-left corner.
    pub fn frame_origin(&self, viewport: Viewport, tile_px: u32) -> (i32, i32) {
        let x = viewport.width as f32 * 0.5 - self.focus.x * tile_px as f32;
        let y = viewport.height as f32 * 0.5 - self.focus.y * tile_px as f32;
        (x.round() as i32, y.round() as i32)
    }

    /// Clears `view` and copies `frame` into it at the camera offset, clipped.
    pub fn place_frame(&self, frame: &PixelBuffer, tile_px: u32, view: &mut PixelBuffer) {
        let viewport = Viewport {
            width: view.width(),
            height: view.height(),
        };
        let (x, y) = self.frame_origin(viewport, tile_px);
        view.fill(VOID_COLOR);
        view.blit(
            frame,
            AtlasRect::new(0, 0, frame.width(), frame.height()),
            x,
            y,
            frame.width(),
            frame.height(),
            BlendMode::Replace,
        );
    }
}
