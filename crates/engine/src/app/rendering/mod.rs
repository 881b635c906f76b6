pub(crate) mod atlas;
mod background;
mod camera;
mod compositor;
mod pixel_buffer;
mod renderer;

pub use atlas::{AtlasKind, AtlasSet, AtlasSetError, TerrainLayout, TERRAIN_COLUMNS};
pub use background::BackgroundCache;
pub use camera::{FollowCamera, Viewport, VOID_COLOR};
pub use compositor::{
    count_visible_dynamic_cells, ComposedFrame, FrameCompositor, VIEW_CULL_RADIUS_TILES,
};
pub use pixel_buffer::{blend_over, AtlasRect, BlendMode, PixelBuffer, PixelBufferError};
pub use renderer::Renderer;
