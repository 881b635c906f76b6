use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::{FollowCamera, PixelBuffer};

/// Presents composed frames on a window surface. The surface buffer matches
/// the window's physical size; each frame is placed around the camera focus.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    view: PixelBuffer,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let pixels = Self::build_pixels(Arc::clone(&window), width, height)?;
        Ok(Self {
            window,
            pixels,
            view: PixelBuffer::new(width, height),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.view = PixelBuffer::new(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn present(
        &mut self,
        frame: &PixelBuffer,
        camera: FollowCamera,
        tile_px: u32,
    ) -> Result<(), Error> {
        camera.place_frame(frame, tile_px, &mut self.view);
        self.pixels.frame_mut().copy_from_slice(self.view.as_bytes());
        self.pixels.render()
    }
}
