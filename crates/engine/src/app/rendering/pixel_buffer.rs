use thiserror::Error;

const BYTES_PER_PIXEL: usize = 4;

/// Pixel-space sub-rectangle of an atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of cell `(column, row)` in a grid of `cell_width x cell_height` cells.
    pub const fn cell(column: u32, row: u32, cell_width: u32, cell_height: u32) -> Self {
        Self::new(
            column * cell_width,
            row * cell_height,
            cell_width,
            cell_height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Overwrite destination pixels, alpha included.
    Replace,
    /// Source-over compositing with straight alpha.
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rgba length mismatch for {width}x{height}: expected {expected} bytes, got {actual}")]
pub struct PixelBufferError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// Row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(color);
        buffer
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for chunk in self.rgba.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, PixelBufferError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(PixelBufferError {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.byte_offset(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.rgba[offset..offset + BYTES_PER_PIXEL]);
        Some(out)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(offset) = self.byte_offset(x, y) {
            self.rgba[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color);
        }
    }

    fn byte_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Draws `src_rect` of `source` into the destination rectangle at
    /// `(dst_x, dst_y)` sized `dst_width x dst_height`, clipped to this buffer.
    ///
    /// Sampling is nearest-neighbour when the sizes differ. Source pixels that
    /// fall outside `source` leave the destination untouched.
    pub fn blit(
        &mut self,
        source: &PixelBuffer,
        src_rect: AtlasRect,
        dst_x: i32,
        dst_y: i32,
        dst_width: u32,
        dst_height: u32,
        mode: BlendMode,
    ) {
        if src_rect.width == 0 || src_rect.height == 0 || dst_width == 0 || dst_height == 0 {
            return;
        }

        let draw_left = dst_x.max(0);
        let draw_top = dst_y.max(0);
        let draw_right = dst_x
            .saturating_add(dst_width as i32)
            .min(self.width as i32);
        let draw_bottom = dst_y
            .saturating_add(dst_height as i32)
            .min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        for out_y in draw_top..draw_bottom {
            let dy = (out_y - dst_y) as u64;
            let src_y = src_rect.y as u64 + dy * src_rect.height as u64 / dst_height as u64;
            if src_y >= source.height as u64 {
                continue;
            }
            for out_x in draw_left..draw_right {
                let dx = (out_x - dst_x) as u64;
                let src_x = src_rect.x as u64 + dx * src_rect.width as u64 / dst_width as u64;
                let Some(src_pixel) = source.pixel(src_x as u32, src_y as u32) else {
                    continue;
                };
                let (out_x, out_y) = (out_x as u32, out_y as u32);
                match mode {
                    BlendMode::Replace => self.set_pixel(out_x, out_y, src_pixel),
                    BlendMode::Over => {
                        if src_pixel[3] == 0 {
                            continue;
                        }
                        let Some(dst_pixel) = self.pixel(out_x, out_y) else {
                            continue;
                        };
                        self.set_pixel(out_x, out_y, blend_over(src_pixel, dst_pixel));
                    }
                }
            }
        }
    }
}

/// Straight-alpha source-over, integer only so results are reproducible.
pub fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let src_a = src[3] as u32;
    if src_a == 255 {
        return src;
    }
    if src_a == 0 {
        return dst;
    }
    let dst_a = dst[3] as u32;
    // Both terms scaled by 255.
    let dst_weight = dst_a * (255 - src_a);
    let out_a_scaled = src_a * 255 + dst_weight;
    if out_a_scaled == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for channel in 0..3 {
        let numerator = src[channel] as u32 * src_a * 255 + dst[channel] as u32 * dst_weight;
        out[channel] = ((numerator + out_a_scaled / 2) / out_a_scaled).min(255) as u8;
    }
    out[3] = ((out_a_scaled + 127) / 255).min(255) as u8;
    out
}
