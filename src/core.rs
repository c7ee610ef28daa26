use crate::error::{SoftmaskError, SoftmaskResult};

pub use kurbo::{Line, Point, Rect};

/// Straight-alpha RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> SoftmaskResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(SoftmaskError::validation(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> SoftmaskResult<Self> {
        let len = byte_len(width, height)?;
        let data = rgba.repeat(len / 4);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn into_rgba_image(self) -> SoftmaskResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| SoftmaskError::image("pixel buffer does not fit an RgbaImage"))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index_of(x, y)?;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).map(|px| px[3])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        let Some(idx) = self.index_of(x, y) else {
            return false;
        };
        self.data[idx..idx + 4].copy_from_slice(&rgba);
        true
    }

    pub fn same_dimensions(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Overwrites `self` with the contents of `src`; both must share dimensions.
    pub fn copy_from(&mut self, src: &Self) -> SoftmaskResult<()> {
        if !self.same_dimensions(src) {
            return Err(SoftmaskError::validation(format!(
                "buffer dimensions differ: {}x{} vs {}x{}",
                self.width, self.height, src.width, src.height
            )));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

fn byte_len(width: u32, height: u32) -> SoftmaskResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SoftmaskError::validation("pixel buffer size overflow"))
}

/// Scales a straight alpha value by `1 - strength`, `strength` clamped to [0,1].
pub(crate) fn erode_alpha(alpha: u8, strength: f64) -> u8 {
    let keep = (1.0 - strength).clamp(0.0, 1.0);
    (f64::from(alpha) * keep).round().clamp(0.0, 255.0) as u8
}
