use rayon::prelude::*;

use crate::core::{PixelBuffer, Rect, erode_alpha};

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`, always inside its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRegion {
    /// Pixels whose integer coordinates fall inside `rect` (edges inclusive),
    /// clipped to a `width x height` buffer. `None` if nothing remains.
    pub fn clip(rect: Rect, width: u32, height: u32) -> Option<Self> {
        if !rect.is_finite() || width == 0 || height == 0 {
            return None;
        }
        let rect = rect.abs();
        let min_x = rect.x0.floor().max(0.0);
        let min_y = rect.y0.floor().max(0.0);
        let max_x = rect.x1.ceil().min(f64::from(width) - 1.0);
        let max_y = rect.y1.ceil().min(f64::from(height) - 1.0);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Self {
            x0: min_x as u32,
            y0: min_y as u32,
            x1: max_x as u32 + 1,
            y1: max_y as u32 + 1,
        })
    }

    pub fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(self) -> u32 {
        self.y1 - self.y0
    }

    pub fn area(self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        self.x0 <= x && x < self.x1 && self.y0 <= y && y < self.y1
    }
}

/// Walks every pixel of `region` and scales its alpha by `1 - strength(x, y)`.
///
/// `strength` returns `None` for pixels that must stay untouched. Rows are
/// independent, so the parallel walk produces the same bytes as the
/// sequential one.
pub fn apply_erase<F>(buf: &mut PixelBuffer, region: PixelRegion, parallel: bool, strength: F)
where
    F: Fn(u32, u32) -> Option<f64> + Sync,
{
    debug_assert!(region.x1 <= buf.width() && region.y1 <= buf.height());
    let stride = buf.stride();
    if stride == 0 {
        return;
    }
    let rows_start = region.y0 as usize * stride;
    let rows_end = region.y1 as usize * stride;
    let rows = &mut buf.as_raw_mut()[rows_start..rows_end];

    let erase_row = |(i, row): (usize, &mut [u8])| {
        let y = region.y0 + i as u32;
        let start = region.x0 as usize * 4;
        let end = region.x1 as usize * 4;
        for (dx, px) in row[start..end].chunks_exact_mut(4).enumerate() {
            let x = region.x0 + dx as u32;
            if let Some(e) = strength(x, y) {
                px[3] = erode_alpha(px[3], e);
            }
        }
    };

    if parallel {
        rows.par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(erase_row);
    } else {
        rows.chunks_exact_mut(stride).enumerate().for_each(erase_row);
    }
}
