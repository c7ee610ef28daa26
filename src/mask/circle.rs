use crate::core::{PixelBuffer, Point, Rect};
use crate::error::{SoftmaskError, SoftmaskResult};
use crate::falloff::Falloff;
use crate::mask::{MaskConfig, clamp_feather};
use crate::region::{PixelRegion, apply_erase};

/// Erase strength at distance `d` from the center of a feathered disk.
///
/// `None` outside the disk. Inside `radius * (1 - feather)` the strength is 1,
/// then it fades to 0 at `radius` (inclusive).
pub fn circle_erase_strength(d: f64, radius: f64, feather: f64, falloff: Falloff) -> Option<f64> {
    if d.is_nan() || d > radius {
        return None;
    }
    let soft_start = radius * (1.0 - clamp_feather(feather));
    if d <= soft_start {
        return Some(1.0);
    }
    let t = (d - soft_start) / (radius - soft_start);
    Some(falloff.fade(t))
}

/// Erases a disk out of `src`, returning the new buffer.
pub fn erase_circle(src: &PixelBuffer, center: Point, radius: f64, feather: f64) -> PixelBuffer {
    let mut out = src.clone();
    erase_circle_in_place(&mut out, center, radius, feather);
    out
}

/// Writes `src` with a disk erased into `dst`, which must match its dimensions.
pub fn erase_circle_into(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    center: Point,
    radius: f64,
    feather: f64,
) -> SoftmaskResult<()> {
    if !dst.same_dimensions(src) {
        return Err(SoftmaskError::validation(
            "erase_circle_into expects dst matching src dimensions",
        ));
    }
    dst.copy_from(src)?;
    erase_circle_in_place(dst, center, radius, feather);
    Ok(())
}

pub fn erase_circle_in_place(
    buf: &mut PixelBuffer,
    center: Point,
    radius: f64,
    feather: f64,
) -> Option<PixelRegion> {
    erase_circle_impl(buf, center, radius, feather, Falloff::Cosine, false)
}

/// Same as [`erase_circle_in_place`], taking radius, feather, falloff and
/// threading from `cfg`.
pub fn erase_circle_with(
    buf: &mut PixelBuffer,
    center: Point,
    cfg: &MaskConfig,
) -> Option<PixelRegion> {
    erase_circle_impl(
        buf,
        center,
        cfg.radius,
        cfg.feather,
        cfg.falloff,
        cfg.parallel,
    )
}

fn erase_circle_impl(
    buf: &mut PixelBuffer,
    center: Point,
    radius: f64,
    feather: f64,
    falloff: Falloff,
    parallel: bool,
) -> Option<PixelRegion> {
    if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
        tracing::debug!(radius, "circle erase skipped: degenerate input");
        return None;
    }
    let bounds = Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    );
    let Some(region) = PixelRegion::clip(bounds, buf.width(), buf.height()) else {
        tracing::debug!("circle erase skipped: disk is off the buffer");
        return None;
    };
    tracing::debug!(
        x0 = region.x0,
        y0 = region.y0,
        w = region.width(),
        h = region.height(),
        "circle erase"
    );

    apply_erase(buf, region, parallel, |x, y| {
        let d = (f64::from(x) - center.x).hypot(f64::from(y) - center.y);
        circle_erase_strength(d, radius, feather, falloff)
    });
    Some(region)
}
