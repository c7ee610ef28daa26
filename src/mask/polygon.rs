use crate::core::{PixelBuffer, Rect};
use crate::error::{SoftmaskError, SoftmaskResult};
use crate::falloff::Falloff;
use crate::geom::{Polygon, distance_to_polygon_edge, point_in_polygon};
use crate::mask::{FeatherBand, MaskConfig, clamp_feather};
use crate::region::{PixelRegion, apply_erase};

/// Erase strength for an interior point `dist` away from the nearest edge.
///
/// Zero right on the boundary, rising to 1 at the inner edge of the band and
/// staying 1 deeper inside. A zero-width band erases the whole interior.
pub fn polygon_erase_strength(dist: f64, band: f64, falloff: Falloff) -> f64 {
    if band <= 0.0 || dist >= band {
        return 1.0;
    }
    1.0 - falloff.fade(dist / band)
}

pub fn erase_polygon(src: &PixelBuffer, polygon: &Polygon, feather: f64) -> PixelBuffer {
    let mut out = src.clone();
    erase_polygon_in_place(&mut out, polygon, feather);
    out
}

pub fn erase_polygon_into(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    polygon: &Polygon,
    feather: f64,
) -> SoftmaskResult<()> {
    if !dst.same_dimensions(src) {
        return Err(SoftmaskError::validation(
            "erase_polygon_into expects dst matching src dimensions",
        ));
    }
    dst.copy_from(src)?;
    erase_polygon_in_place(dst, polygon, feather);
    Ok(())
}

pub fn erase_polygon_in_place(
    buf: &mut PixelBuffer,
    polygon: &Polygon,
    feather: f64,
) -> Option<PixelRegion> {
    erase_polygon_impl(
        buf,
        polygon,
        feather,
        Falloff::Cosine,
        FeatherBand::default(),
        false,
    )
}

/// Uses feather, falloff, band policy and threading from `cfg`; `cfg.radius`
/// plays no part in a lasso.
pub fn erase_polygon_with(
    buf: &mut PixelBuffer,
    polygon: &Polygon,
    cfg: &MaskConfig,
) -> Option<PixelRegion> {
    erase_polygon_impl(
        buf,
        polygon,
        cfg.feather,
        cfg.falloff,
        cfg.band,
        cfg.parallel,
    )
}

fn erase_polygon_impl(
    buf: &mut PixelBuffer,
    polygon: &Polygon,
    feather: f64,
    falloff: Falloff,
    band_policy: FeatherBand,
    parallel: bool,
) -> Option<PixelRegion> {
    if polygon.is_degenerate() {
        tracing::debug!(
            vertices = polygon.len(),
            "polygon erase skipped: fewer than 3 vertices"
        );
        return None;
    }
    if polygon.validate().is_err() {
        tracing::debug!("polygon erase skipped: non-finite vertex");
        return None;
    }
    let (band, bounds) = band_and_bounds(polygon, feather, band_policy)?;
    let Some(region) = PixelRegion::clip(bounds, buf.width(), buf.height()) else {
        tracing::debug!("polygon erase skipped: polygon is off the buffer");
        return None;
    };
    tracing::debug!(
        vertices = polygon.len(),
        band,
        x0 = region.x0,
        y0 = region.y0,
        w = region.width(),
        h = region.height(),
        "polygon erase"
    );

    let points = polygon.points();
    apply_erase(buf, region, parallel, |x, y| {
        let (px, py) = (f64::from(x), f64::from(y));
        if !point_in_polygon(px, py, points) {
            return None;
        }
        let dist = distance_to_polygon_edge(px, py, points);
        Some(polygon_erase_strength(dist, band, falloff))
    });
    Some(region)
}

/// Bounding box of the vertices, grown by the band policy's margin.
pub fn scan_bounds(polygon: &Polygon, feather: f64, band_policy: FeatherBand) -> Option<Rect> {
    band_and_bounds(polygon, feather, band_policy).map(|(_, r)| r)
}

fn band_and_bounds(
    polygon: &Polygon,
    feather: f64,
    band_policy: FeatherBand,
) -> Option<(f64, Rect)> {
    let bounds = polygon.bounds()?;
    let band = band_policy.band_width(polygon.longest_edge(), clamp_feather(feather));
    let margin = band_policy.box_margin(band);
    Some((band, bounds.inflate(margin, margin)))
}
