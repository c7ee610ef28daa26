pub mod circle;
pub mod polygon;

use crate::error::{SoftmaskError, SoftmaskResult};
use crate::falloff::Falloff;

/// Nominal lasso band width in buffer units at `feather = 1`.
pub const DEFAULT_BAND_WIDTH: f64 = 20.0;
/// Extra box margin around a fixed-width lasso band.
pub const FIXED_BAND_MARGIN: f64 = 5.0;

/// How wide the soft band inside a lasso polygon is.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatherBand {
    /// `width * feather`; the scan box grows by [`FIXED_BAND_MARGIN`].
    Fixed { width: f64 },
    /// Longest edge length times `feather`; the scan box grows by the band.
    EdgeScaled,
}

impl Default for FeatherBand {
    fn default() -> Self {
        Self::Fixed {
            width: DEFAULT_BAND_WIDTH,
        }
    }
}

impl FeatherBand {
    pub fn band_width(self, longest_edge: f64, feather: f64) -> f64 {
        let feather = clamp_feather(feather);
        match self {
            Self::Fixed { width } => width.max(0.0) * feather,
            Self::EdgeScaled => longest_edge.max(0.0) * feather,
        }
    }

    pub fn box_margin(self, band: f64) -> f64 {
        match self {
            Self::Fixed { .. } => FIXED_BAND_MARGIN,
            Self::EdgeScaled => band,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub radius: f64,
    pub feather: f64,
    pub falloff: Falloff,
    pub band: FeatherBand,
    /// Erase rows on the rayon pool.
    pub parallel: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            feather: 0.5,
            falloff: Falloff::Cosine,
            band: FeatherBand::default(),
            parallel: false,
        }
    }
}

impl MaskConfig {
    pub fn new(radius: f64, feather: f64) -> SoftmaskResult<Self> {
        let cfg = Self {
            radius,
            feather,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SoftmaskResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SoftmaskError::validation(format!(
                "radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        validate_feather(self.feather)?;
        if let FeatherBand::Fixed { width } = self.band
            && (!width.is_finite() || width < 0.0)
        {
            return Err(SoftmaskError::validation(
                "fixed feather band width must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_feather(feather: f64) -> SoftmaskResult<()> {
    if !(0.0..=1.0).contains(&feather) {
        return Err(SoftmaskError::validation(format!(
            "feather must be in [0, 1], got {feather}"
        )));
    }
    Ok(())
}

/// NaN maps to a hard edge.
pub(crate) fn clamp_feather(feather: f64) -> f64 {
    if feather.is_nan() {
        0.0
    } else {
        feather.clamp(0.0, 1.0)
    }
}
