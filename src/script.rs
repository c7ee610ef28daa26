use std::{fs::File, io::BufReader, path::Path};

use crate::core::{PixelBuffer, Point};
use crate::error::{SoftmaskError, SoftmaskResult};
use crate::geom::{Polygon, Quad};
use crate::mask::{MaskConfig, validate_feather};
use crate::session::BrushSession;

/// A replayable list of erase operations with shared defaults.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MaskScript {
    #[serde(default)]
    pub config: MaskConfig,
    pub ops: Vec<MaskOp>,
}

/// `radius` / `feather` left out fall back to the script config.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskOp {
    Circle {
        center: Point,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feather: Option<f64>,
    },
    Stroke {
        points: Vec<Point>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feather: Option<f64>,
    },
    Polygon {
        points: Polygon,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feather: Option<f64>,
    },
    Quad {
        quad: Quad,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feather: Option<f64>,
    },
}

impl MaskScript {
    pub fn from_json(s: &str) -> SoftmaskResult<Self> {
        let script: Self = serde_json::from_str(s)?;
        Ok(script)
    }

    pub fn from_path(path: &Path) -> SoftmaskResult<Self> {
        let f = File::open(path).map_err(|e| {
            SoftmaskError::Other(anyhow::Error::new(e).context(format!(
                "open mask script '{}'",
                path.display()
            )))
        })?;
        let script: Self = serde_json::from_reader(BufReader::new(f))?;
        Ok(script)
    }

    pub fn to_json_pretty(&self) -> SoftmaskResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SoftmaskResult<()> {
        self.config.validate()?;
        for (i, op) in self.ops.iter().enumerate() {
            op.validate(&self.config)
                .map_err(|e| SoftmaskError::validation(format!("op {i}: {e}")))?;
        }
        Ok(())
    }

    /// Replays every op, in order, against a copy of `buffer`.
    #[tracing::instrument(skip(self, buffer), fields(ops = self.ops.len()))]
    pub fn apply(&self, buffer: &PixelBuffer) -> SoftmaskResult<PixelBuffer> {
        self.validate()?;
        let mut session = BrushSession::new(buffer.clone(), self.config)?;
        for op in &self.ops {
            op.run(&mut session, &self.config)?;
        }
        Ok(session.into_buffer())
    }
}

impl MaskOp {
    fn validate(&self, base: &MaskConfig) -> SoftmaskResult<()> {
        let feather = match self {
            Self::Circle { feather, .. }
            | Self::Stroke { feather, .. }
            | Self::Polygon { feather, .. }
            | Self::Quad { feather, .. } => feather.unwrap_or(base.feather),
        };
        validate_feather(feather)?;
        match self {
            Self::Circle { center, radius, .. } => {
                validate_radius(radius.unwrap_or(base.radius))?;
                if !center.is_finite() {
                    return Err(SoftmaskError::geometry("circle center is not finite"));
                }
            }
            Self::Stroke { points, radius, .. } => {
                validate_radius(radius.unwrap_or(base.radius))?;
                Polygon::new(points.clone()).validate()?;
            }
            Self::Polygon { points, .. } => points.validate()?,
            Self::Quad { quad, .. } => quad.validate()?,
        }
        Ok(())
    }

    fn run(&self, session: &mut BrushSession, base: &MaskConfig) -> SoftmaskResult<()> {
        match self {
            Self::Circle {
                center,
                radius,
                feather,
            } => {
                configure(session, base, *radius, *feather)?;
                session.begin_stroke(*center);
                session.end_stroke();
            }
            Self::Stroke {
                points,
                radius,
                feather,
            } => {
                configure(session, base, *radius, *feather)?;
                session.stroke(points);
            }
            Self::Polygon { points, feather } => {
                configure(session, base, None, *feather)?;
                session.erase_lasso(points);
            }
            Self::Quad { quad, feather } => {
                configure(session, base, None, *feather)?;
                session.erase_quad(quad);
            }
        }
        Ok(())
    }
}

fn configure(
    session: &mut BrushSession,
    base: &MaskConfig,
    radius: Option<f64>,
    feather: Option<f64>,
) -> SoftmaskResult<()> {
    session.set_radius(radius.unwrap_or(base.radius))?;
    session.set_feather(feather.unwrap_or(base.feather))
}

fn validate_radius(radius: f64) -> SoftmaskResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SoftmaskError::validation(format!(
            "radius must be finite and > 0, got {radius}"
        )));
    }
    Ok(())
}
