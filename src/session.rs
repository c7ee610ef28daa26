use crate::core::{Line, PixelBuffer, Point, Rect};
use crate::error::{SoftmaskError, SoftmaskResult};
use crate::geom::{Polygon, Quad, clip_segment};
use crate::mask::{
    MaskConfig, circle::erase_circle_with, polygon::erase_polygon_with, validate_feather,
};

/// Dab spacing as a fraction of the brush radius.
pub const DEFAULT_SPACING: f64 = 0.25;

/// Editing state for one image: the working buffer plus the brush settings.
///
/// A drag is `begin_stroke`, any number of `stroke_to`, then `end_stroke`;
/// each sample stamps independent circle erasures along the path.
#[derive(Debug)]
pub struct BrushSession {
    buffer: PixelBuffer,
    config: MaskConfig,
    spacing: f64,
    last: Option<Point>,
    stroke_dabs: usize,
}

impl BrushSession {
    pub fn new(buffer: PixelBuffer, config: MaskConfig) -> SoftmaskResult<Self> {
        config.validate()?;
        Ok(Self {
            buffer,
            config,
            spacing: DEFAULT_SPACING,
            last: None,
            stroke_dabs: 0,
        })
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    pub fn is_stroking(&self) -> bool {
        self.last.is_some()
    }

    pub fn set_radius(&mut self, radius: f64) -> SoftmaskResult<()> {
        let next = MaskConfig {
            radius,
            ..self.config
        };
        next.validate()?;
        self.config = next;
        Ok(())
    }

    pub fn set_feather(&mut self, feather: f64) -> SoftmaskResult<()> {
        validate_feather(feather)?;
        self.config.feather = feather;
        Ok(())
    }

    pub fn set_spacing(&mut self, spacing: f64) -> SoftmaskResult<()> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(SoftmaskError::validation("dab spacing must be finite and > 0"));
        }
        self.spacing = spacing;
        Ok(())
    }

    /// Distance between consecutive dabs, never below one pixel.
    pub fn dab_step(&self) -> f64 {
        (self.config.radius * self.spacing).max(1.0)
    }

    #[tracing::instrument(skip(self))]
    pub fn begin_stroke(&mut self, at: Point) {
        self.last = None;
        self.stroke_dabs = 0;
        self.dab(at);
    }

    /// Stamps dabs from the previous sample up to and including `to`.
    /// Returns the number of dabs stamped by this call.
    ///
    /// Dabs keep their spacing along the whole segment, but only those whose
    /// center lies within one radius of the buffer are stamped; the rest could
    /// not touch a pixel. The next segment always starts from `to`.
    pub fn stroke_to(&mut self, to: Point) -> usize {
        let Some(from) = self.last else {
            self.begin_stroke(to);
            return 1;
        };
        let dist = from.distance(to);
        if !dist.is_finite() || dist == 0.0 {
            return 0;
        }
        self.last = Some(to);
        let steps = (dist / self.dab_step()).ceil().max(1.0);
        let Some((t0, t1)) = clip_segment(Line::new(from, to), self.reach()) else {
            tracing::trace!(dist, "stroke segment misses the buffer");
            return 0;
        };
        let first = (t0 * steps).ceil().max(1.0);
        let last = (t1 * steps).floor().min(steps);
        if first > last {
            return 0;
        }
        let count = (last - first) as usize + 1;
        for k in 0..count {
            let t = (first + k as f64) / steps;
            self.dab(from.lerp(to, t));
        }
        self.last = Some(to);
        count
    }

    /// Closes the current stroke and reports how many dabs it stamped.
    pub fn end_stroke(&mut self) -> usize {
        self.last = None;
        let dabs = std::mem::take(&mut self.stroke_dabs);
        tracing::debug!(dabs, "stroke finished");
        dabs
    }

    /// Runs a whole stroke through the given samples.
    pub fn stroke(&mut self, points: &[Point]) -> usize {
        let Some((first, rest)) = points.split_first() else {
            return 0;
        };
        self.begin_stroke(*first);
        for p in rest {
            self.stroke_to(*p);
        }
        self.end_stroke()
    }

    #[tracing::instrument(skip(self, polygon), fields(vertices = polygon.len()))]
    pub fn erase_lasso(&mut self, polygon: &Polygon) {
        erase_polygon_with(&mut self.buffer, polygon, &self.config);
    }

    /// Erases the quad as a four-vertex lasso. Collapsed or non-finite
    /// corners follow the lasso rules and may leave the buffer untouched.
    #[tracing::instrument(skip(self))]
    pub fn erase_quad(&mut self, quad: &Quad) {
        erase_polygon_with(&mut self.buffer, &quad.to_polygon(), &self.config);
    }

    /// Area a dab center can occupy and still reach a pixel, with a pixel of
    /// slack on every side.
    fn reach(&self) -> Rect {
        let r = self.config.radius;
        let (w, h) = (f64::from(self.buffer.width()), f64::from(self.buffer.height()));
        Rect::new(-1.0, -1.0, w, h).inflate(r, r)
    }

    fn dab(&mut self, at: Point) {
        tracing::trace!(x = at.x, y = at.y, "dab");
        erase_circle_with(&mut self.buffer, at, &self.config);
        self.last = Some(at);
        self.stroke_dabs += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(w: u32, h: u32, radius: f64, feather: f64) -> BrushSession {
        let buf = PixelBuffer::filled(w, h, [255, 255, 255, 255]).unwrap();
        BrushSession::new(buf, MaskConfig::new(radius, feather).unwrap()).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let buf = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
        let cfg = MaskConfig {
            radius: -1.0,
            ..MaskConfig::default()
        };
        assert!(BrushSession::new(buf, cfg).is_err());
    }

    #[test]
    fn setters_validate() {
        let mut s = session(4, 4, 5.0, 0.5);
        assert!(s.set_radius(0.0).is_err());
        assert!(s.set_feather(1.2).is_err());
        assert!(s.set_spacing(0.0).is_err());
        s.set_radius(8.0).unwrap();
        s.set_feather(0.0).unwrap();
        assert_eq!(s.config().radius, 8.0);
        assert_eq!(s.config().feather, 0.0);
    }

    #[test]
    fn stroke_spacing() {
        let mut s = session(100, 20, 8.0, 0.0);
        // step = 8 * 0.25 = 2
        s.begin_stroke(Point::new(10.0, 10.0));
        assert!(s.is_stroking());
        assert_eq!(s.stroke_to(Point::new(30.0, 10.0)), 10);
        assert_eq!(s.stroke_to(Point::new(30.0, 10.0)), 0);
        assert_eq!(s.end_stroke(), 11);
        assert!(!s.is_stroking());
    }

    #[test]
    fn stroke_to_without_begin_starts_a_stroke() {
        let mut s = session(20, 20, 3.0, 0.0);
        assert_eq!(s.stroke_to(Point::new(5.0, 5.0)), 1);
        assert_eq!(s.buffer().alpha(5, 5), Some(0));
        assert_eq!(s.end_stroke(), 1);
    }

    #[test]
    fn dab_step_never_below_one_pixel() {
        let mut s = session(4, 4, 2.0, 0.0);
        s.set_spacing(0.1).unwrap();
        assert_eq!(s.dab_step(), 1.0);
    }

    #[test]
    fn stroke_clears_the_swept_path() {
        let mut s = session(60, 20, 3.0, 0.0);
        let dabs = s.stroke(&[Point::new(5.0, 10.0), Point::new(55.0, 10.0)]);
        assert!(dabs > 1);
        let buf = s.into_buffer();
        for x in 5..=55 {
            assert_eq!(buf.alpha(x, 10), Some(0), "x={x}");
        }
        assert_eq!(buf.alpha(30, 2), Some(255));
    }

    #[test]
    fn empty_stroke_is_noop() {
        let mut s = session(8, 8, 3.0, 0.0);
        assert_eq!(s.stroke(&[]), 0);
        assert!(s.buffer().as_raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn quad_erase_uses_session_feather() {
        let mut s = session(40, 40, 5.0, 0.0);
        let quad = Quad {
            top_left: [5.0, 5.0],
            top_right: [35.0, 6.0],
            bottom_right: [34.0, 35.0],
            bottom_left: [6.0, 34.0],
        };
        s.erase_quad(&quad);
        assert_eq!(s.buffer().alpha(20, 20), Some(0));
        assert_eq!(s.buffer().alpha(2, 2), Some(255));
    }

    #[test]
    fn quad_with_shared_corner_erases_triangle() {
        let mut s = session(20, 20, 5.0, 0.0);
        let quad = Quad {
            top_left: [2.0, 2.0],
            top_right: [2.0, 2.0],
            bottom_right: [18.0, 18.0],
            bottom_left: [2.0, 18.0],
        };
        s.erase_quad(&quad);
        assert_eq!(s.buffer().alpha(4, 14), Some(0));
        assert_eq!(s.buffer().alpha(14, 4), Some(255));
    }

    #[test]
    fn far_off_buffer_stroke_stamps_nothing() {
        let mut s = session(8, 8, 4.0, 0.0);
        s.begin_stroke(Point::new(-1000.0, -1000.0));
        assert_eq!(s.stroke_to(Point::new(2e7, -1000.0)), 0);
        assert!(s.is_stroking());
        assert_eq!(s.end_stroke(), 1);
        assert!(s.buffer().as_raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn long_stroke_only_stamps_near_the_buffer() {
        let mut s = session(8, 8, 4.0, 0.0);
        // step = 1; the reachable stretch is x in [-5, 12].
        s.begin_stroke(Point::new(-1e7, 4.0));
        let dabs = s.stroke_to(Point::new(1e7, 4.0));
        assert!((1..=20).contains(&dabs), "dabs {dabs}");
        assert_eq!(s.buffer().alpha(0, 4), Some(0));
        assert_eq!(s.buffer().alpha(7, 4), Some(0));

        // The stroke continues from the far end, not from the last stamp.
        assert_eq!(s.stroke_to(Point::new(1e7, 40.0)), 0);
        assert_eq!(s.end_stroke(), dabs + 1);
    }

    #[test]
    fn clipped_stroke_matches_unclipped_spacing() {
        // Dabs inside the buffer land on the same grid as an unclipped walk.
        let mut clipped = session(40, 10, 8.0, 0.6);
        clipped.stroke(&[Point::new(-200.0, 5.0), Point::new(60.0, 5.0)]);
        let mut reference = session(40, 10, 8.0, 0.6);
        reference.begin_stroke(Point::new(-200.0, 5.0));
        let step = reference.dab_step();
        let steps = (260.0_f64 / step).ceil();
        for i in 1..=steps as usize {
            let t = i as f64 / steps;
            reference.dab(Point::new(-200.0, 5.0).lerp(Point::new(60.0, 5.0), t));
        }
        assert_eq!(clipped.buffer(), reference.buffer());
    }
}
