#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod falloff;
pub mod geom;
pub mod mask;
pub mod region;
pub mod script;
pub mod session;

pub use crate::core::{Line, PixelBuffer, Point, Rect};
pub use error::{SoftmaskError, SoftmaskResult};
pub use falloff::Falloff;
pub use geom::{
    Polygon, Quad, QuadEdge, clip_segment, distance_to_polygon_edge, distance_to_segment,
    point_in_polygon,
};
pub use mask::{
    DEFAULT_BAND_WIDTH, FIXED_BAND_MARGIN, FeatherBand, MaskConfig,
    circle::{
        circle_erase_strength, erase_circle, erase_circle_in_place, erase_circle_into,
        erase_circle_with,
    },
    polygon::{
        erase_polygon, erase_polygon_in_place, erase_polygon_into, erase_polygon_with,
        polygon_erase_strength, scan_bounds,
    },
};
pub use region::{PixelRegion, apply_erase};
pub use script::{MaskOp, MaskScript};
pub use session::{BrushSession, DEFAULT_SPACING};
