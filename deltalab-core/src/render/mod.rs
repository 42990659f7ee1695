//! Graphics model returned to the host: coordinates, styles and items.
//!
//! Everything here is an immutable value rebuilt on every call. The host
//! diffs items by key, so keys must be stable for a given bar index.

pub mod coord;
pub mod graphics;
pub mod style;

pub use coord::{du, px, AxisScale, Coord, CoordOp, LinearScale, LogScale, Point};
pub use graphics::{Graphics, GraphicsItem, ShapePrimitive};
pub use style::{
    display_integer, round_for_display, Color, ColorError, DeltaPalette, FillStyle, FontWeight,
    LineStyle, TextAlignment, TextStyle,
};
