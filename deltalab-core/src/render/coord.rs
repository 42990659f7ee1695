//! Mixed data-unit / pixel-unit coordinate expressions.
//!
//! A coordinate is anchored on the chart's data axes (bar index, price) and
//! then nudged by a fixed number of pixels. The host evaluates the expression
//! at draw time, after it knows the current axis scaling, so the data part is
//! mapped through the axis first and the pixel offset applied afterwards.

use serde::{Deserialize, Serialize};

/// Arithmetic operator joining two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
}

/// One axis position, serialized in the host's expression shape:
/// `{"du": v}`, `{"px": v}` or `{"op": "+", "lhs": .., "rhs": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Data { du: f64 },
    Pixels { px: f64 },
    Op {
        op: CoordOp,
        lhs: Box<Coord>,
        rhs: Box<Coord>,
    },
}

/// A value on the chart's data axis.
pub fn du(value: f64) -> Coord {
    Coord::Data { du: value }
}

/// A fixed screen-space amount.
pub fn px(value: f64) -> Coord {
    Coord::Pixels { px: value }
}

impl Coord {
    /// `lhs op rhs`, keeping operand order as written.
    pub fn op(lhs: Coord, op: CoordOp, rhs: Coord) -> Coord {
        Coord::Op {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Shift towards larger screen coordinates by `pixels`.
    pub fn plus_px(self, pixels: f64) -> Coord {
        Coord::op(self, CoordOp::Add, px(pixels))
    }

    /// Shift towards smaller screen coordinates by `pixels`.
    ///
    /// On a price axis drawn top-down this moves the point up.
    pub fn minus_px(self, pixels: f64) -> Coord {
        Coord::op(self, CoordOp::Sub, px(pixels))
    }

    /// Evaluate to a screen position along one axis.
    ///
    /// Data units go through `scale`; pixel units are taken as-is.
    pub fn resolve(&self, scale: &dyn AxisScale) -> f64 {
        match self {
            Coord::Data { du } => scale.to_pixels(*du),
            Coord::Pixels { px } => *px,
            Coord::Op { op, lhs, rhs } => {
                let lhs = lhs.resolve(scale);
                let rhs = rhs.resolve(scale);
                match op {
                    CoordOp::Add => lhs + rhs,
                    CoordOp::Sub => lhs - rhs,
                }
            }
        }
    }
}

/// A 2-D position; each axis is its own expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// A point fully in data units.
    pub fn data(x: f64, y: f64) -> Self {
        Self::new(du(x), du(y))
    }
}

/// Maps a data-axis value to screen pixels.
pub trait AxisScale {
    fn to_pixels(&self, value: f64) -> f64;
}

/// Linear map from `[lo, hi]` in data units onto `[start, end]` pixels.
///
/// For a price axis drawn top-down, `start` is the bottom pixel row and `end`
/// the top one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub lo: f64,
    pub hi: f64,
    pub start: f64,
    pub end: f64,
}

impl AxisScale for LinearScale {
    fn to_pixels(&self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        if span.abs() < f64::EPSILON {
            return self.start;
        }
        self.start + (value - self.lo) / span * (self.end - self.start)
    }
}

/// Logarithmic price axis. Non-positive inputs clamp to the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    pub lo: f64,
    pub hi: f64,
    pub start: f64,
    pub end: f64,
}

impl AxisScale for LogScale {
    fn to_pixels(&self, value: f64) -> f64 {
        if value <= 0.0 || self.lo <= 0.0 || self.hi <= 0.0 {
            return self.start;
        }
        let span = self.hi.ln() - self.lo.ln();
        if span.abs() < f64::EPSILON {
            return self.start;
        }
        self.start + (value.ln() - self.lo.ln()) / span * (self.end - self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y_AXIS: LinearScale = LinearScale {
        lo: 0.0,
        hi: 100.0,
        start: 500.0,
        end: 0.0,
    };

    #[test]
    fn serializes_to_host_expression() {
        let y = du(5012.25).minus_px(8.0);
        let json = serde_json::to_value(&y).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "-", "lhs": {"du": 5012.25}, "rhs": {"px": 8.0}})
        );
    }

    #[test]
    fn deserializes_host_expression() {
        let coord: Coord =
            serde_json::from_str(r#"{"op":"+","lhs":{"du":0.0},"rhs":{"px":14.0}}"#).unwrap();
        assert_eq!(coord, du(0.0).plus_px(14.0));
    }

    #[test]
    fn data_then_pixels_on_linear_axis() {
        // 50 maps to pixel row 250; eight pixels up is row 242.
        assert_eq!(du(50.0).minus_px(8.0).resolve(&Y_AXIS), 242.0);
        assert_eq!(du(50.0).plus_px(8.0).resolve(&Y_AXIS), 258.0);
    }

    #[test]
    fn operand_order_is_preserved() {
        let data_first = Coord::op(du(50.0), CoordOp::Sub, px(8.0));
        let pixels_first = Coord::op(px(8.0), CoordOp::Sub, du(50.0));
        assert_ne!(data_first.resolve(&Y_AXIS), pixels_first.resolve(&Y_AXIS));
    }

    #[test]
    fn pixel_offset_is_zoom_independent_on_log_axis() {
        let log = LogScale {
            lo: 10.0,
            hi: 1000.0,
            start: 400.0,
            end: 0.0,
        };
        for price in [20.0, 150.0, 900.0] {
            let anchored = du(price).minus_px(8.0).resolve(&log);
            assert!((log.to_pixels(price) - anchored - 8.0).abs() < 1e-9);
        }
        assert!((log.to_pixels(100.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_scales_pin_to_start() {
        let flat = LinearScale {
            lo: 5.0,
            hi: 5.0,
            start: 10.0,
            end: 0.0,
        };
        assert_eq!(flat.to_pixels(123.0), 10.0);
    }
}
