//! Charging bolt outline.
//!
//! The bolt is authored in arbitrary integer units. Loading divides every
//! coordinate by the largest X and Y seen, giving a polygon in the unit
//! square that is later scaled into the bolt frame inside the icon body.

use heapless::Vec;

use crate::config::MAX_BOLT_POINTS;
use crate::error::{MeterError, Result};
use crate::geometry::{PointF, Polygon, RectF};

/// Normalised bolt polygon, coordinates in `[0, 1] x [0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoltShape {
    points: Vec<PointF, MAX_BOLT_POINTS>,
}

impl BoltShape {
    /// Normalise integer points.
    ///
    /// Fails on fewer than three points or when all X or all Y values are
    /// zero (the shape would have no extent to scale).
    pub fn from_points(points: &[(i32, i32)]) -> Result<Self> {
        if points.len() < 3 {
            return Err(MeterError::MalformedBolt);
        }
        let max_x = points.iter().map(|p| p.0).max().unwrap_or(0);
        let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);
        if max_x <= 0 || max_y <= 0 {
            return Err(MeterError::DegenerateBolt);
        }

        let mut normalized = Vec::new();
        for &(x, y) in points {
            normalized
                .push(PointF::new(x as f32 / max_x as f32, y as f32 / max_y as f32))
                .map_err(|_| MeterError::CapacityExceeded("bolt points"))?;
        }
        Ok(Self { points: normalized })
    }

    #[inline]
    pub fn points(&self) -> &[PointF] { &self.points }

    /// Scale the unit outline into `frame`.
    pub fn polygon_in(
        &self,
        frame: &RectF,
    ) -> Polygon {
        let mut polygon = Polygon::new();
        for p in &self.points {
            polygon
                .push(PointF::new(
                    frame.left + p.x * frame.width(),
                    frame.top + p.y * frame.height(),
                ))
                .ok();
        }
        polygon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BOLT_POINTS;

    #[test]
    fn test_default_bolt_normalised() {
        let bolt = BoltShape::from_points(&DEFAULT_BOLT_POINTS).unwrap();
        assert_eq!(bolt.points().len(), DEFAULT_BOLT_POINTS.len());
        for p in bolt.points() {
            assert!((0.0..=1.0).contains(&p.x), "x {} out of unit range", p.x);
            assert!((0.0..=1.0).contains(&p.y), "y {} out of unit range", p.y);
        }
        // 442 is the widest point, 703 the tallest
        assert_eq!(bolt.points()[3], PointF::new(1.0, 259.0 / 703.0));
        assert_eq!(bolt.points()[4], PointF::new(4.0 / 442.0, 1.0));
    }

    #[test]
    fn test_degenerate_bolt_rejected() {
        assert_eq!(
            BoltShape::from_points(&[(0, 0), (0, 5), (0, 9)]),
            Err(MeterError::DegenerateBolt)
        );
        assert_eq!(
            BoltShape::from_points(&[(1, 0), (2, 0), (3, 0)]),
            Err(MeterError::DegenerateBolt)
        );
    }

    #[test]
    fn test_too_few_points_rejected() {
        assert_eq!(BoltShape::from_points(&[(1, 1), (2, 2)]), Err(MeterError::MalformedBolt));
    }

    #[test]
    fn test_polygon_in_frame() {
        let bolt = BoltShape::from_points(&[(0, 0), (10, 0), (10, 10)]).unwrap();
        let polygon = bolt.polygon_in(&RectF::new(10.0, 20.0, 30.0, 60.0));
        assert_eq!(polygon[0], PointF::new(10.0, 20.0));
        assert_eq!(polygon[1], PointF::new(30.0, 20.0));
        assert_eq!(polygon[2], PointF::new(30.0, 60.0));
    }
}
