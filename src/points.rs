use serde::{Deserialize, Serialize};

use crate::shape::Point;

/// Type alias to the underlying type for PointId.
/// Matches the width of an index on the wire, so a triangulation result can be
/// encoded without narrowing.
type NumType = u32;

/// Scale of the super-triangle relative to the larger bounding-box extent.
const SUPER_TRIANGLE_SCALE: f64 = 20.;

/// new type for point id, it is the index of the point in its sequence
#[derive(
    Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PointId(pub(crate) NumType);

impl PointId {
    /// Get the inner value as usize
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Get the inner value as u32
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// helper method used in the crate when the `PointId` is known to be valid in `Points`
    pub(crate) fn get(&self, points: &Points) -> Point {
        points.points[self.as_usize()]
    }
}

impl From<u32> for PointId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Point store for one triangulation run: the input points followed by the
/// three super-triangle vertices.
#[derive(Clone, Debug)]
pub struct Points {
    points: Vec<Point>,
    real_len: usize,
}

impl Points {
    /// Copies `input` and appends a super-triangle strictly enclosing it.
    ///
    /// `input` must not be empty.
    pub fn new(input: &[Point]) -> Self {
        let mut xmax = f64::MIN;
        let mut xmin = f64::MAX;
        let mut ymax = f64::MIN;
        let mut ymin = f64::MAX;

        let mut points = Vec::with_capacity(input.len() + 3);
        for p in input {
            xmax = xmax.max(p.x);
            xmin = xmin.min(p.x);
            ymax = ymax.max(p.y);
            ymin = ymin.min(p.y);
            points.push(*p);
        }

        let dx = xmax - xmin;
        let dy = ymax - ymin;
        let mut dmax = dx.max(dy);
        if dmax == 0. {
            // all points coincide
            dmax = 1.;
        }
        let mid_x = (xmin + xmax) / 2.;
        let mid_y = (ymin + ymax) / 2.;

        points.push(Point::new(mid_x - SUPER_TRIANGLE_SCALE * dmax, mid_y - dmax));
        points.push(Point::new(mid_x, mid_y + SUPER_TRIANGLE_SCALE * dmax));
        points.push(Point::new(mid_x + SUPER_TRIANGLE_SCALE * dmax, mid_y - dmax));

        Self {
            points,
            real_len: input.len(),
        }
    }

    /// Number of points including the super-triangle vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Number of input points, `n`.
    pub fn real_len(&self) -> usize {
        self.real_len
    }

    /// get point for id
    pub fn get_point(&self, point_id: PointId) -> Option<Point> {
        self.points.get(point_id.as_usize()).copied()
    }

    /// Ids of the super-triangle vertices, `n`, `n + 1` and `n + 2`.
    pub fn super_triangle(&self) -> [PointId; 3] {
        let n = self.real_len as NumType;
        [PointId(n), PointId(n + 1), PointId(n + 2)]
    }

    /// whether the point is one of the super-triangle vertices
    pub fn is_fake(&self, point_id: PointId) -> bool {
        point_id.as_usize() >= self.real_len
    }

    /// iter all points without fake points
    pub fn iter_without_fake(&self) -> impl Iterator<Item = (PointId, Point)> + '_ {
        self.points[..self.real_len]
            .iter()
            .enumerate()
            .map(|(idx, p)| (PointId(idx as NumType), *p))
    }
}
