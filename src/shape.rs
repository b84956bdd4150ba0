use serde::{Deserialize, Serialize};

use crate::{codec::CodecError, PointId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Undirected edge between two points, stored in canonical form.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    /// p is the lower index
    pub p: PointId,
    /// q is the higher index
    pub q: PointId,
}

impl Edge {
    pub fn new(a: PointId, b: PointId) -> Self {
        if a <= b {
            Self { p: a, q: b }
        } else {
            Self { p: b, q: a }
        }
    }
}

/// A triangle as a triple of point indices.
///
/// The triple is ordered for serialization only; callers should not rely on
/// its winding.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [PointId; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            points: [PointId::from(a), PointId::from(b), PointId::from(c)],
        }
    }

    /// The three edges, canonicalized.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.points;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    /// Same triangle with the second and third vertex swapped, reversing its winding.
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.points;
        Self { points: [a, c, b] }
    }

    pub fn contains_point(&self, point: PointId) -> bool {
        self.points.contains(&point)
    }

    /// Indices as plain `u32`, the wire representation.
    pub fn indices(&self) -> [u32; 3] {
        self.points.map(|p| p.as_u32())
    }

    /// Index triple sorted ascending, handy for comparing triangles as sets.
    pub fn sorted_indices(&self) -> [u32; 3] {
        let mut indices = self.indices();
        indices.sort_unstable();
        indices
    }
}

impl From<[PointId; 3]> for Triangle {
    fn from(points: [PointId; 3]) -> Self {
        Self { points }
    }
}

impl From<[u32; 3]> for Triangle {
    fn from([a, b, c]: [u32; 3]) -> Self {
        Self::new(a, b, c)
    }
}

impl TryFrom<&[i64]> for Triangle {
    type Error = CodecError;

    /// Validates an untyped index list: exactly three entries, none negative
    /// or wider than the wire format allows.
    fn try_from(indices: &[i64]) -> Result<Self, Self::Error> {
        let &[a, b, c] = indices else {
            return Err(CodecError::TriangleArity {
                found: indices.len(),
            });
        };

        let mut points = [PointId::default(); 3];
        for (slot, index) in points.iter_mut().zip([a, b, c]) {
            let index = u32::try_from(index).map_err(|_| CodecError::InvalidIndex {
                index: index.to_string(),
            })?;
            *slot = PointId::from(index);
        }
        Ok(Self { points })
    }
}

impl TryFrom<&[f64]> for Triangle {
    type Error = CodecError;

    /// Like the `i64` conversion, additionally rejecting non-integral values.
    fn try_from(indices: &[f64]) -> Result<Self, Self::Error> {
        if indices.len() != 3 {
            return Err(CodecError::TriangleArity {
                found: indices.len(),
            });
        }

        let mut integral = [0i64; 3];
        for (slot, &index) in integral.iter_mut().zip(indices) {
            if !index.is_finite() || index.fract() != 0. || index.abs() > i64::MAX as f64 {
                return Err(CodecError::InvalidIndex {
                    index: index.to_string(),
                });
            }
            *slot = index as i64;
        }
        Self::try_from(&integral[..])
    }
}
