use std::collections::BTreeMap;

use crate::{points::Points, shape::Edge, triangles::TriangleStore, utils::Predicates, Triangle};

/// State of one triangulation run, handed to [`crate::Observer`] hooks.
pub struct Context<'a> {
    pub points: &'a Points,
    /// triangle set of the current insertion step
    pub triangles: TriangleStore,
    pub predicates: Predicates,
    pub epsilon: f64,

    // reusable per point event buffers to reduce alloc overhead
    pub(crate) bad_triangles: Vec<Triangle>,
    pub(crate) edge_counts: BTreeMap<Edge, u32>,
    pub(crate) boundary: Vec<Edge>,
}

impl<'a> Context<'a> {
    pub fn new(
        points: &'a Points,
        triangles: TriangleStore,
        predicates: Predicates,
        epsilon: f64,
    ) -> Self {
        Self {
            points,
            triangles,
            predicates,
            epsilon,

            bad_triangles: Vec::with_capacity(32),
            edge_counts: BTreeMap::new(),
            boundary: Vec::with_capacity(32),
        }
    }

    /// Triangles whose circumcircle contains the point being inserted,
    /// normalized to counter clockwise order.
    pub fn bad_triangles(&self) -> &[Triangle] {
        &self.bad_triangles
    }

    /// Boundary of the cavity left by the bad triangles.
    pub fn boundary(&self) -> &[Edge] {
        &self.boundary
    }
}
