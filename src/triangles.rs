use crate::{points::Points, shape::Triangle};

/// Triangle store, holds the triangle set of one insertion step.
// Note: a step never edits the store in place, the next step's store is built
//       from the retained triangles plus the ones fanned around the new point.
#[derive(Debug, Clone, Default)]
pub struct TriangleStore {
    triangles: Vec<Triangle>,
}

impl TriangleStore {
    pub fn new() -> Self {
        Self { triangles: vec![] }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Returns number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// insert a new triangle
    pub fn insert(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Triangles not touching any super-triangle vertex.
    pub fn iter_real<'a>(&'a self, points: &'a Points) -> impl Iterator<Item = &'a Triangle> {
        self.triangles
            .iter()
            .filter(|t| !t.points.iter().any(|p| points.is_fake(*p)))
    }

    pub fn into_vec(self) -> Vec<Triangle> {
        self.triangles
    }
}

impl FromIterator<Triangle> for TriangleStore {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}
