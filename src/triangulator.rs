use crate::points::Points;
use crate::settings::Settings;
use crate::triangles::TriangleStore;
use crate::utils::Predicates;
use crate::{shape::*, Context, PointId};

/// Observer for the triangulator, used to monitor how insertion works, quite
/// useful for visual debugging when things go wrong. Check the draw demo.
#[allow(unused_variables)]
pub trait Observer {
    /// A point is about to be inserted
    fn enter_point_event(&mut self, point_id: PointId, context: &Context) {}

    /// Bad triangles and the cavity boundary are known, the triangle set is
    /// not yet updated.
    fn cavity_carved(&mut self, point_id: PointId, context: &Context) {}

    /// The cavity has been refilled around the point
    fn exit_point_event(&mut self, point_id: PointId, context: &Context) {}

    /// Scaffolding and degenerate triangles are gone, `result` is final.
    fn finalized(&mut self, result: &[Triangle], context: &Context) {}
}

/// Default dummy observer, blank impl, so all calls should be optimized out by compiler.
impl Observer for () {}

/// Triangulator Builder
///
/// # Example
/// ```rust
///    use triangulator::{Point, Predicates, TriangulatorBuilder};
///
///    let triangulator = TriangulatorBuilder::new()
///        .epsilon(1e-9)
///        .predicates(Predicates::Robust)
///        .build();
///    let triangles = triangulator.triangulate(&[
///        Point::new(0., 0.),
///        Point::new(1., 0.),
///        Point::new(0., 1.),
///    ]);
///    assert_eq!(triangles.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TriangulatorBuilder {
    settings: Settings,
}

impl TriangulatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from loaded settings
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Area tolerance for collinear input and degenerate triangles
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.settings.epsilon = epsilon;
        self
    }

    pub fn predicates(mut self, predicates: Predicates) -> Self {
        self.settings.predicates = predicates;
        self
    }

    /// build the triangulator
    pub fn build(self) -> Triangulator {
        Triangulator {
            settings: self.settings,
        }
    }
}

/// Main interface, grab one by [`TriangulatorBuilder::build`] or `Default`.
///
/// Holds no state between runs, a single instance can serve any number of
/// point sets.
#[derive(Clone, Debug, Default)]
pub struct Triangulator {
    settings: Settings,
}

/// Triangulate with default settings.
pub fn triangulate(points: &[Point]) -> Vec<Triangle> {
    Triangulator::default().triangulate(points)
}

impl Triangulator {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run triangulate with dummy observer
    pub fn triangulate(&self, points: &[Point]) -> Vec<Triangle> {
        self.triangulate_with_observer(points, &mut ())
    }

    /// Run triangulate with observer
    ///
    /// Returns index triples into `points`. Fewer than three points, or points
    /// that are all collinear, give an empty result.
    pub fn triangulate_with_observer(
        &self,
        points: &[Point],
        observer: &mut impl Observer,
    ) -> Vec<Triangle> {
        let Settings {
            epsilon,
            predicates,
        } = self.settings;

        if points.len() < 3 || predicates.is_collinear(points, epsilon) {
            tracing::debug!(points = points.len(), "degenerate input, no triangles");
            return vec![];
        }

        let points = Points::new(points);
        let mut triangles = TriangleStore::with_capacity(1);
        triangles.insert(Triangle::from(points.super_triangle()));

        let mut context = Context::new(&points, triangles, predicates, epsilon);

        Self::insert_points(&mut context, observer);

        let result = Self::finalize(&context);
        observer.finalized(&result, &context);

        tracing::debug!(
            points = points.real_len(),
            triangles = result.len(),
            ?predicates,
            "triangulated"
        );
        result
    }
}

impl Triangulator {
    fn insert_points(context: &mut Context, observer: &mut impl Observer) {
        let points = context.points;
        for (point_id, point) in points.iter_without_fake() {
            observer.enter_point_event(point_id, context);

            let retained = Self::carve_cavity(point, context);
            observer.cavity_carved(point_id, context);
            Self::fill_cavity(point_id, retained, context);

            observer.exit_point_event(point_id, context);
        }
    }

    /// Splits the current triangles into bad ones, whose circumcircle holds
    /// `point`, and retained ones, which are returned. Leaves the bad
    /// triangles and the cavity boundary in the context.
    fn carve_cavity(point: Point, context: &mut Context) -> TriangleStore {
        context.bad_triangles.clear();
        context.edge_counts.clear();
        context.boundary.clear();

        let mut retained = TriangleStore::with_capacity(context.triangles.len() + 2);
        for triangle in context.triangles.iter() {
            let Some(ccw) = Self::orient_ccw(triangle, context) else {
                // near zero area, never tested
                retained.insert(*triangle);
                continue;
            };

            let [a, b, c] = ccw.points.map(|p| p.get(context.points));
            if context.predicates.in_circumcircle(point, a, b, c) {
                context.bad_triangles.push(ccw);
            } else {
                retained.insert(*triangle);
            }
        }

        for triangle in context.bad_triangles.iter() {
            for edge in triangle.edges() {
                *context.edge_counts.entry(edge).or_insert(0) += 1;
            }
        }

        // an edge shared by two bad triangles is inside the cavity
        context.boundary.extend(
            context
                .edge_counts
                .iter()
                .filter(|(_, count)| **count == 1)
                .map(|(edge, _)| *edge),
        );

        retained
    }

    /// Next step's triangle set: the retained triangles plus a fan from
    /// `point_id` to every boundary edge.
    fn fill_cavity(point_id: PointId, retained: TriangleStore, context: &mut Context) {
        let mut next = retained;
        for edge in context.boundary.iter() {
            next.insert(Triangle::from([edge.p, edge.q, point_id]));
        }
        context.triangles = next;
    }

    /// The triangle in counter clockwise order, or `None` if its area is
    /// below epsilon.
    fn orient_ccw(triangle: &Triangle, context: &Context) -> Option<Triangle> {
        let area2 = Self::area2(triangle, context);
        if area2.abs() < context.epsilon {
            None
        } else if area2 < 0. {
            Some(triangle.flipped())
        } else {
            Some(*triangle)
        }
    }

    fn area2(triangle: &Triangle, context: &Context) -> f64 {
        let [a, b, c] = triangle.points.map(|p| p.get(context.points));
        context.predicates.signed_area2(a, b, c)
    }

    /// Drops triangles touching the super-triangle and degenerate ones.
    fn finalize(context: &Context) -> Vec<Triangle> {
        context
            .triangles
            .iter_real(context.points)
            .filter(|t| Self::area2(t, context).abs() > context.epsilon)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::utils::signed_area2;

    #[derive(Default)]
    struct CountingOb {
        point_events: usize,
        exits: usize,
        bad_triangles: usize,
        boundary_edges: usize,
        min_boundary: Option<usize>,
        finalized: Option<usize>,
    }

    impl Observer for CountingOb {
        fn enter_point_event(&mut self, _point_id: PointId, _context: &Context) {
            self.point_events += 1;
        }

        fn cavity_carved(&mut self, point_id: PointId, context: &Context) {
            self.bad_triangles += context.bad_triangles().len();
            self.boundary_edges += context.boundary().len();
            self.min_boundary = Some(
                self.min_boundary
                    .unwrap_or(usize::MAX)
                    .min(context.boundary().len()),
            );
            for edge in context.boundary() {
                assert!(edge.p < edge.q);
                assert!(edge.p != point_id && edge.q != point_id);
            }
        }

        fn exit_point_event(&mut self, point_id: PointId, context: &Context) {
            self.exits += 1;
            assert!(context.triangles.iter().any(|t| t.contains_point(point_id)));
        }

        fn finalized(&mut self, result: &[Triangle], _context: &Context) {
            self.finalized = Some(result.len());
        }
    }

    fn sets(triangles: &[Triangle]) -> BTreeSet<[u32; 3]> {
        triangles.iter().map(|t| t.sorted_indices()).collect()
    }

    fn grid(width: usize, height: usize) -> Vec<Point> {
        (0..width * height)
            .map(|i| Point::new((i % width) as f64, (i / width) as f64))
            .collect()
    }

    fn total_area(points: &[Point], triangles: &[Triangle]) -> f64 {
        triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.points.map(|p| points[p.as_usize()]);
                signed_area2(a, b, c).abs() / 2.
            })
            .sum()
    }

    fn polygon_area(polygon: &[Point]) -> f64 {
        let n = polygon.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (p, q) = (polygon[i], polygon[(i + 1) % n]);
                p.x * q.y - q.x * p.y
            })
            .sum();
        twice.abs() / 2.
    }

    fn assert_well_formed(points: &[Point], triangles: &[Triangle]) {
        for t in triangles {
            let [a, b, c] = t.indices();
            assert!(a != b && b != c && a != c, "{t:?} repeats a point");
            for i in [a, b, c] {
                assert!((i as usize) < points.len(), "{t:?} out of range");
            }
            let [pa, pb, pc] = t.points.map(|p| points[p.as_usize()]);
            assert!(signed_area2(pa, pb, pc).abs() > 1e-9, "{t:?} is degenerate");
        }
        assert_eq!(sets(triangles).len(), triangles.len(), "duplicate triangles");
    }

    #[test]
    fn test_single_triangle() {
        let points = [Point::new(0., 0.), Point::new(1., 0.), Point::new(0., 1.)];
        let triangles = triangulate(&points);
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].sorted_indices(), [0, 1, 2]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[Point::new(0., 0.)]).is_empty());
        assert!(triangulate(&[Point::new(0., 0.), Point::new(1., 0.)]).is_empty());
        assert!(triangulate(&[Point::new(0., 0.), Point::new(1., 0.), Point::new(2., 0.)]).is_empty());
        assert!(triangulate(&[Point::new(3., 3.); 5]).is_empty());

        let diagonal = (0..20)
            .map(|i| Point::new(i as f64, 2. * i as f64 + 1.))
            .collect::<Vec<_>>();
        assert!(triangulate(&diagonal).is_empty());
    }

    #[test]
    fn test_degenerate_input_skips_observer() {
        let mut ob = CountingOb::default();
        let result = Triangulator::default()
            .triangulate_with_observer(&[Point::new(0., 0.), Point::new(1., 1.)], &mut ob);
        assert!(result.is_empty());
        assert_eq!(ob.point_events, 0);
        assert_eq!(ob.finalized, None);
    }

    #[test]
    fn test_square() {
        let points = [
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(1., 1.),
            Point::new(0., 1.),
        ];
        let triangles = triangulate(&points);
        assert_eq!(
            sets(&triangles),
            BTreeSet::from([[0, 1, 2], [0, 2, 3]])
        );
    }

    #[test]
    fn test_interior_point() {
        let points = [
            Point::new(0., 0.),
            Point::new(4., 0.),
            Point::new(0., 4.),
            Point::new(1., 1.),
        ];
        let triangles = triangulate(&points);
        assert_eq!(
            sets(&triangles),
            BTreeSet::from([[0, 1, 3], [1, 2, 3], [0, 2, 3]])
        );
        assert!((total_area(&points, &triangles) - 8.).abs() < 1e-12);
    }

    #[test]
    fn test_convex_position() {
        let pentagon = vec![
            Point::new(0., 0.),
            Point::new(4., 0.),
            Point::new(5., 3.),
            Point::new(2., 5.),
            Point::new(-1., 3.),
        ];
        let parabola = (0..10)
            .map(|i| Point::new(i as f64, (i * i) as f64))
            .collect::<Vec<_>>();
        let ellipse = (0..9)
            .map(|k| {
                let angle = 2. * std::f64::consts::PI * k as f64 / 9. + 0.1;
                Point::new(30. * angle.cos(), 10. * angle.sin())
            })
            .collect::<Vec<_>>();

        for polygon in [pentagon, parabola, ellipse] {
            let triangles = triangulate(&polygon);
            assert_well_formed(&polygon, &triangles);
            assert_eq!(triangles.len(), polygon.len() - 2);

            let hull = polygon_area(&polygon);
            let covered = total_area(&polygon, &triangles);
            assert!(
                (hull - covered).abs() <= 1e-9 * hull,
                "hull {hull} covered {covered}"
            );
        }
    }

    #[test]
    fn test_grid() {
        let points = grid(50, 10);
        for predicates in [Predicates::Fast, Predicates::Robust] {
            let triangles = TriangulatorBuilder::new()
                .predicates(predicates)
                .build()
                .triangulate(&points);
            assert_eq!(triangles.len(), 882, "{predicates:?}");
            assert_well_formed(&points, &triangles);
            assert!((total_area(&points, &triangles) - 49. * 9.).abs() < 1e-9);
        }
    }

    #[test]
    fn test_observer() {
        let points = grid(6, 4);
        let mut ob = CountingOb::default();
        let triangles = Triangulator::default().triangulate_with_observer(&points, &mut ob);

        assert_eq!(ob.point_events, points.len());
        assert_eq!(ob.exits, points.len());
        assert_eq!(ob.finalized, Some(triangles.len()));
        // every insertion lands inside at least one circumcircle
        assert!(ob.bad_triangles >= points.len());
        assert!(ob.min_boundary.unwrap() >= 3);
        // each step trades its bad triangles for one triangle per boundary edge
        let scaffolding = 1 + ob.boundary_edges - ob.bad_triangles;
        assert!(scaffolding >= triangles.len());
    }

    #[test]
    fn test_random_cloud() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = (0..300)
            .map(|_| Point::new(rng.gen_range(0.0..800.), rng.gen_range(0.0..800.)))
            .collect::<Vec<_>>();

        let triangulator = TriangulatorBuilder::new()
            .predicates(Predicates::Robust)
            .build();
        let triangles = triangulator.triangulate(&points);
        assert_well_formed(&points, &triangles);
        assert!(triangles.len() > points.len());

        // empty circumcircle
        for t in &triangles {
            let [a, b, c] = t.points.map(|p| points[p.as_usize()]);
            let (b, c) = if signed_area2(a, b, c) < 0. { (c, b) } else { (b, c) };
            for (i, p) in points.iter().enumerate() {
                if t.contains_point(PointId::from(i as u32)) {
                    continue;
                }
                assert!(
                    !Predicates::Robust.in_circumcircle(*p, a, b, c),
                    "point {i} inside circumcircle of {t:?}"
                );
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let points = (0..100)
            .map(|_| Point::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect::<Vec<_>>();
        let triangulator = Triangulator::default();
        assert_eq!(
            triangulator.triangulate(&points),
            triangulator.triangulate(&points)
        );
    }

    #[test]
    fn test_non_finite_input_does_not_panic() {
        let points = [
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(0., 1.),
            Point::new(f64::NAN, 0.5),
            Point::new(2., 2.),
        ];
        let triangles = triangulate(&points);
        for t in &triangles {
            assert!(t.indices().iter().all(|i| (*i as usize) < points.len()));
        }
    }
}
