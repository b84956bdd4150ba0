use serde::{Deserialize, Serialize};

use crate::shape::Point;

#[derive(Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Clock Wise
    ///
    ///  a     b
    ///             c
    ///
    CW,
    /// Counter Clock Wise
    ///             c
    ///  a     b
    CCW,
    /// Collinear
    ///  a     b    c
    Collinear,
}

impl Orientation {
    pub fn is_cw(&self) -> bool {
        matches!(self, Self::CW)
    }

    pub fn is_ccw(&self) -> bool {
        matches!(self, Self::CCW)
    }

    pub fn is_collinear(&self) -> bool {
        matches!(self, Self::Collinear)
    }
}

/// Twice the signed area of triangle abc, the cross product of `b - a` and `c - a`.
/// Positive when abc winds counter clockwise.
pub fn signed_area2(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Classify abc, anything within `eps` of zero area is collinear.
pub fn orient_2d(a: Point, b: Point, c: Point, eps: f64) -> Orientation {
    let val = signed_area2(a, b, c);

    if val.abs() <= eps {
        Orientation::Collinear
    } else if val > 0. {
        Orientation::CCW
    } else {
        Orientation::CW
    }
}

/// Whether all points lie on the line through the first two, within `eps`.
/// Fewer than three points are always collinear.
pub fn is_collinear(points: &[Point], eps: f64) -> bool {
    is_collinear_with(points, eps, signed_area2)
}

fn is_collinear_with(points: &[Point], eps: f64, area2: impl Fn(Point, Point, Point) -> f64) -> bool {
    let [a, b, rest @ ..] = points else {
        return true;
    };
    if rest.is_empty() {
        return true;
    }
    rest.iter().all(|&c| area2(*a, *b, c).abs() <= eps)
}

/// check whether p lies strictly inside the circle through a, b and c
/// requirements: abc is counter clockwise, the sign flips otherwise.
///
/// Points on the circle are not inside; there is no tolerance band.
pub fn in_circumcircle(p: Point, a: Point, b: Point, c: Point) -> bool {
    // translate so p is the origin
    let adx = a.x - p.x;
    let ady = a.y - p.y;
    let bdx = b.x - p.x;
    let bdy = b.y - p.y;
    let cdx = c.x - p.x;
    let cdy = c.y - p.y;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdx * cdy - cdx * bdy) - blift * (adx * cdy - cdx * ady)
        + clift * (adx * bdy - bdx * ady);

    det > 0.
}

/// Which arithmetic evaluates the orientation and in-circle predicates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Predicates {
    /// Plain `f64` determinants.
    #[default]
    Fast,
    /// Adaptive precision determinants, exact in sign.
    Robust,
}

impl Predicates {
    /// Twice the signed area of abc.
    pub fn signed_area2(&self, a: Point, b: Point, c: Point) -> f64 {
        match self {
            Self::Fast => signed_area2(a, b, c),
            Self::Robust => robust::orient2d(coord(a), coord(b), coord(c)),
        }
    }

    pub fn is_collinear(&self, points: &[Point], eps: f64) -> bool {
        is_collinear_with(points, eps, |a, b, c| self.signed_area2(a, b, c))
    }

    /// See [`in_circumcircle`], abc must be counter clockwise.
    pub fn in_circumcircle(&self, p: Point, a: Point, b: Point, c: Point) -> bool {
        match self {
            Self::Fast => in_circumcircle(p, a, b, c),
            Self::Robust => robust::incircle(coord(a), coord(b), coord(c), coord(p)) > 0.,
        }
    }
}

fn coord(p: Point) -> robust::Coord<f64> {
    robust::Coord { x: p.x, y: p.y }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_signed_area2() {
        let a = Point::new(0., 0.);
        let b = Point::new(2., 0.);
        let c = Point::new(0., 3.);
        assert_eq!(signed_area2(a, b, c), 6.);
        assert_eq!(signed_area2(a, c, b), -6.);
        assert_eq!(signed_area2(a, b, Point::new(5., 0.)), 0.);
    }

    #[test]
    fn test_orient_2d() {
        assert_eq!(
            orient_2d(Point::new(0., 0.), Point::new(0., 1.), Point::new(0., 2.), EPS),
            Orientation::Collinear
        );

        assert_eq!(
            orient_2d(Point::new(0., 0.), Point::new(1., 1.), Point::new(2., 2.), EPS),
            Orientation::Collinear
        );

        assert!(orient_2d(Point::new(0., 0.), Point::new(1., 1.), Point::new(2., 3.), EPS).is_ccw());
        assert!(orient_2d(Point::new(0., 0.), Point::new(1., 1.), Point::new(2., 1.), EPS).is_cw());

        // inside the tolerance band
        assert!(orient_2d(
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(2., 1e-12),
            EPS
        )
        .is_collinear());
    }

    #[test]
    fn test_is_collinear() {
        assert!(is_collinear(&[], EPS));
        assert!(is_collinear(&[Point::new(1., 1.)], EPS));
        assert!(is_collinear(&[Point::new(1., 1.), Point::new(3., 4.)], EPS));
        assert!(is_collinear(
            &[
                Point::new(0., 0.),
                Point::new(1., 0.),
                Point::new(2., 0.),
                Point::new(-7., 0.),
            ],
            EPS
        ));
        assert!(!is_collinear(
            &[
                Point::new(0., 0.),
                Point::new(1., 0.),
                Point::new(2., 0.),
                Point::new(2., 0.5),
            ],
            EPS
        ));
        // measured against the first two points only
        assert!(is_collinear(
            &[
                Point::new(0., 0.),
                Point::new(0., 0.),
                Point::new(1., 1.),
                Point::new(0., 1.),
            ],
            EPS
        ));
    }

    #[test]
    fn test_in_circumcircle() {
        let a = Point::new(0., 0.);
        let b = Point::new(2., 0.);
        let c = Point::new(1., 1.);
        assert!(in_circumcircle(Point::new(1.5, 0.6), a, b, c));
        assert!(in_circumcircle(Point::new(1., 0.2), a, b, c));
        assert!(!in_circumcircle(Point::new(3., 3.), a, b, c));
        // on the circle is not inside
        assert!(!in_circumcircle(Point::new(1., -1.), a, b, c));
        // the vertices themselves are on the circle
        assert!(!in_circumcircle(a, a, b, c));
        // clockwise input flips the answer
        assert!(!in_circumcircle(Point::new(1., 0.2), a, c, b));
    }

    #[test]
    fn test_unit_square_is_cocircular() {
        let a = Point::new(0., 0.);
        let b = Point::new(1., 0.);
        let c = Point::new(1., 1.);
        let d = Point::new(0., 1.);
        assert!(!in_circumcircle(d, a, b, c));
        assert!(!Predicates::Robust.in_circumcircle(d, a, b, c));
    }

    #[test]
    fn test_robust_predicates_agree() {
        let a = Point::new(0., 0.);
        let b = Point::new(2., 0.);
        let c = Point::new(1., 1.);
        for p in [
            Point::new(1.5, 0.6),
            Point::new(3., 3.),
            Point::new(1., -0.99),
            Point::new(1., -1.01),
        ] {
            assert_eq!(
                Predicates::Robust.in_circumcircle(p, a, b, c),
                Predicates::Fast.in_circumcircle(p, a, b, c),
                "{p:?}"
            );
        }
        assert_eq!(Predicates::Robust.signed_area2(a, b, c), 2.);
        assert_eq!(Predicates::Robust.signed_area2(a, c, b), -2.);
        assert!(Predicates::Robust.is_collinear(
            &[Point::new(0., 0.), Point::new(1., 1.), Point::new(3., 3.)],
            0.
        ));
    }
}
