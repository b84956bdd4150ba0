//! Bowyer-Watson triangulation of 2D point sets, with the binary codec and
//! the request pipeline that serve it.
//!
//! ```rust
//! use triangulator::{codec, triangulate, Point};
//!
//! let points = vec![Point::new(0., 0.), Point::new(1., 0.), Point::new(0., 1.)];
//! let triangles = triangulate(&points);
//! let bytes = codec::encode_triangles(&points, &triangles).unwrap();
//! assert_eq!(codec::decode_triangles(&bytes).unwrap(), (points, triangles));
//! ```

pub mod codec;
mod context;
pub mod loader;
mod points;
pub mod service;
mod settings;
mod shape;
mod triangles;
mod triangulator;
mod utils;

pub use settings::{Settings, SettingsError};
pub use triangulator::{triangulate, Observer, Triangulator, TriangulatorBuilder};
pub use utils::{in_circumcircle, is_collinear, orient_2d, signed_area2, Orientation, Predicates};

/// exported to enable observer
pub use context::Context;
pub use points::{PointId, Points};
pub use shape::{Edge, Point, Triangle};
pub use triangles::TriangleStore;
