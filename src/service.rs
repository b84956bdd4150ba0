//! Request pipeline: fetch a point set from upstream, decode, triangulate,
//! encode, respond.
//!
//! [`Service::handle`] is transport independent, it maps a method and a path
//! to a [`Response`] and can sit behind any HTTP server.

use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
};

use serde_json::json;

use crate::{
    codec::{self, CodecError},
    Triangulator,
};

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("point set `{0}` not found")]
    NotFound(String),
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream timed out: {0}")]
    Timeout(String),
}

/// Source of serialized point sets.
pub trait PointSetProvider {
    /// Raw PointSet bytes for `id`.
    fn fetch_point_set(&self, id: &str) -> Result<Vec<u8>, UpstreamError>;
}

impl<F> PointSetProvider for F
where
    F: Fn(&str) -> Result<Vec<u8>, UpstreamError>,
{
    fn fetch_point_set(&self, id: &str) -> Result<Vec<u8>, UpstreamError> {
        self(id)
    }
}

/// Point sets stored as `<root>/<id>.bin` files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `id` must be a plain file stem, anything that could escape `root` is unknown.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        plain.then(|| self.root.join(format!("{id}.bin")))
    }
}

impl PointSetProvider for DirectoryStore {
    fn fetch_point_set(&self, id: &str) -> Result<Vec<u8>, UpstreamError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| UpstreamError::NotFound(id.to_string()))?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(UpstreamError::NotFound(id.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                Err(UpstreamError::Timeout(format!("{}: {e}", path.display())))
            }
            Err(e) => Err(UpstreamError::Unavailable(format!("{}: {e}", path.display()))),
        }
    }
}

/// In memory point sets, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sets: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.sets.insert(id.into(), bytes);
    }
}

impl PointSetProvider for MemoryStore {
    fn fetch_point_set(&self, id: &str) -> Result<Vec<u8>, UpstreamError> {
        self.sets
            .get(id)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(id.to_string()))
    }
}

/// Failure of one stage of the pipeline, each maps to its own status.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("cannot decode point set from upstream: {0}")]
    Decode(#[source] CodecError),
    #[error("triangulation failed: {0}")]
    Computation(String),
    #[error("cannot encode triangulation: {0}")]
    Encoding(#[source] CodecError),
}

impl PipelineError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Upstream(UpstreamError::NotFound(_)) => 404,
            Self::Upstream(_) => 502,
            Self::Decode(_) => 422,
            Self::Computation(_) | Self::Encoding(_) => 500,
        }
    }

    /// Machine readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Upstream(UpstreamError::NotFound(_)) => "POINTSET_NOT_FOUND",
            Self::Upstream(_) => "UPSTREAM_UNAVAILABLE",
            Self::Decode(_) => "INVALID_POINTSET_DATA",
            Self::Computation(_) => "TRIANGULATION_FAILED",
            Self::Encoding(_) => "ENCODING_FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    /// JSON `{"code": .., "message": ..}` error response.
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        let body = json!({ "code": code, "message": message });
        Self {
            status,
            content_type: APPLICATION_JSON,
            body: body.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<&PipelineError> for Response {
    fn from(error: &PipelineError) -> Self {
        // internal details stay in the log
        let message = match error {
            PipelineError::Computation(_) => {
                "Triangulation could not be computed for the given point set.".to_string()
            }
            PipelineError::Encoding(_) => "Failed to encode triangulation result.".to_string(),
            other => other.to_string(),
        };
        Response::error(error.status(), error.code(), &message)
    }
}

/// Stateless request handler, build it once at start up.
#[derive(Debug, Clone)]
pub struct Service<P> {
    provider: P,
    triangulator: Triangulator,
}

impl<P: PointSetProvider> Service<P> {
    pub fn new(provider: P, triangulator: Triangulator) -> Self {
        Self {
            provider,
            triangulator,
        }
    }

    /// Route a request.
    ///
    /// `GET /healthz` and `GET /triangulate/{id}` are served, other methods
    /// on those routes get 405, anything else 404.
    pub fn handle(&self, method: &str, path: &str) -> Response {
        let route = match path {
            "/healthz" => Route::Healthz,
            _ => match path.strip_prefix("/triangulate/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Triangulate(id),
                _ => {
                    return Response::error(
                        404,
                        "ROUTE_NOT_FOUND",
                        &format!("No route for `{path}`."),
                    )
                }
            },
        };

        if !method.eq_ignore_ascii_case("GET") {
            return Response::error(
                405,
                "METHOD_NOT_ALLOWED",
                &format!("Method {method} is not allowed for `{path}`."),
            );
        }

        match route {
            Route::Healthz => Response::ok(TEXT_PLAIN, b"ok".to_vec()),
            Route::Triangulate(id) => match self.triangulate(id) {
                Ok(body) => Response::ok(OCTET_STREAM, body),
                Err(error) => Response::from(&error),
            },
        }
    }

    /// Fetch, decode, triangulate and encode the point set `id`.
    pub fn triangulate(&self, id: &str) -> Result<Vec<u8>, PipelineError> {
        let raw = self.provider.fetch_point_set(id).map_err(|e| {
            tracing::warn!(id, error = %e, "upstream fetch failed");
            PipelineError::from(e)
        })?;

        let points = codec::decode_point_set(&raw).map_err(|e| {
            tracing::warn!(id, bytes = raw.len(), error = %e, "point set decode failed");
            PipelineError::Decode(e)
        })?;

        let triangles = panic::catch_unwind(AssertUnwindSafe(|| {
            self.triangulator.triangulate(&points)
        }))
        .map_err(|payload| {
            let reason = panic_message(payload.as_ref());
            tracing::error!(id, points = points.len(), reason = %reason, "triangulation failed");
            PipelineError::Computation(reason)
        })?;

        let body = codec::encode_triangles(&points, &triangles).map_err(|e| {
            tracing::error!(id, error = %e, "encoding failed");
            PipelineError::Encoding(e)
        })?;

        tracing::debug!(
            id,
            points = points.len(),
            triangles = triangles.len(),
            bytes = body.len(),
            "triangulate request served"
        );
        Ok(body)
    }
}

enum Route<'a> {
    Healthz,
    Triangulate(&'a str),
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
