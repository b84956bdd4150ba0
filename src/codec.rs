//! Binary wire formats, little endian throughout.
//!
//! PointSet: `[count: u32]` followed by `count` records of `[x: f32][y: f32]`.
//!
//! TriangleSet: a PointSet block, then `[count: u32]` followed by `count`
//! records of `[a: u32][b: u32][c: u32]`.
//!
//! Decoding demands the exact size implied by the headers, a missing or an
//! extra trailing byte are both errors.

use byteorder::{ByteOrder, LittleEndian};

use crate::shape::{Point, Triangle};

/// Size of a count header.
pub const COUNT_SIZE: usize = 4;
/// Size of one point record.
pub const POINT_SIZE: usize = 8;
/// Size of one triangle record.
pub const TRIANGLE_SIZE: usize = 12;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("buffer of {len} bytes is too short, need at least {needed}")]
    TooShort { len: usize, needed: u64 },
    #[error("buffer size {len} does not match expected size {expected}")]
    SizeMismatch { len: usize, expected: u64 },
    #[error("triangle must have exactly 3 indices, found {found}")]
    TriangleArity { found: usize },
    #[error("point {index} coordinates ({x}, {y}) are not finite 32-bit floats")]
    InvalidCoordinate { index: usize, x: f64, y: f64 },
    #[error("triangle index {index} is negative, non-integral or too large")]
    InvalidIndex { index: String },
    #[error("triangle index {index} is out of bounds for {len} points")]
    IndexOutOfBounds { index: u32, len: usize },
    #[error("{what} count {count} does not fit a 32-bit header")]
    CountOverflow { what: &'static str, count: usize },
}

impl CodecError {
    /// Whether the error is about a bad value rather than a malformed buffer.
    pub fn is_invalid_value(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. }
                | Self::InvalidIndex { .. }
                | Self::IndexOutOfBounds { .. }
                | Self::CountOverflow { .. }
        )
    }
}

/// Size in bytes of a PointSet block holding `count` points.
pub fn point_set_size(count: u32) -> u64 {
    COUNT_SIZE as u64 + POINT_SIZE as u64 * count as u64
}

fn header(what: &'static str, count: usize) -> Result<u32, CodecError> {
    u32::try_from(count).map_err(|_| CodecError::CountOverflow { what, count })
}

fn validate_points(points: &[Point]) -> Result<u32, CodecError> {
    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() || !(p.x as f32).is_finite() || !(p.y as f32).is_finite() {
            return Err(CodecError::InvalidCoordinate {
                index,
                x: p.x,
                y: p.y,
            });
        }
    }
    header("point", points.len())
}

/// `buf` must be exactly `point_set_size(points.len())` long
fn write_point_set(points: &[Point], count: u32, buf: &mut [u8]) {
    LittleEndian::write_u32(&mut buf[..COUNT_SIZE], count);
    for (record, p) in buf[COUNT_SIZE..]
        .chunks_exact_mut(POINT_SIZE)
        .zip(points)
    {
        LittleEndian::write_f32(&mut record[..4], p.x as f32);
        LittleEndian::write_f32(&mut record[4..], p.y as f32);
    }
}

/// Encodes points as a PointSet, narrowing coordinates to `f32`.
pub fn encode_point_set(points: &[Point]) -> Result<Vec<u8>, CodecError> {
    let count = validate_points(points)?;
    let mut buf = vec![0u8; point_set_size(count) as usize];
    write_point_set(points, count, &mut buf);
    Ok(buf)
}

/// Decodes a PointSet, the buffer must be exactly `4 + 8n` bytes.
pub fn decode_point_set(buf: &[u8]) -> Result<Vec<Point>, CodecError> {
    if buf.len() < COUNT_SIZE {
        return Err(CodecError::TooShort {
            len: buf.len(),
            needed: COUNT_SIZE as u64,
        });
    }

    let count = LittleEndian::read_u32(&buf[..COUNT_SIZE]);
    let expected = point_set_size(count);
    if buf.len() as u64 != expected {
        return Err(CodecError::SizeMismatch {
            len: buf.len(),
            expected,
        });
    }

    Ok(buf[COUNT_SIZE..]
        .chunks_exact(POINT_SIZE)
        .map(|record| {
            Point::new(
                LittleEndian::read_f32(&record[..4]) as f64,
                LittleEndian::read_f32(&record[4..]) as f64,
            )
        })
        .collect())
}

/// Encodes points and triangles as a TriangleSet.
///
/// Every triangle index must address one of `points`.
pub fn encode_triangles(points: &[Point], triangles: &[Triangle]) -> Result<Vec<u8>, CodecError> {
    for triangle in triangles {
        for index in triangle.indices() {
            if index as usize >= points.len() {
                return Err(CodecError::IndexOutOfBounds {
                    index,
                    len: points.len(),
                });
            }
        }
    }

    let point_count = validate_points(points)?;
    let triangle_count = header("triangle", triangles.len())?;

    let point_block = point_set_size(point_count) as usize;
    let size = point_block + COUNT_SIZE + TRIANGLE_SIZE * triangles.len();
    let mut buf = vec![0u8; size];

    write_point_set(points, point_count, &mut buf[..point_block]);
    LittleEndian::write_u32(
        &mut buf[point_block..point_block + COUNT_SIZE],
        triangle_count,
    );
    for (record, triangle) in buf[point_block + COUNT_SIZE..]
        .chunks_exact_mut(TRIANGLE_SIZE)
        .zip(triangles)
    {
        LittleEndian::write_u32_into(&triangle.indices(), record);
    }

    Ok(buf)
}

/// Decodes a TriangleSet into its points and triangles.
pub fn decode_triangles(buf: &[u8]) -> Result<(Vec<Point>, Vec<Triangle>), CodecError> {
    if buf.len() < COUNT_SIZE {
        return Err(CodecError::TooShort {
            len: buf.len(),
            needed: COUNT_SIZE as u64,
        });
    }

    let point_count = LittleEndian::read_u32(&buf[..COUNT_SIZE]);
    let point_block = point_set_size(point_count);
    let needed = point_block + COUNT_SIZE as u64;
    if (buf.len() as u64) < needed {
        return Err(CodecError::TooShort {
            len: buf.len(),
            needed,
        });
    }

    // fits, it is bounded by buf.len()
    let point_block = point_block as usize;
    let points = decode_point_set(&buf[..point_block])?;

    let triangle_count =
        LittleEndian::read_u32(&buf[point_block..point_block + COUNT_SIZE]);
    let expected = needed + TRIANGLE_SIZE as u64 * triangle_count as u64;
    if buf.len() as u64 != expected {
        return Err(CodecError::SizeMismatch {
            len: buf.len(),
            expected,
        });
    }

    let triangles = buf[point_block + COUNT_SIZE..]
        .chunks_exact(TRIANGLE_SIZE)
        .map(|record| {
            let mut indices = [0u32; 3];
            LittleEndian::read_u32_into(record, &mut indices);
            Triangle::from(indices)
        })
        .collect();

    Ok((points, triangles))
}
