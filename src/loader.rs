use crate::Point;

#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Loader loads points from a source.
/// e.g: PlainFileLoader loads from a file path, one `x y` pair per line
pub trait Loader {
    fn load(&mut self, source: &str) -> Result<Vec<Point>, LoaderError>;
}

/// Loaders can load data from file
#[derive(Default)]
pub struct PlainFileLoader {}

impl Loader for PlainFileLoader {
    fn load(&mut self, path: &str) -> Result<Vec<Point>, LoaderError> {
        let value = std::fs::read_to_string(path)?;
        parse_points(&value)
    }
}

/// Parses whitespace separated `x y` lines, blank lines and `#` comments are skipped.
pub fn parse_points(value: &str) -> Result<Vec<Point>, LoaderError> {
    let mut points = vec![];
    for (idx, line) in value.lines().enumerate() {
        if let Some(point) = parse_point(idx + 1, line)? {
            points.push(point);
        }
    }
    Ok(points)
}

fn parse_point(line_no: usize, line: &str) -> Result<Option<Point>, LoaderError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parse_err = |reason: String| LoaderError::Parse {
        line: line_no,
        reason,
    };

    let mut iter = line.split_whitespace();
    let (Some(x), Some(y), None) = (iter.next(), iter.next(), iter.next()) else {
        return Err(parse_err(format!("expected `x y`, got `{line}`")));
    };
    let x = x
        .parse::<f64>()
        .map_err(|e| parse_err(format!("bad x `{x}`: {e}")))?;
    let y = y
        .parse::<f64>()
        .map_err(|e| parse_err(format!("bad y `{y}`: {e}")))?;

    Ok(Some(Point::new(x, y)))
}
