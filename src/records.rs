//! Record loading for both problems.
//!
//! Scheduling input: one `start finish weight` triple per line, no header.
//! Segmentation input: a `N C` header followed by `N` lines of `x y`.
//! All fields are integers separated by whitespace; blank lines are ignored.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A sample point of the series to be segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// A weighted interval as read from input, before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: i64,
    pub finish: i64,
    pub weight: i64,
}

impl Interval {
    pub const fn new(start: i64, finish: i64, weight: i64) -> Self {
        Self {
            start,
            finish,
            weight,
        }
    }
}

impl From<(i64, i64, i64)> for Interval {
    fn from((start, finish, weight): (i64, i64, i64)) -> Self {
        Self::new(start, finish, weight)
    }
}

/// A segmentation instance: the points and the per-segment penalty `C`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    pub points: Vec<Point>,
    pub penalty: i64,
}

fn parse_fields<const N: usize>(line_no: usize, line: &str, names: [&str; N]) -> Result<[i64; N]> {
    let mut out = [0i64; N];
    let mut tokens = line.split_whitespace();
    for (slot, name) in out.iter_mut().zip(names) {
        let token = tokens.next().ok_or_else(|| {
            Error::malformed(line_no, line, format!("expected {N} integers, missing {name}"))
        })?;
        *slot = token
            .parse::<i64>()
            .map_err(|_| Error::malformed(line_no, line, format!("{name} {token:?} is not an integer")))?;
    }
    if tokens.next().is_some() {
        return Err(Error::malformed(
            line_no,
            line,
            format!("expected {N} integers, found more"),
        ));
    }
    Ok(out)
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
}

/// Parse scheduling input text.
pub fn parse_intervals(text: &str) -> Result<Vec<Interval>> {
    content_lines(text)
        .map(|(line_no, line)| {
            let [start, finish, weight] = parse_fields(line_no, line, ["start", "finish", "weight"])?;
            Ok(Interval::new(start, finish, weight))
        })
        .collect()
}

/// Parse segmentation input text.
///
/// Empty text is an empty instance with penalty 0. Coordinates are limited
/// to the 32-bit range so every moment sum stays exact.
pub fn parse_points(text: &str) -> Result<PointSet> {
    let mut lines = content_lines(text);
    let Some((header_no, header)) = lines.next() else {
        return Ok(PointSet::default());
    };
    let [count, penalty] = parse_fields(header_no, header, ["point count", "penalty"])?;
    let count = usize::try_from(count)
        .map_err(|_| Error::malformed(header_no, header, "point count must be non-negative"))?;

    let mut points = Vec::with_capacity(count);
    let mut last_line = header_no;
    for (line_no, line) in lines {
        if points.len() == count {
            return Err(Error::malformed(
                line_no,
                line,
                format!("header declares {count} points, found more"),
            ));
        }
        let [x, y] = parse_fields(line_no, line, ["x", "y"])?;
        if i32::try_from(x).is_err() || i32::try_from(y).is_err() {
            return Err(Error::malformed(
                line_no,
                line,
                "coordinates must fit in 32 bits",
            ));
        }
        points.push(Point::new(x, y));
        last_line = line_no;
    }
    if points.len() < count {
        return Err(Error::malformed(
            last_line + 1,
            "",
            format!("header declares {count} points, found {}", points.len()),
        ));
    }
    Ok(PointSet { points, penalty })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Load scheduling input from a file.
pub fn load_intervals(path: impl AsRef<Path>) -> Result<Vec<Interval>> {
    parse_intervals(&read(path.as_ref())?)
}

/// Load segmentation input from a file.
pub fn load_points(path: impl AsRef<Path>) -> Result<PointSet> {
    parse_points(&read(path.as_ref())?)
}

/// Like [`load_intervals`], but an unreadable file is reported and replaced
/// by an empty record set. Malformed content is still an error.
pub fn load_intervals_or_empty(path: impl AsRef<Path>) -> Result<Vec<Interval>> {
    match load_intervals(path) {
        Err(Error::InputUnavailable { path, source }) => {
            tracing::warn!(path = %path.display(), error = %source, "input unavailable, using no intervals");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Like [`load_points`], but an unreadable file is reported and replaced by
/// an empty instance. Malformed content is still an error.
pub fn load_points_or_empty(path: impl AsRef<Path>) -> Result<PointSet> {
    match load_points(path) {
        Err(Error::InputUnavailable { path, source }) => {
            tracing::warn!(path = %path.display(), error = %source, "input unavailable, using no points");
            Ok(PointSet::default())
        }
        other => other,
    }
}
