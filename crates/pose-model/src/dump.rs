//! Human-readable landmark dump written next to each rendered image.
//!
//! ```text
//! Image size: {'width': 640, 'height': 480}
//!
//! Landmarks:
//! ID: 0
//! Position: x=0.5123, y=0.2311, z=-0.3301
//! Visibility: 0.9987
//!
//! ID: 1
//! ...
//! ```
//!
//! Every value is written with exactly four digits after the decimal point.

use std::fmt::Write as _;

use crate::landmark::{Landmark, LandmarkSet};

const SIZE_PREFIX: &str = "Image size: {'width': ";
const SIZE_SEPARATOR: &str = ", 'height': ";
const LANDMARKS_HEADER: &str = "Landmarks:";

/// Errors raised while reading a landmark dump back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("missing image size header")]
    MissingSizeHeader,

    #[error("missing `Landmarks:` header")]
    MissingLandmarksHeader,

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Render a landmark set in the dump format.
pub fn render_landmarks(set: &LandmarkSet) -> String {
    let mut out = String::with_capacity(64 + set.len() * 80);
    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "{SIZE_PREFIX}{}{SIZE_SEPARATOR}{}}}",
        set.image_size.width, set.image_size.height
    );
    out.push('\n');
    out.push_str(LANDMARKS_HEADER);
    out.push('\n');
    for lm in &set.landmarks {
        let _ = writeln!(out, "ID: {}", lm.index);
        let _ = writeln!(out, "Position: x={:.4}, y={:.4}, z={:.4}", lm.x, lm.y, lm.z);
        let _ = writeln!(out, "Visibility: {:.4}", lm.visibility);
        out.push('\n');
    }
    out
}

/// Parse a landmark dump. Values come back rounded to four decimals.
pub fn parse_landmarks(text: &str) -> Result<LandmarkSet, DumpError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

    let (width, height) = lines
        .next()
        .and_then(|(_, line)| parse_size_header(line))
        .ok_or(DumpError::MissingSizeHeader)?;

    let mut saw_header = false;
    for (_, line) in lines.by_ref() {
        if line.is_empty() {
            continue;
        }
        if line == LANDMARKS_HEADER {
            saw_header = true;
            break;
        }
        return Err(DumpError::MissingLandmarksHeader);
    }
    if !saw_header {
        return Err(DumpError::MissingLandmarksHeader);
    }

    let mut landmarks = Vec::new();
    let mut pending: Option<(u32, Option<(f32, f32, f32)>)> = None;

    for (line_no, line) in lines {
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("ID: ") {
            if pending.is_some() {
                return Err(malformed(line_no, "ID before previous block finished"));
            }
            let index = rest
                .parse::<u32>()
                .map_err(|e| malformed(line_no, format!("bad ID: {e}")))?;
            pending = Some((index, None));
        } else if let Some(rest) = line.strip_prefix("Position: ") {
            match pending.as_mut() {
                Some((_, position @ None)) => *position = Some(parse_position(line_no, rest)?),
                _ => return Err(malformed(line_no, "Position without ID")),
            }
        } else if let Some(rest) = line.strip_prefix("Visibility: ") {
            let (index, position) = pending
                .take()
                .ok_or_else(|| malformed(line_no, "Visibility without ID"))?;
            let (x, y, z) = position.ok_or_else(|| malformed(line_no, "Visibility before Position"))?;
            let visibility = parse_value(line_no, rest)?;
            landmarks.push(Landmark {
                index,
                x,
                y,
                z,
                visibility,
            });
        } else {
            return Err(malformed(line_no, format!("unexpected line `{line}`")));
        }
    }

    if pending.is_some() {
        return Err(DumpError::Malformed {
            line: text.lines().count(),
            message: "truncated landmark block".to_string(),
        });
    }

    Ok(LandmarkSet::new(width, height, landmarks))
}

fn parse_size_header(line: &str) -> Option<(u32, u32)> {
    let rest = line.strip_prefix(SIZE_PREFIX)?.strip_suffix('}')?;
    let (width, height) = rest.split_once(SIZE_SEPARATOR)?;
    Some((width.parse().ok()?, height.parse().ok()?))
}

fn parse_position(line_no: usize, rest: &str) -> Result<(f32, f32, f32), DumpError> {
    let mut parts = rest.split(", ");
    let mut component = |key: &str| -> Result<f32, DumpError> {
        let part = parts
            .next()
            .ok_or_else(|| malformed(line_no, format!("missing {key}")))?;
        let value = part
            .strip_prefix(key)
            .and_then(|p| p.strip_prefix('='))
            .ok_or_else(|| malformed(line_no, format!("expected {key}=<value>")))?;
        parse_value(line_no, value)
    };
    let x = component("x")?;
    let y = component("y")?;
    let z = component("z")?;
    Ok((x, y, z))
}

fn parse_value(line_no: usize, value: &str) -> Result<f32, DumpError> {
    value
        .parse::<f32>()
        .map_err(|e| malformed(line_no, format!("bad number `{value}`: {e}")))
}

fn malformed(line: usize, message: impl Into<String>) -> DumpError {
    DumpError::Malformed {
        line,
        message: message.into(),
    }
}
