// CSV export of a recorded gesture, plus the file-offer seam used for every file
// the tool produces.

use crate::error::{Error, Result};
use crate::recorder::Gesture;
use crate::types::{MappedSample, Mode};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const PLAIN_HEADER: &str = "X,Y,Time(ms)";
const MAPPED_HEADER: &str = "User_X,User_Y,Time(ms),Template_X,Template_Y";

/// Somewhere a named blob of bytes can be handed off to (a download folder, a test buffer).
pub trait FileSink {
    /// Store `bytes` under `name`, returning where it ended up.
    fn offer(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes offered files into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }
}

impl FileSink for DirectorySink {
    fn offer(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        info!("Wrote {} ({} bytes).", path.display(), bytes.len());
        Ok(path)
    }
}

/// Render the gesture as CSV text.
///
/// With `mapped`, rows come from the mapped samples and carry the template columns.
/// Rows are joined by `\n` with no trailing newline.
pub fn export_csv(gesture: &Gesture, mapped: Option<&[MappedSample]>) -> Result<String> {
    if gesture.is_empty() {
        return Err(Error::EmptyGesture);
    }

    let rows: Vec<String> = match mapped {
        Some(mapped) => std::iter::once(MAPPED_HEADER.to_string())
            .chain(mapped.iter().map(|m| {
                [m.sample.x, m.sample.y, m.sample.t, m.template_x(), m.template_y()]
                    .map(format_fixed2)
                    .join(",")
            }))
            .collect(),
        None => std::iter::once(PLAIN_HEADER.to_string())
            .chain(gesture.samples().iter().map(|s| [s.x, s.y, s.t].map(format_fixed2).join(",")))
            .collect(),
    };

    Ok(rows.join("\n"))
}

/// `spiral_data_<mode>_<ISO-8601 time with ':' and '.' turned into '-'>.csv`
pub fn suggested_filename(mode: Mode, at: DateTime<Utc>) -> String {
    format!("spiral_data_{}_{}.csv", mode, file_stamp(at))
}

/// `2025-01-07T09:30:15.250Z` becomes `2025-01-07T09-30-15-250Z`.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true).replace([':', '.'], "-")
}

/// Two fixed decimals, rounding half away from zero on the shortest decimal form of
/// `value` (so `1.005` prints as `1.01` even though its binary value is a hair below).
pub fn format_fixed2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    // integer digits followed by exactly two fraction digits
    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let mut frac = frac_part.bytes().map(|b| b - b'0');
    digits.push(frac.next().unwrap_or(0));
    digits.push(frac.next().unwrap_or(0));

    if frac.next().is_some_and(|d| d >= 5) {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let negative = value < 0.0 && digits.iter().any(|&d| d != 0);
    let split = digits.len() - 2;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        render(&digits[..split]),
        render(&digits[split..])
    )
}
