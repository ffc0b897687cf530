// Core types shared by the recorder, the mapper and the drawing code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer of `width * height` pixels, all set to `color`.
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    /// Visual: the whole frame becomes one flat color.
    pub fn fill(&mut self, color: u32) {
        for px in &mut self.pixels { *px = color; }
    }

    /// Pixel at (x,y), or None when outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height { return None; }
        Some(self.pixels[y * self.width + x])
    }
}

/// A position on the drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// One recorded pointer position. `t` is milliseconds since the gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64, t: f64) -> Self { Self { x, y, t } }

    pub fn point(&self) -> Point { Point::new(self.x, self.y) }
}

/// One point of the reference spiral; `angle` is in radians from the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplatePoint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// A user sample paired with the template point it was mapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedSample {
    pub sample: Sample,
    pub template: TemplatePoint,
}

impl MappedSample {
    pub fn template_x(&self) -> f64 { self.template.x }
    pub fn template_y(&self) -> f64 { self.template.y }
}

/// Drawing mode: plain drawing, or drawing over the reference spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Freehand,
    Follow,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Freehand => "freehand",
            Mode::Follow => "follow",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freehand" => Ok(Mode::Freehand),
            "follow" => Ok(Mode::Follow),
            other => Err(format!("unknown mode '{other}' (expected freehand or follow)")),
        }
    }
}

/// Stroke color (0x00RRGGBB) and width (pixels) for one kind of line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: u32,
    pub width: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("follow".parse::<Mode>().unwrap(), Mode::Follow);
        assert_eq!(" Freehand ".parse::<Mode>().unwrap(), Mode::Freehand);
        assert!("spiral".parse::<Mode>().is_err());
        assert_eq!(Mode::Follow.to_string(), "follow");
        assert_eq!(Mode::default(), Mode::Freehand);
    }

    #[test]
    fn test_frame_buffer_fill_and_get() {
        let mut fb = FrameBuffer::new(4, 3, 0);
        fb.fill(0x00_12_34_56);
        assert_eq!(fb.get(3, 2), Some(0x00_12_34_56));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.pixels.len(), 12);
    }
}
