// Runtime configuration: canvas geometry, spiral shape, stroke styles and output paths.
//
// Everything has a default, so a config file only needs the values it changes:
//
// ```toml
// [template]
// loops = 5
// margin = 10.0
//
// [output]
// dir = "recordings"
// ```

use crate::error::{Error, Result};
use crate::types::StrokeStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// upper bounds on the template size; the point count is loops * points_per_loop + 1
pub const MAX_LOOPS: u32 = 100;
pub const MAX_POINTS_PER_LOOP: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub template: TemplateConfig,
    pub style: StyleConfig,
    pub output: OutputConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    pub background: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub loops: u32,
    pub points_per_loop: u32,
    /// Gap between the outermost loop and the nearest canvas edge.
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub user_color: u32,
    pub user_width: f32,
    pub template_color: u32,
    pub template_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 600, height: 600, background: 0x00_FF_FF_FF }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self { loops: 3, points_per_loop: 100, margin: 15.0 }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            user_color: 0x00_00_31_ED,
            user_width: 2.0,
            template_color: 0x00_AA_AA_AA,
            template_width: 1.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(".") }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { width: 800, height: 320 }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let CanvasConfig { width, height, .. } = self.canvas;
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!("canvas must be non-empty, got {width}x{height}")));
        }
        if self.style.user_width <= 0.0 || self.style.template_width <= 0.0 {
            return Err(Error::InvalidConfig("line widths must be positive".into()));
        }
        let half = width.min(height) as f64 / 2.0;
        if self.template.margin < 0.0 || self.template.margin >= half {
            return Err(Error::InvalidConfig(format!(
                "template margin {} must be in [0, {half})",
                self.template.margin
            )));
        }
        let TemplateConfig { loops, points_per_loop, .. } = self.template;
        if loops > MAX_LOOPS {
            return Err(Error::InvalidConfig(format!("template loops {loops} exceeds {MAX_LOOPS}")));
        }
        if points_per_loop > MAX_POINTS_PER_LOOP {
            return Err(Error::InvalidConfig(format!(
                "template points_per_loop {points_per_loop} exceeds {MAX_POINTS_PER_LOOP}"
            )));
        }
        if self.plot.width < 64 || self.plot.height < 64 {
            return Err(Error::InvalidConfig("plot images must be at least 64x64".into()));
        }
        Ok(())
    }

    pub fn user_style(&self) -> StrokeStyle {
        StrokeStyle { color: self.style.user_color, width: self.style.user_width }
    }

    pub fn template_style(&self) -> StrokeStyle {
        StrokeStyle { color: self.style.template_color, width: self.style.template_width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.template.loops, 3);
        assert_eq!(config.template.points_per_loop, 100);
        assert_eq!(config.user_style().color, 0x00_00_31_ED);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            "[template]\nloops = 5\n\n[style]\nuser_color = 0xFF0000\n",
        )
        .unwrap();
        assert_eq!(config.template.loops, 5);
        assert_eq!(config.template.points_per_loop, 100);
        assert_eq!(config.style.user_color, 0xFF0000);
        assert_eq!(config.canvas.width, 600);
    }

    #[test]
    fn test_rejects_oversized_margin() {
        let err = Config::from_toml_str("[canvas]\nwidth = 100\nheight = 80\n\n[template]\nmargin = 40.0\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_oversized_template() {
        let err = Config::from_toml_str("[template]\nloops = 1000000\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("loops")));
        let err = Config::from_toml_str("[template]\npoints_per_loop = 4000000000\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref m) if m.contains("points_per_loop")));

        let at_cap = format!("[template]\nloops = {MAX_LOOPS}\npoints_per_loop = {MAX_POINTS_PER_LOOP}\n");
        assert!(Config::from_toml_str(&at_cap).is_ok());
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = Config::from_toml_str("[canvas\nwidth = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
