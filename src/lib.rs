// Spiral drawing capture.
//
// Records a hand-drawn spiral as timestamped samples, optionally over a reference
// Archimedean spiral, maps each sample onto the reference by elapsed-time fraction,
// and exports the result as CSV or X/Y-over-time PNG charts.

pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod mapper;
pub mod plot;
pub mod recorder;
pub mod session;
pub mod template;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use recorder::{Gesture, GestureRecorder};
pub use session::Session;
pub use template::{generate, SpiralParams, Template};
pub use types::{MappedSample, Mode, Point, Sample, TemplatePoint};
