// One error type for the whole tool. Every variant states *where* things went wrong.
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Export or plots requested before anything was drawn.
    #[error("No data recorded yet. Please draw a spiral first.")]
    EmptyGesture,

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plot drawing error: {0}")]
    Plot(String),

    #[error("Plot encode error: {0}")]
    PlotEncode(#[from] image::ImageError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
