use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Io: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Plot: {0}")]
    Plot(String),
    #[error("no timing records in {0}")]
    EmptyLog(String),
    #[error("stats thread: {0}")]
    StatsThread(String),
    #[error("Any: {0}")]
    Any(#[from] anyhow::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}
