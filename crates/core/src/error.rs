use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Missing selection: {0} not chosen")]
    MissingSelection(&'static str),

    #[error("Unknown test definition: {0}")]
    UnknownTest(String),

    #[error("Unknown segment: {0}")]
    UnknownSegment(String),

    #[error("Invalid visitor count: {0}")]
    InvalidVisitorCount(String),

    #[error("Invalid traffic split: {0}")]
    InvalidTrafficSplit(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SimError {
    /// Stable machine-readable code for API responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::MissingSelection(_) => "missing_selection",
            SimError::UnknownTest(_) => "unknown_test",
            SimError::UnknownSegment(_) => "unknown_segment",
            SimError::InvalidVisitorCount(_) => "invalid_visitor_count",
            SimError::InvalidTrafficSplit(_) => "invalid_traffic_split",
            SimError::Config(_) => "config_error",
        }
    }
}
