use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("misaligned series: '{left}' vs '{right}': {detail}")]
    MisalignedSeries {
        left: String,
        right: String,
        detail: String,
    },
    #[error("render error: {0}")]
    Render(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl ReportError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        ReportError::Io(msg.into())
    }

    pub fn csv<T: Into<String>>(msg: T) -> Self {
        ReportError::Csv(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ReportError::InvalidInput(msg.into())
    }

    pub fn missing_column<T: Into<String>>(msg: T) -> Self {
        ReportError::MissingColumn(msg.into())
    }

    pub fn misaligned<L, R, D>(left: L, right: R, detail: D) -> Self
    where
        L: Into<String>,
        R: Into<String>,
        D: Into<String>,
    {
        ReportError::MisalignedSeries {
            left: left.into(),
            right: right.into(),
            detail: detail.into(),
        }
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        ReportError::Render(msg.into())
    }

    pub fn invariant<T: Into<String>>(msg: T) -> Self {
        ReportError::Invariant(msg.into())
    }
}
