//! Domain error types.

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("could not fetch data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("{symbol} not found in the portfolio")]
    NotFound { symbol: String },

    #[error("not enough shares of {symbol}: holding {held}, asked to delete {requested}")]
    InsufficientShares {
        symbol: String,
        held: u64,
        requested: u64,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        DashboardError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn data_unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. } | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::InvalidInput { .. } => 3,
            DashboardError::NotFound { .. } | DashboardError::InsufficientShares { .. } => 4,
            DashboardError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
