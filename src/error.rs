use thiserror::Error;

/// Failure of one update cycle.
///
/// `Parameter` means the host handed us data we cannot build a graph from
/// (missing source column, no categorical shape). Everything else is
/// `Generic`. Neither is fatal: the visual keeps its last good state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VisualError {
    #[error("{0}")]
    Parameter(String),
    #[error("{0}")]
    Generic(String),
}

impl VisualError {
    pub fn parameter(message: impl Into<String>) -> Self {
        Self::Parameter(message.into())
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic(message.into())
    }

    /// Warning title shown by the host.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "Invalid parameter",
            Self::Generic(_) => "Error",
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }
}

impl From<serde_json::Error> for VisualError {
    fn from(error: serde_json::Error) -> Self {
        Self::Generic(format!("malformed data view: {error}"))
    }
}
