/// Errors surfaced by the chart engine. Layout operations never fail; they
/// return the unchanged panel list instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The raw response or a user command is malformed
    Validation(String),
    /// Reported verbatim by the data collaborator
    DataFetch(String),
    /// The host passed an unusable configuration
    Config(String),
    /// JS <-> Rust conversion failed
    Serialization(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            // Fetch failures are shown to the user exactly as received.
            ChartError::DataFetch(msg) => write!(f, "{}", msg),
            ChartError::Config(msg) => write!(f, "Config Error: {}", msg),
            ChartError::Serialization(msg) => write!(f, "Serialization Error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
