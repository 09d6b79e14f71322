use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Transport error{}: {}", status_suffix(.status), .message)]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Sheet has not been fetched yet")]
    NotSynced,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl SyncError {
    /// Build a transport failure from an HTTP status and response text
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        SyncError::Transport {
            status,
            message: message.into(),
        }
    }
}
