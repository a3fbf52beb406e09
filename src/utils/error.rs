use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {locator} timed out after {after:?}")]
    Timeout {
        locator: String,
        after: std::time::Duration,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Parse,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::Transport(_)
            | DashboardError::HttpStatus { .. }
            | DashboardError::Timeout { .. }
            | DashboardError::Io(_) => ErrorCategory::Transport,
            DashboardError::Decode(_) | DashboardError::Csv(_) | DashboardError::Parse { .. } => {
                ErrorCategory::Parse
            }
            DashboardError::Serialization(_) => ErrorCategory::Output,
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the dataset may come back on a later attempt
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Parse => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::Transport(_) => {
                "Could not reach the salary dataset.".to_string()
            }
            DashboardError::HttpStatus { url, status } => {
                format!("The server at {} answered with HTTP {}.", url, status)
            }
            DashboardError::Timeout { locator, after } => {
                format!("Loading {} took longer than {:?}.", locator, after)
            }
            DashboardError::Io(e) => format!("Could not read the salary dataset: {}", e),
            DashboardError::Decode(_) => "The salary dataset is not UTF-8 text.".to_string(),
            DashboardError::Csv(e) => format!("The salary dataset is not valid CSV: {}", e),
            DashboardError::Parse { line, .. } => {
                format!("The salary dataset is malformed near line {}.", line)
            }
            DashboardError::Serialization(_) => "Could not render the summary.".to_string(),
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => {
                "Check that the source URL or path is correct and reachable, then retry."
            }
            ErrorCategory::Parse => {
                "Make sure the file is UTF-8 CSV with a header row and a consistent column count."
            }
            ErrorCategory::Configuration => {
                "Review the command-line flags and the TOML configuration file."
            }
            ErrorCategory::Output => "Try a different output format.",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
