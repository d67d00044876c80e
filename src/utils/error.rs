use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("No names left in the draw pool")]
    EmptyPool,

    #[error("Invalid group size {size}: must be at least {min}")]
    InvalidGroupSize { size: usize, min: usize },

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("Nothing to export: no grouping has been generated")]
    NothingToExport,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Roster file is not valid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),

    #[error("Configuration error in `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Draw,
    Grouping,
    Export,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EventError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EventError::EmptyPool | EventError::DrawInProgress => ErrorCategory::Draw,
            EventError::InvalidGroupSize { .. } => ErrorCategory::Grouping,
            EventError::NothingToExport | EventError::CsvError(_) => ErrorCategory::Export,
            EventError::EncodingError(_) => ErrorCategory::Input,
            EventError::ConfigValidationError { .. }
            | EventError::InvalidConfigValueError { .. }
            | EventError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EventError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Every variant leaves the session in its previous valid state, so
    /// nothing here is fatal; severity only drives the exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventError::EmptyPool
            | EventError::NothingToExport
            | EventError::DrawInProgress
            | EventError::InvalidGroupSize { .. } => ErrorSeverity::Medium,
            EventError::EncodingError(_)
            | EventError::CsvError(_)
            | EventError::ConfigValidationError { .. }
            | EventError::InvalidConfigValueError { .. }
            | EventError::MissingConfigError { .. } => ErrorSeverity::High,
            EventError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a command aborted by this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EventError::EmptyPool => "Everyone has already been drawn.".to_string(),
            EventError::InvalidGroupSize { min, .. } => {
                format!("Groups need at least {} members.", min)
            }
            EventError::DrawInProgress => "Please wait for the current draw to finish.".to_string(),
            EventError::NothingToExport => "Generate groups before exporting.".to_string(),
            EventError::CsvError(e) => format!("Could not write the CSV file: {}", e),
            EventError::IoError(e) => format!("File operation failed: {}", e),
            EventError::EncodingError(_) => {
                "The names file could not be read as UTF-8 text.".to_string()
            }
            EventError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            EventError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for {}: {}", value, field, reason)
            }
            EventError::MissingConfigError { field } => {
                format!("Missing setting: {}", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EventError::EmptyPool => "Reset the draw history or allow repeat winners",
            EventError::InvalidGroupSize { .. } => "Choose a group size of 2 or more",
            EventError::DrawInProgress => "Wait for the winner to be revealed, then draw again",
            EventError::NothingToExport => "Run the group command first",
            EventError::CsvError(_) | EventError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            EventError::EncodingError(_) => "Save the names file as UTF-8 and try again",
            EventError::ConfigValidationError { .. }
            | EventError::InvalidConfigValueError { .. }
            | EventError::MissingConfigError { .. } => {
                "Fix the event configuration file or command-line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EventError>;
