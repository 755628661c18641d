use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Output directory '{path}' is unusable: {reason}")]
    OutputDirUnusable { path: String, reason: String },

    #[error("Cannot parse date '{value}' (expected YYYY-MM-DD)")]
    DateParse { value: String },

    #[error("Record id '{value}' is not numeric")]
    NonNumericId { value: String },

    #[error("Unknown driving style '{value}'")]
    UnmappedDrivingStyle { value: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl EtlError {
    /// Per-record data problems: the record is skipped and the run goes on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EtlError::DateParse { .. }
                | EtlError::NonNumericId { .. }
                | EtlError::UnmappedDrivingStyle { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::OutputDirUnusable { path, .. } => {
                format!("Cannot write into output directory '{}'", path)
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Invalid command line value for '{}'", field)
            }
            EtlError::IoError(_) => "Reading input or writing output failed".to_string(),
            EtlError::CsvError(_) => "Writing CSV output failed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::OutputDirUnusable { .. } => {
                "Point --output-dir at a directory you can write to (it is created if missing)"
            }
            EtlError::InvalidConfigValueError { .. } => {
                "Check the command line options with --help"
            }
            EtlError::IoError(_) | EtlError::CsvError(_) => {
                "Check free disk space and file permissions"
            }
            EtlError::DateParse { .. } | EtlError::NonNumericId { .. } => {
                "Check the exported file, the line is skipped"
            }
            EtlError::UnmappedDrivingStyle { .. } => {
                "Only normal, speedy and economical driving styles are known"
            }
            EtlError::ProcessingError { .. } => "Run again with --debug for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
