use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Malformed input at line {line}: {reason} (record: {record:?})")]
    MalformedInput {
        line: u64,
        record: String,
        reason: String,
    },

    #[error("Category '{category}' cannot be matched after {attempts} attempt(s): {reason}")]
    ConstraintUnsatisfiable {
        category: String,
        attempts: u32,
        reason: String,
    },

    #[error("Cancelled: {reason}")]
    Cancelled { reason: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value:?} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Matching,
    User,
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

impl SantaError {
    pub fn malformed(line: u64, record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn unsatisfiable(category: &str, attempts: u32, reason: impl Into<String>) -> Self {
        Self::ConstraintUnsatisfiable {
            category: category.to_string(),
            attempts,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedInput { .. } | Self::CsvError(_) => ErrorCategory::Input,
            Self::ConstraintUnsatisfiable { .. } => ErrorCategory::Matching,
            Self::Cancelled { .. } => ErrorCategory::User,
            Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled { .. } => ErrorSeverity::Low,
            Self::ConstraintUnsatisfiable { .. } => ErrorSeverity::Medium,
            Self::MalformedInput { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::CsvError(_) | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for this error; a user abort still exits cleanly.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MalformedInput { .. } => {
                "Fix the offending record; each line must be email;first_name;last_name;family;category"
                    .to_string()
            }
            Self::ConstraintUnsatisfiable { category, .. } => format!(
                "Add participants from other families to category '{}', or raise --max-retries",
                category
            ),
            Self::Cancelled { .. } => "Run the tool again to draw a new set of matches".to_string(),
            Self::CsvError(_) => {
                "Check that the input file uses the configured delimiter".to_string()
            }
            Self::IoError(_) => {
                "Check that the file exists and the directory is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ValidationError { .. } => {
                "Review the command line flags and the configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedInput { line, reason, .. } => {
                format!("The participant list is invalid (line {}): {}", line, reason)
            }
            Self::ConstraintUnsatisfiable { category, reason, .. } => format!(
                "Failed to generate valid matches for category '{}': {}",
                category, reason
            ),
            Self::Cancelled { reason } => format!("Operation cancelled: {}", reason),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_severity() {
        assert_eq!(SantaError::malformed(3, "a;b", "missing fields").exit_code(), 1);
        assert_eq!(SantaError::unsatisfiable("kids", 0, "single member").exit_code(), 2);
        assert_eq!(
            SantaError::Cancelled {
                reason: "rejected".to_string()
            }
            .exit_code(),
            0
        );
        let io = SantaError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.exit_code(), 3);
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = SantaError::malformed(7, "bob@x;Bob", "expected 5 fields, found 2");
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("bob@x;Bob"));
        assert_eq!(err.category(), ErrorCategory::Input);

        let err = SantaError::unsatisfiable("kids", 100, "exhausted");
        assert!(err.user_friendly_message().contains("kids"));
        assert!(err.recovery_suggestion().contains("kids"));
    }
}
