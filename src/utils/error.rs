use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Could not load env file {path}: {message}")]
    EnvFileError { path: String, message: String },

    #[error("Missing required fields")]
    MissingFields,

    #[error("Task not found: {raw}")]
    UnknownJob { raw: String },

    #[error("Verification failed: {message}")]
    VerificationError { message: String },

    #[error("Invalid pool key: {message}")]
    KeypairError { message: String },

    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Transaction {signature} was not confirmed in time")]
    ConfirmationTimeout { signature: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Request,
    Verification,
    Payment,
    Network,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. }
            | MarketError::EnvFileError { .. }
            | MarketError::KeypairError { .. } => ErrorCategory::Configuration,
            MarketError::MissingFields | MarketError::UnknownJob { .. } => ErrorCategory::Request,
            MarketError::VerificationError { .. } => ErrorCategory::Verification,
            MarketError::InvalidAddress { .. }
            | MarketError::RpcError { .. }
            | MarketError::TransactionFailed { .. }
            | MarketError::ConfirmationTimeout { .. } => ErrorCategory::Payment,
            MarketError::HttpError(_) => ErrorCategory::Network,
            MarketError::IoError(_) | MarketError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Verification | ErrorCategory::Payment => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. } => {
                "Fix the value in the config file or .env.local and restart (--check validates only)"
            }
            MarketError::EnvFileError { .. } => {
                "Fix the KEY=value syntax in the env file or remove the file"
            }
            MarketError::KeypairError { .. } => {
                "POOL_PRIVATE_KEY must be a 64-byte keypair as a JSON array, comma list or base58"
            }
            MarketError::MissingFields => "Send both jobId and wallet form fields",
            MarketError::UnknownJob { .. } => "Use an id returned by GET /api/jobs",
            MarketError::VerificationError { .. } => {
                "Check OPENAI_API_KEY and the model output format"
            }
            MarketError::InvalidAddress { .. } => "Use a base58 Solana address",
            MarketError::RpcError { .. } | MarketError::HttpError(_) => {
                "Check network connectivity and the RPC endpoint (HELIUS_RPC)"
            }
            MarketError::TransactionFailed { .. } | MarketError::ConfirmationTimeout { .. } => {
                "Check the pool wallet balance and the transaction on an explorer"
            }
            MarketError::IoError(_) | MarketError::SerializationError(_) => {
                "Check file permissions and input formats"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Request => self.to_string(),
            ErrorCategory::Verification => format!("Could not verify submission: {}", self),
            ErrorCategory::Payment => format!("Payout failed: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Internal => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_are_low_severity() {
        assert_eq!(MarketError::MissingFields.severity(), ErrorSeverity::Low);
        let err = MarketError::UnknownJob {
            raw: "42".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Request);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = MarketError::InvalidConfigValueError {
            field: "PORT".to_string(),
            value: "http".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }

    #[test]
    fn test_payment_errors_are_categorized() {
        let err = MarketError::ConfirmationTimeout {
            signature: "abc".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Payment);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
