use thiserror::Error;

/// 單筆船隻記錄解碼失敗的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected 5 fields, found {found}")]
    MissingField { found: usize },

    #[error("boat name is empty")]
    EmptyName,

    #[error("invalid length: {value:?}")]
    InvalidLength { value: String },

    #[error("unknown location kind: {kind:?}")]
    UnknownLocationKind { kind: String },

    #[error("location detail is empty")]
    EmptyDetail,

    #[error("invalid amount owed: {value:?}")]
    InvalidAmount { value: String },

    #[error("malformed record: {message}")]
    Malformed { message: String },
}

#[derive(Error, Debug)]
pub enum MarinaError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Boat not found: {name}")]
    NotFound { name: String },

    #[error("Registry is full ({max} boats)")]
    CapacityExceeded { max: usize },

    #[error("Invalid amount: {value}")]
    InvalidAmount { value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入或檔案內容有誤
    Input,
    /// 查無資料或容量不足，可重試
    Registry,
    /// 檔案系統
    Storage,
    Configuration,
}

impl MarinaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MarinaError::Decode(_) | MarinaError::InvalidAmount { .. } => ErrorCategory::Input,
            MarinaError::NotFound { .. } | MarinaError::CapacityExceeded { .. } => {
                ErrorCategory::Registry
            }
            MarinaError::IoError(_) | MarinaError::CsvError(_) => ErrorCategory::Storage,
            MarinaError::ConfigError { .. } | MarinaError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// 給終端使用者看的訊息，與除錯用的 `Display` 分開
    pub fn user_friendly_message(&self) -> String {
        match self {
            MarinaError::Decode(DecodeError::UnknownLocationKind { .. }) => {
                "Invalid location type.".to_string()
            }
            MarinaError::Decode(e) => format!("Invalid input ({}).", e),
            MarinaError::NotFound { .. } => "Boat not found.".to_string(),
            MarinaError::CapacityExceeded { .. } => "No space for more boats.".to_string(),
            MarinaError::InvalidAmount { .. } => "Invalid amount.".to_string(),
            MarinaError::IoError(e) => format!("File error: {}", e),
            MarinaError::CsvError(e) => format!("File format error: {}", e),
            MarinaError::ConfigError { message } => format!("Configuration error: {}", message),
            MarinaError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MarinaError>;
