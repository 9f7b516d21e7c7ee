use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("API request failed with status: {status}")]
    StatusError { status: u16 },

    #[error("Lookup failed: {message}")]
    LookupError { message: String },

    #[error("{message}")]
    ApiError { message: String },

    #[error("Validation error: {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Configuration error: {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("State restore failed: {message}")]
    StateRestoreError { message: String },
}

impl ClientError {
    /// 顯示給使用者的訊息：上游 envelope 的 message 原樣轉發，
    /// 傳輸層/解析層錯誤只給一般化文案（詳細原因進 tracing）。
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::ApiError { message } => message.clone(),
            ClientError::LookupError { message } => message.clone(),
            ClientError::ValidationError { reason, .. } => reason.clone(),
            ClientError::MissingFieldError { field } => {
                format!("{}을(를) 입력해주세요.", field)
            }
            ClientError::ConfigError { field, message } => {
                format!("설정 오류 ({}): {}", field, message)
            }
            ClientError::StateRestoreError { .. } => "잘못된 접근입니다.".to_string(),
            _ => "요청에 실패했습니다. 다시 시도해주세요.".to_string(),
        }
    }

    /// 傳輸層或解析層的失敗（非上游結構化錯誤）。
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::HttpError(_)
                | ClientError::XmlError(_)
                | ClientError::IoError(_)
                | ClientError::SerializationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
