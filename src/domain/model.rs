use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 大學紀錄，來自 registry XML 的一個 `<item>`。identity key 是 `id` (schlId)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub id: String,
    pub kind: String,
    pub region: String,
}

/// 學系紀錄，只有在特定 university id 底下才有意義。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
    pub name: String,
    pub id: String,
    pub college_name: String,
    pub degree_level: String,
    pub term_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub number: u32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProblems {
    pub problems: Vec<Problem>,
    #[serde(rename = "downloadKey")]
    pub download_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(rename = "freeCount")]
    pub free_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "noticeId")]
    pub notice_id: u64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "grantType", default)]
    pub grant_type: Option<String>,
}

/// 後端統一的回應 envelope。錯誤時 message 會原樣顯示給使用者。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

/// OAuth redirect 回來的 query 參數分類結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// accessToken + refreshToken 都在場
    Tokens(TokenPair),
    /// error (可能附帶 message)
    Error {
        error: String,
        message: Option<String>,
    },
    /// 跟 OAuth 無關的普通 URL
    None,
}
