use crate::core::api::{require_data, ApiClient};
use crate::domain::model::{ApiResponse, TokenPair, User};
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 驗證碼重送的等待秒數。
pub const RESEND_COOLDOWN_SECS: u32 = 180;

/// 註冊時預設贈送的免費生成次數。
const SIGNUP_FREE_COUNT: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub university: String,
    pub major: String,
    pub recommend_nickname: String,
    pub free_count: u32,
    pub recommend_count: u32,
}

impl RegisterRequest {
    pub fn new(
        email: String,
        nickname: String,
        password: String,
        university: String,
        major: String,
        referral_code: String,
    ) -> Self {
        let recommend_count = if referral_code.is_empty() { 0 } else { 1 };
        Self {
            email,
            nickname,
            password,
            university,
            major,
            recommend_nickname: referral_code,
            free_count: SIGNUP_FREE_COUNT,
            recommend_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: u64,
    pub recommend_nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
}

/// 認證相關的後端呼叫。回應都是 `{message, data}` envelope。
pub struct AuthClient {
    api: Arc<ApiClient>,
}

impl AuthClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.post("/api/user/login")?.json(&body).send().await?;
        let envelope: ApiResponse<TokenPair> = self.api.read_envelope(response).await?;
        require_data(envelope)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let response = self.api.post("/api/user")?.json(request).send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }

    pub async fn send_verification_email(&self, email: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email });
        let response = self.api.post("/api/email/send")?.json(&body).send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email, "code": code });
        let response = self.api.post("/api/email/verify")?.json(&body).send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self.api.post("/api/user/logout")?.send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<User> {
        let response = self.api.get("/api/user/me")?.send().await?;
        let envelope: ApiResponse<User> = self.api.read_envelope(response).await?;
        require_data(envelope)
    }

    pub async fn update_user(&self, request: &UpdateUserRequest) -> Result<()> {
        let response = self.api.patch("/api/user")?.json(request).send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let path = format!("/api/user/{}", user_id);
        let response = self.api.delete(&path)?.send().await?;
        let _: ApiResponse<serde_json::Value> = self.api.read_envelope(response).await?;
        Ok(())
    }
}

/// 驗證碼重送 cooldown。每秒一個 tick 遞減計數器，
/// 歸零後才能重送。drop 時 tick task 會被中止。
pub struct ResendCooldown {
    remaining: Arc<AtomicU32>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ResendCooldown {
    pub fn new() -> Self {
        Self {
            remaining: Arc::new(AtomicU32::new(0)),
            task: None,
        }
    }

    pub fn start(&mut self, seconds: u32) {
        self.cancel();
        self.remaining.store(seconds, Ordering::SeqCst);

        let remaining = Arc::clone(&self.remaining);
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // 第一個 tick 立即發火
            loop {
                interval.tick().await;
                let current = remaining.load(Ordering::SeqCst);
                if current == 0 {
                    break;
                }
                remaining.store(current - 1, Ordering::SeqCst);
                if current - 1 == 0 {
                    break;
                }
            }
        }));
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn can_resend(&self) -> bool {
        self.remaining_secs() == 0
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResendCooldown {
    fn drop(&mut self) {
        self.cancel();
    }
}
