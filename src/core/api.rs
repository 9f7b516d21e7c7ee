use crate::domain::model::ApiResponse;
use crate::utils::error::{ClientError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use url::Url;

/// 所有後端呼叫共用的 HTTP client。
/// Bearer token 只從這裡帶出去，不在各個呼叫端各自拼 header。
pub struct ApiClient {
    http: Client,
    base_url: Url,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            bearer: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_bearer(&self, token: &str) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = Some(token.to_string());
        }
    }

    pub fn clear_bearer(&self) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = None;
        }
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.request(method, url);
        if let Ok(bearer) = self.bearer.read() {
            if let Some(token) = bearer.as_ref() {
                request = request.bearer_auth(token);
            }
        }
        Ok(request)
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::POST, path)
    }

    pub fn patch(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path)
    }

    /// 解開 `{message, data}` envelope。
    /// 錯誤回應帶 envelope 時 message 原樣往上拋，讓呼叫端顯示。
    pub async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        if status.is_success() {
            let envelope = response.json::<ApiResponse<T>>().await?;
            return Ok(envelope);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("API error response ({}): {}", status, body);

        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => Err(ClientError::ApiError {
                message: envelope.message,
            }),
            Err(_) => Err(ClientError::StatusError {
                status: status.as_u16(),
            }),
        }
    }

    /// 不帶 envelope 的 raw body 回應（PDF 等）。錯誤對應跟 envelope 路徑一致。
    pub async fn read_bytes(&self, response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(bytes.to_vec());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("API error response ({}): {}", status, body);

        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => Err(ClientError::ApiError {
                message: envelope.message,
            }),
            Err(_) => Err(ClientError::StatusError {
                status: status.as_u16(),
            }),
        }
    }
}

/// 成功的 envelope 卻缺 data，視為契約違反。
pub fn require_data<T>(envelope: ApiResponse<T>) -> Result<T> {
    envelope.data.ok_or(ClientError::ApiError {
        message: "응답에 데이터가 없습니다.".to_string(),
    })
}
