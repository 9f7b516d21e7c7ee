use crate::core::api::ApiClient;
use crate::domain::model::{ApiResponse, Notice};
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub const NOTICES_PER_PAGE: usize = 10;

/// 3 天內的公告標上 NEW。
const NEW_WINDOW_DAYS: i64 = 3;

pub struct NoticeClient {
    api: Arc<ApiClient>,
}

impl NoticeClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Notice>> {
        let response = self.api.get("/api/notice")?.send().await?;
        let envelope: ApiResponse<Vec<Notice>> = self.api.read_envelope(response).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// server 給整份列表，分頁在 client 端做（page 從 1 開始）。
pub fn paginate(notices: &[Notice], page: usize) -> &[Notice] {
    let page = page.max(1);
    let start = (page - 1) * NOTICES_PER_PAGE;
    if start >= notices.len() {
        return &[];
    }
    let end = (start + NOTICES_PER_PAGE).min(notices.len());
    &notices[start..end]
}

pub fn total_pages(notice_count: usize) -> usize {
    notice_count.div_ceil(NOTICES_PER_PAGE)
}

pub fn is_new(notice: &Notice, now: DateTime<Utc>) -> bool {
    now - notice.created_at < Duration::days(NEW_WINDOW_DAYS)
}
