use crate::domain::model::Problem;
use crate::utils::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// 生成頁 → 結果頁唯一的跨頁狀態通道：
/// JSON 序列化後放進 `state` query 參數。URL 長度以外沒有大小保證。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultState {
    pub problems: Vec<Problem>,
    #[serde(rename = "downloadKey")]
    pub download_key: String,
}

pub fn result_url(base: &Url, state: &ResultState) -> Result<Url> {
    let json = serde_json::to_string(state)?;
    let mut url = base.join("/result")?;
    url.query_pairs_mut().append_pair("state", &json);
    Ok(url)
}

/// 還原 `state` 參數。缺少或壞掉都歸類為還原失敗，
/// 呼叫端把使用者帶回生成頁。
pub fn decode_from_url(url: &Url) -> Result<ResultState> {
    let param = url
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ClientError::StateRestoreError {
            message: "state parameter is missing".to_string(),
        })?;

    decode_param(&param)
}

pub fn decode_param(param: &str) -> Result<ResultState> {
    serde_json::from_str(param).map_err(|e| ClientError::StateRestoreError {
        message: format!("malformed state parameter: {}", e),
    })
}
