use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub oauth: Option<OauthConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    /// 組結果頁 URL 時用的前端 origin。
    pub web_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthConfig {
    pub kakao_authorize_url: String,
    /// 本地開發環境把 redirect_uri 換成 localhost 時使用。
    pub local_redirect_uri: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: "https://api.improfessor.kro.kr".to_string(),
                timeout_seconds: None,
                web_base_url: None,
            },
            oauth: Some(OauthConfig {
                kakao_authorize_url:
                    "https://api.improfessor.kro.kr/oauth2/authorization/kakao".to_string(),
                local_redirect_uri: None,
            }),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_BASE_URL})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds.unwrap_or(30)
    }

    pub fn web_base_url(&self) -> &str {
        self.service
            .web_base_url
            .as_deref()
            .unwrap_or("https://improfessor.kro.kr")
    }

    /// Kakao 登入進入點 URL。local 時附上 redirect_uri。
    pub fn kakao_login_url(&self, local: bool) -> Result<Option<Url>> {
        let Some(oauth) = self.oauth.as_ref() else {
            return Ok(None);
        };

        let mut url = Url::parse(&oauth.kakao_authorize_url)?;
        if local {
            if let Some(redirect_uri) = oauth.local_redirect_uri.as_ref() {
                url.query_pairs_mut()
                    .append_pair("redirect_uri", redirect_uri);
            }
        }
        Ok(Some(url))
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.base_url", &self.service.base_url)?;
        if let Some(oauth) = self.oauth.as_ref() {
            validate_url("oauth.kakao_authorize_url", &oauth.kakao_authorize_url)?;
        }
        Ok(())
    }
}
