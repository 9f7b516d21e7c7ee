use crate::core::api::ApiClient;
use crate::domain::model::{RedirectOutcome, TokenPair, User};
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use std::sync::Arc;
use url::Url;

const TOKEN_PARAMS: [&str; 3] = ["accessToken", "refreshToken", "grant_type"];
const ERROR_PARAMS: [&str; 2] = ["error", "message"];

/// 目前認證 session 的唯一擁有者。
/// token 只在這裡讀寫：啟動時復原、登出/退會時清掉。
/// 其他元件不會直接讀 storage。
pub struct SessionContext<S: TokenStore> {
    store: S,
    api: Arc<ApiClient>,
    tokens: Option<TokenPair>,
    user: Option<User>,
}

impl<S: TokenStore> SessionContext<S> {
    /// app 啟動時呼叫一次：有保存的 token 就復原並設定 bearer。
    pub fn init(store: S, api: Arc<ApiClient>) -> Result<Self> {
        let tokens = store.load()?;
        if let Some(pair) = tokens.as_ref() {
            api.set_bearer(&pair.access_token);
            tracing::debug!("session restored from persisted tokens");
        }
        Ok(Self {
            store,
            api,
            tokens,
            user: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// 登入 / token 更新：保存並替換 bearer。
    pub fn apply_tokens(&mut self, tokens: TokenPair) -> Result<()> {
        self.store.save(&tokens)?;
        self.api.set_bearer(&tokens.access_token);
        self.tokens = Some(tokens);
        Ok(())
    }

    /// 登出 / 退會：storage 與記憶體狀態一起清空。
    pub fn teardown(&mut self) -> Result<()> {
        self.store.clear()?;
        self.api.clear_bearer();
        self.tokens = None;
        self.user = None;
        Ok(())
    }

    /// 消費 OAuth redirect URL：有 token 就套進 session，錯誤只做分類。
    /// 回傳的 URL 已移除被消費的參數。
    pub fn consume_redirect(&mut self, url: &Url) -> Result<(RedirectOutcome, Url)> {
        let outcome = classify_redirect(url);
        let cleaned = match &outcome {
            RedirectOutcome::Tokens(tokens) => {
                tracing::debug!("OAuth tokens received (grant_type: {:?})", tokens.grant_type);
                self.apply_tokens(tokens.clone())?;
                strip_params(url, &TOKEN_PARAMS)
            }
            RedirectOutcome::Error { error, message } => {
                tracing::error!("OAuth redirect error: {} ({:?})", error, message);
                strip_params(url, &ERROR_PARAMS)
            }
            RedirectOutcome::None => url.clone(),
        };
        Ok((outcome, cleaned))
    }
}

/// 分類 redirect query 參數。錯誤 case 優先。
pub fn classify_redirect(url: &Url) -> RedirectOutcome {
    let param = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    if let Some(error) = param("error") {
        return RedirectOutcome::Error {
            error,
            message: param("message"),
        };
    }

    match (param("accessToken"), param("refreshToken")) {
        (Some(access_token), Some(refresh_token)) => RedirectOutcome::Tokens(TokenPair {
            access_token,
            refresh_token,
            grant_type: param("grant_type"),
        }),
        _ => RedirectOutcome::None,
    }
}

fn strip_params(url: &Url, keys: &[&str]) -> Url {
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !keys.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    cleaned.set_query(None);
    if !remaining.is_empty() {
        let mut pairs = cleaned.query_pairs_mut();
        for (key, value) in &remaining {
            pairs.append_pair(key, value);
        }
    }
    cleaned
}
