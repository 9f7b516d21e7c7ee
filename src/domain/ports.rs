use crate::domain::model::{Major, TokenPair, University};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persisted token storage. The session context is the only caller;
/// nothing else reads tokens directly.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<TokenPair>>;
    fn save(&self, tokens: &TokenPair) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// 大學/學系 registry 查詢入口。production 實作是 `LookupClient`，
/// 測試可以用假的 registry 驅動 search session。
#[async_trait]
pub trait UniversityRegistry: Send + Sync {
    async fn search_universities(&self, keyword: &str, page: u32) -> Result<Vec<University>>;
    async fn search_majors(
        &self,
        university_id: &str,
        keyword: &str,
        page: u32,
    ) -> Result<Vec<Major>>;
}
