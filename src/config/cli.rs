use crate::domain::model::TokenPair;
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const TOKEN_FILE: &str = "tokens.json";

/// 把 token 保存成 data 目錄下 JSON 檔的 TokenStore。
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_path: PathBuf,
}

impl FileTokenStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn token_path(&self) -> PathBuf {
        Path::new(&self.base_path).join(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let tokens = serde_json::from_str(&content)?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let content = serde_json::to_string_pretty(tokens)?;
        fs::write(self.token_path(), content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            grant_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn test_load_when_nothing_saved() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("state"));

        store.save(&tokens()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, tokens());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // clear on empty store is a no-op
        store.clear().unwrap();
    }
}
