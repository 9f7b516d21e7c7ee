use crate::domain::model::{Major, University};
use crate::utils::error::ClientError;

/// search modal 狀態。失敗以 alert 表出後回到 Idle，所以不留 Failed 狀態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Closed,
    Idle,
    Searching,
    Results(usize),
    Empty,
}

/// submit 發出的請求。tag 單調遞增，非最新 tag 的回應一律丟棄。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub tag: u64,
    pub keyword: String,
    pub page: u32,
}

/// resolve 的結果。Stale 不改變任何狀態。
#[derive(Debug)]
pub enum Resolution {
    Updated,
    Stale,
    Failed(ClientError),
}

/// 兩個 search modal 共用的 transient state。
/// modal 只擁有這些；選定的結果由 parent form 持有。
#[derive(Debug)]
struct SearchCore<T> {
    state: SearchState,
    keyword: String,
    results: Vec<T>,
    total_count: usize,
    latest_tag: u64,
}

impl<T> SearchCore<T> {
    fn new() -> Self {
        Self {
            state: SearchState::Closed,
            keyword: String::new(),
            results: Vec::new(),
            total_count: 0,
            latest_tag: 0,
        }
    }

    fn open(&mut self) {
        self.clear();
        self.state = SearchState::Idle;
    }

    fn close(&mut self) {
        self.clear();
        self.state = SearchState::Closed;
    }

    fn clear(&mut self) {
        self.keyword.clear();
        self.results.clear();
        self.total_count = 0;
    }

    fn issue(&mut self, keyword: &str) -> SearchRequest {
        self.keyword = keyword.to_string();
        self.latest_tag += 1;
        self.state = SearchState::Searching;
        SearchRequest {
            tag: self.latest_tag,
            keyword: keyword.to_string(),
            page: 1,
        }
    }

    fn resolve(&mut self, tag: u64, result: Result<Vec<T>, ClientError>) -> Resolution {
        if tag != self.latest_tag {
            return Resolution::Stale;
        }

        match result {
            Ok(records) => {
                self.total_count = records.len();
                self.state = if records.is_empty() {
                    SearchState::Empty
                } else {
                    SearchState::Results(records.len())
                };
                self.results = records;
                Resolution::Updated
            }
            Err(err) => {
                self.results.clear();
                self.total_count = 0;
                self.state = SearchState::Idle;
                Resolution::Failed(err)
            }
        }
    }

    fn take_selection(&mut self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        if !matches!(self.state, SearchState::Results(_)) {
            return None;
        }
        let selected = self.results.get(index).cloned()?;
        self.clear();
        self.state = SearchState::Closed;
        Some(selected)
    }
}

/// 大學搜尋 modal 的 state machine。不做 IO，只負責發請求與套用回應。
#[derive(Debug)]
pub struct UniversitySearch {
    core: SearchCore<University>,
}

impl UniversitySearch {
    pub fn new() -> Self {
        Self {
            core: SearchCore::new(),
        }
    }

    /// 打開時永遠是空的 Idle，前一次 session 的結果不殘留。
    pub fn open(&mut self) {
        self.core.open();
    }

    pub fn close(&mut self) {
        self.core.close();
    }

    /// 明確的搜尋提交。空 keyword 不發請求，只清空結果。
    pub fn submit(&mut self, keyword: &str) -> Option<SearchRequest> {
        if self.core.state == SearchState::Closed {
            return None;
        }
        if keyword.trim().is_empty() {
            self.core.clear();
            self.core.state = SearchState::Idle;
            return None;
        }
        Some(self.core.issue(keyword))
    }

    pub fn resolve(
        &mut self,
        tag: u64,
        result: Result<Vec<University>, ClientError>,
    ) -> Resolution {
        self.core.resolve(tag, result)
    }

    /// 選定後把 (name, id) 交給 parent，modal 關閉。
    pub fn select(&mut self, index: usize) -> Option<(String, String)> {
        self.core
            .take_selection(index)
            .map(|university| (university.name, university.id))
    }

    pub fn state(&self) -> SearchState {
        self.core.state
    }

    pub fn results(&self) -> &[University] {
        &self.core.results
    }

    pub fn total_count(&self) -> usize {
        self.core.total_count
    }
}

impl Default for UniversitySearch {
    fn default() -> Self {
        Self::new()
    }
}

/// 學系搜尋 modal。只有在大學已選定時才有意義。
#[derive(Debug)]
pub struct MajorSearch {
    core: SearchCore<Major>,
    university_id: String,
}

impl MajorSearch {
    pub fn new(university_id: &str) -> Self {
        Self {
            core: SearchCore::new(),
            university_id: university_id.to_string(),
        }
    }

    pub fn open(&mut self) {
        self.core.open();
    }

    pub fn close(&mut self) {
        self.core.close();
    }

    pub fn university_id(&self) -> &str {
        &self.university_id
    }

    /// 大學 id 為空時不發請求，直接 Empty。
    /// keyword 可以是空的，這時拿回整頁結果。
    pub fn submit(&mut self, keyword: &str) -> Option<SearchRequest> {
        if self.core.state == SearchState::Closed {
            return None;
        }
        if self.university_id.trim().is_empty() {
            self.core.results.clear();
            self.core.total_count = 0;
            self.core.state = SearchState::Empty;
            return None;
        }
        Some(self.core.issue(keyword))
    }

    pub fn resolve(&mut self, tag: u64, result: Result<Vec<Major>, ClientError>) -> Resolution {
        self.core.resolve(tag, result)
    }

    /// 選擇結果只回傳學系名稱（parent form 只存名稱）。
    pub fn select(&mut self, index: usize) -> Option<String> {
        self.core.take_selection(index).map(|major| major.name)
    }

    pub fn state(&self) -> SearchState {
        self.core.state
    }

    pub fn results(&self) -> &[Major] {
        &self.core.results
    }

    pub fn total_count(&self) -> usize {
        self.core.total_count
    }
}
