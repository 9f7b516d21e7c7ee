use crate::core::api::ApiClient;
use crate::domain::model::{Major, University};
use crate::domain::ports::UniversityRegistry;
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::sync::Arc;

const LOOKUP_PATH: &str = "/api/university";

/// registry 回傳 resultCode == "99" 代表上游失敗。
const RESULT_CODE_FAILURE: &str = "99";

/// 大學/學系 registry 查詢 client。
/// 上游是 XML，這裡負責解析成 typed record；呼叫端不碰 wire format。
pub struct LookupClient {
    api: Arc<ApiClient>,
}

impl LookupClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn fetch_xml(&self, query: &[(&str, &str)]) -> Result<String> {
        let response = self.api.get(LOOKUP_PATH)?.query(query).send().await?;
        tracing::debug!("lookup response status: {}", response.status());
        let body = response.text().await?;
        Ok(body)
    }
}

#[async_trait]
impl UniversityRegistry for LookupClient {
    async fn search_universities(&self, keyword: &str, page: u32) -> Result<Vec<University>> {
        let page = page.to_string();
        let body = self
            .fetch_xml(&[("type", "university"), ("keyword", keyword), ("page", &page)])
            .await?;
        parse_universities(&body)
    }

    async fn search_majors(
        &self,
        university_id: &str,
        keyword: &str,
        page: u32,
    ) -> Result<Vec<Major>> {
        // 沒有選定大學就不打上游，直接回空集合
        if university_id.trim().is_empty() {
            return Ok(Vec::new());
        }

        let page = page.to_string();
        let body = self
            .fetch_xml(&[
                ("type", "major"),
                ("universityId", university_id),
                ("page", &page),
            ])
            .await?;
        parse_majors(&body, keyword)
    }
}

fn child_text(node: Node<'_, '_>, tag: &str) -> String {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .unwrap_or("")
        .to_string()
}

fn check_result_code(doc: &Document<'_>) -> Result<()> {
    let result_code = doc
        .descendants()
        .find(|node| node.has_tag_name("resultCode"))
        .and_then(|node| node.text());

    if result_code == Some(RESULT_CODE_FAILURE) {
        let message = doc
            .descendants()
            .find(|node| node.has_tag_name("resultMsg"))
            .and_then(|node| node.text())
            .unwrap_or("")
            .to_string();
        return Err(ClientError::LookupError { message });
    }

    Ok(())
}

/// 解析大學查詢回應。同一個 schlId 只保留第一筆，順序維持原樣。
pub fn parse_universities(xml: &str) -> Result<Vec<University>> {
    let doc = Document::parse(xml)?;
    check_result_code(&doc)?;

    let mut seen = HashSet::new();
    let mut universities = Vec::new();

    for item in doc.descendants().filter(|node| node.has_tag_name("item")) {
        let id = child_text(item, "schlId");
        if !seen.insert(id.clone()) {
            continue;
        }
        universities.push(University {
            name: child_text(item, "schlNm"),
            id,
            kind: child_text(item, "schlKndNm"),
            region: child_text(item, "mjrAreaNm"),
        });
    }

    Ok(universities)
}

/// 解析學系查詢回應。上游不支援依學系名過濾，
/// keyword 過濾（大小寫不敏感的子字串比對）在這裡做。
pub fn parse_majors(xml: &str, keyword: &str) -> Result<Vec<Major>> {
    let doc = Document::parse(xml)?;
    check_result_code(&doc)?;

    let keyword_lower = keyword.trim().to_lowercase();
    let mut majors = Vec::new();

    for item in doc.descendants().filter(|node| node.has_tag_name("item")) {
        let name = child_text(item, "korMjrNm");
        if !keyword_lower.is_empty() && !name.to_lowercase().contains(&keyword_lower) {
            continue;
        }
        majors.push(Major {
            name,
            id: child_text(item, "kediMjrId"),
            college_name: child_text(item, "clgNm"),
            degree_level: child_text(item, "pbnfDgriCrseDivNm"),
            term_name: child_text(item, "lsnTrmNm"),
        });
    }

    Ok(majors)
}
