use crate::core::api::{require_data, ApiClient};
use crate::domain::model::{ApiResponse, GeneratedProblems, Problem};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_upload_extension, validate_upload_size};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::Arc;

const GENERATE_PATH: &str = "/api/problem";
const PDF_PATH: &str = "/api/problem/pdf";

/// 問題生成 / PDF 下載。生成本身是外部服務，這裡只負責上傳與回應解析。
pub struct ProblemClient {
    api: Arc<ApiClient>,
}

impl ProblemClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// 上傳上課資料（必須）與考古題（選擇）產生問題。
    /// 檔案大小與副檔名在提交時會再檢查一次。
    pub async fn generate(
        &self,
        concept_files: &[impl AsRef<Path>],
        format_files: &[impl AsRef<Path>],
    ) -> Result<GeneratedProblems> {
        if concept_files.is_empty() {
            return Err(ClientError::MissingFieldError {
                field: "수업 자료".to_string(),
            });
        }

        let mut form = Form::new();
        for path in concept_files {
            form = attach_file(form, "conceptFiles", path.as_ref()).await?;
        }
        for path in format_files {
            form = attach_file(form, "formatFiles", path.as_ref()).await?;
        }

        tracing::info!(
            "📤 Uploading {} concept file(s), {} format file(s)",
            concept_files.len(),
            format_files.len()
        );

        let response = self.api.post(GENERATE_PATH)?.multipart(form).send().await?;
        let envelope: ApiResponse<GeneratedProblems> = self.api.read_envelope(response).await?;
        let generated = require_data(envelope)?;

        tracing::info!("📥 Received {} generated problem(s)", generated.problems.len());
        Ok(generated)
    }

    /// 把生成的問題列表下載成 PDF。
    pub async fn download_pdf(&self, problems: &[Problem]) -> Result<Vec<u8>> {
        let body = serde_json::json!({ "problems": problems });
        let response = self.api.post(PDF_PATH)?.json(&body).send().await?;
        self.api.read_bytes(response).await
    }
}

async fn attach_file(form: Form, field: &str, path: &Path) -> Result<Form> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| ClientError::ValidationError {
            field: field.to_string(),
            reason: format!("Invalid file path: {}", path.display()),
        })?;

    validate_upload_extension(field, &file_name)?;

    let metadata = tokio::fs::metadata(path).await?;
    validate_upload_size(field, &file_name, metadata.len())?;

    let bytes = tokio::fs::read(path).await?;
    Ok(form.part(field.to_string(), Part::bytes(bytes).file_name(file_name)))
}
