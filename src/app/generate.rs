use crate::app::{drain_dialogs, failure_message, App};
use crate::core::navstate::{decode_from_url, result_url, ResultState};
use crate::domain::ports::TokenStore;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_upload_extension, validate_upload_size};
use std::io::{BufRead, Write};
use std::path::Path;
use url::Url;

impl<S: TokenStore> App<S> {
    /// 問題生成：上傳上課資料（必須）+ 考古題（選擇）→ 輸出結果 URL。
    pub async fn generate<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        concept_files: Vec<String>,
        format_files: Vec<String>,
    ) -> Result<()> {
        if !self.session.is_authenticated() {
            self.dialogs.show("로그인이 필요합니다.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let free_count = match self.auth.me().await {
            Ok(user) => {
                let count = user.free_count;
                self.session.set_user(user);
                count
            }
            Err(err) => {
                tracing::error!("사용자 정보 조회 실패: {}", err);
                0
            }
        };
        if free_count == 0 {
            self.dialogs
                .show("무료 생성 횟수가 부족합니다. 마이페이지에서 확인해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        if concept_files.is_empty() {
            self.dialogs.show("수업 자료를 업로드해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        // 選擇時點的檢查。提交時 ProblemClient 會再檢查一次。
        for (field, files) in [("수업 자료", &concept_files), ("족보", &format_files)] {
            for file in files {
                if let Err(err) = inspect_upload(field, file) {
                    tracing::error!("파일 검사 실패: {}", err);
                    self.dialogs.show(failure_message(
                        &err,
                        "파일 크기가 15MB를 초과합니다. 더 작은 파일을 선택해주세요.",
                    ));
                    return drain_dialogs(&mut self.dialogs, input, out);
                }
            }
        }

        writeln!(out, "문제 생성 중...")?;
        match self.problem.generate(&concept_files, &format_files).await {
            Ok(generated) => {
                let state = ResultState {
                    problems: generated.problems,
                    download_key: generated.download_key,
                };
                let base = Url::parse(self.config.web_base_url())?;
                let url = result_url(&base, &state)?;
                writeln!(out, "{}개의 문제가 생성되었습니다.", state.problems.len())?;
                writeln!(out, "결과 페이지: {}", url)?;
            }
            Err(err) => {
                tracing::error!("문제 생성 실패: {}", err);
                self.dialogs
                    .show(failure_message(&err, "문제 생성에 실패했습니다."));
            }
        }

        drain_dialogs(&mut self.dialogs, input, out)
    }

    /// 從結果 URL 還原狀態並顯示問題。
    /// 還原失敗就把使用者帶回生成頁。
    pub async fn show_result<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        raw_url: &str,
        save_pdf: Option<String>,
    ) -> Result<()> {
        let state = match Url::parse(raw_url)
            .map_err(ClientError::from)
            .and_then(|url| decode_from_url(&url))
        {
            Ok(state) => state,
            Err(err) => {
                tracing::error!("상태 복원 실패: {}", err);
                self.dialogs.show("잘못된 접근입니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                writeln!(out, "문제 생성 페이지로 이동합니다: improfessor generate")?;
                return Ok(());
            }
        };

        writeln!(out, "== 생성된 문제 ==")?;
        for problem in &state.problems {
            writeln!(out)?;
            writeln!(out, "문제 {}", problem.number)?;
            writeln!(out, "문제 내용")?;
            writeln!(out, "{}", problem.content)?;
            if let Some(description) = problem.description.as_ref() {
                writeln!(out, "설명")?;
                writeln!(out, "{}", description)?;
            }
            writeln!(out, "정답")?;
            writeln!(out, "{}", problem.answer)?;
        }

        if let Some(path) = save_pdf {
            if state.problems.is_empty() {
                return drain_dialogs(&mut self.dialogs, input, out);
            }
            writeln!(out, "다운로드 중...")?;
            match self.problem.download_pdf(&state.problems).await {
                Ok(bytes) => {
                    std::fs::write(&path, bytes)?;
                    writeln!(out, "PDF 저장: {}", path)?;
                }
                Err(err) => {
                    tracing::error!("PDF 다운로드 실패: {}", err);
                    self.dialogs
                        .show(format!("PDF 다운로드에 실패했습니다: {}", err.user_friendly_message()));
                }
            }
        }

        drain_dialogs(&mut self.dialogs, input, out)
    }
}

fn inspect_upload(field: &str, file: &str) -> Result<()> {
    let path = Path::new(file);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());

    validate_upload_extension(field, &file_name)?;
    let metadata = std::fs::metadata(path)?;
    validate_upload_size(field, &file_name, metadata.len())?;
    Ok(())
}
