use crate::app::{drain_dialogs, failure_message, App};
use crate::core::notice::{is_new, paginate, total_pages};
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use chrono::Utc;
use std::io::{BufRead, Write};

impl<S: TokenStore> App<S> {
    pub async fn show_notices<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        page: usize,
    ) -> Result<()> {
        let notices = match self.notice.list().await {
            Ok(notices) => notices,
            Err(err) => {
                tracing::error!("공지사항 조회 실패: {}", err);
                self.dialogs.show(failure_message(
                    &err,
                    "공지사항을 불러오는데 실패했습니다.",
                ));
                return drain_dialogs(&mut self.dialogs, input, out);
            }
        };

        writeln!(out, "== 공지사항 ==")?;
        let now = Utc::now();
        for notice in paginate(&notices, page) {
            let marker = if is_new(notice, now) { " [NEW]" } else { "" };
            writeln!(
                out,
                "{}. {}{} ({})",
                notice.notice_id,
                notice.title,
                marker,
                notice.created_at.format("%Y-%m-%d")
            )?;
            if let Some(content) = notice.content.as_ref() {
                writeln!(out, "   {}", content)?;
            }
        }
        writeln!(out, "페이지 {}/{}", page.max(1), total_pages(notices.len()).max(1))?;

        drain_dialogs(&mut self.dialogs, input, out)
    }
}
