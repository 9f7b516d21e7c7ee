use crate::app::{drain_dialogs, failure_message, prompt, App};
use crate::core::auth::{RegisterRequest, ResendCooldown, RESEND_COOLDOWN_SECS};
use crate::core::search::{MajorSearch, Resolution, SearchState, UniversitySearch};
use crate::domain::ports::{TokenStore, UniversityRegistry};
use crate::utils::error::Result;
use crate::utils::validation::check_password;
use std::io::{BufRead, Write};

impl<S: TokenStore> App<S> {
    /// 註冊精靈：email 驗證 → 暱稱 → 密碼 → 大學/學系搜尋 → 推薦人代碼。
    pub async fn signup<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        writeln!(out, "== 회원가입 ==")?;

        let Some(email) = prompt(input, out, "이메일")? else {
            return Ok(());
        };
        if email.is_empty() {
            self.dialogs.show("이메일을 입력해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let mut cooldown = ResendCooldown::new();
        if let Err(err) = self.auth.send_verification_email(&email).await {
            tracing::error!("인증 코드 전송 실패: {}", err);
            self.dialogs.show(failure_message(
                &err,
                "인증 코드 전송에 실패했습니다. 다시 시도해주세요.",
            ));
            return drain_dialogs(&mut self.dialogs, input, out);
        }
        cooldown.start(RESEND_COOLDOWN_SECS);
        self.dialogs
            .show("인증 코드가 전송되었습니다. 이메일을 확인해주세요.");
        drain_dialogs(&mut self.dialogs, input, out)?;

        if !self.verify_email_loop(input, out, &email, &mut cooldown).await? {
            return Ok(());
        }
        cooldown.cancel();

        let Some(nickname) = prompt(input, out, "닉네임")? else {
            return Ok(());
        };
        if nickname.is_empty() {
            self.dialogs.show("닉네임을 입력해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let Some(password) = self.password_loop(input, out)? else {
            return Ok(());
        };

        let (university, university_id) = match self.university_modal_flow(input, out).await? {
            Some((name, id)) => (name, id),
            None => (String::new(), String::new()),
        };

        let major = match self
            .major_modal_flow(input, out, &university, &university_id)
            .await?
        {
            Some(name) => name,
            None => String::new(),
        };

        let Some(referral_code) = prompt(input, out, "추천인 코드 (없으면 Enter)")? else {
            return Ok(());
        };

        let request = RegisterRequest::new(
            email,
            nickname,
            password,
            university,
            major,
            referral_code,
        );
        match self.auth.register(&request).await {
            Ok(()) => self.dialogs.show("회원가입이 완료되었습니다."),
            Err(err) => {
                tracing::error!("회원가입 실패: {}", err);
                self.dialogs.show(failure_message(
                    &err,
                    "회원가입에 실패했습니다. 다시 시도해주세요.",
                ));
            }
        }
        drain_dialogs(&mut self.dialogs, input, out)
    }

    /// 驗證碼輸入迴圈。`resend` 只有在 cooldown 結束後才會重送。
    async fn verify_email_loop<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        email: &str,
        cooldown: &mut ResendCooldown,
    ) -> Result<bool> {
        loop {
            let Some(code) = prompt(input, out, "인증번호 (재전송: resend)")? else {
                return Ok(false);
            };

            if code == "resend" {
                if !cooldown.can_resend() {
                    let remaining = cooldown.remaining_secs();
                    self.dialogs.show(format!(
                        "{}분 {}초 후에 다시 시도해주세요.",
                        remaining.div_ceil(60),
                        remaining % 60
                    ));
                    drain_dialogs(&mut self.dialogs, input, out)?;
                    continue;
                }
                match self.auth.send_verification_email(email).await {
                    Ok(()) => {
                        cooldown.start(RESEND_COOLDOWN_SECS);
                        self.dialogs
                            .show("인증 코드가 전송되었습니다. 이메일을 확인해주세요.");
                    }
                    Err(err) => {
                        tracing::error!("인증 코드 전송 실패: {}", err);
                        self.dialogs.show(failure_message(
                            &err,
                            "인증 코드 전송에 실패했습니다. 다시 시도해주세요.",
                        ));
                    }
                }
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            if code.is_empty() {
                self.dialogs.show("인증 코드를 입력해주세요.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            match self.auth.verify_email(email, &code).await {
                Ok(()) => {
                    self.dialogs.show("이메일이 인증되었습니다.");
                    drain_dialogs(&mut self.dialogs, input, out)?;
                    return Ok(true);
                }
                Err(err) => {
                    tracing::error!("이메일 인증 실패: {}", err);
                    self.dialogs.show(failure_message(
                        &err,
                        "이메일 인증에 실패했습니다. 다시 시도해주세요.",
                    ));
                    drain_dialogs(&mut self.dialogs, input, out)?;
                }
            }
        }
    }

    /// 密碼輸入。每次輸入都重新計算並顯示逐條件結果。
    fn password_loop<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<String>> {
        loop {
            let Some(password) = prompt(input, out, "비밀번호")? else {
                return Ok(None);
            };

            let check = check_password(&password);
            let mark = |ok: bool| if ok { "✓" } else { "✗" };
            writeln!(out, "  {} 최소 8자 이상", mark(check.has_min_length))?;
            writeln!(out, "  {} 영문 포함", mark(check.has_letter))?;
            writeln!(out, "  {} 숫자 포함", mark(check.has_digit))?;
            writeln!(out, "  {} 특수문자 포함", mark(check.has_special))?;

            if !check.is_valid() {
                self.dialogs.show("비밀번호 조건을 만족하지 않습니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            let Some(confirm) = prompt(input, out, "비밀번호 확인")? else {
                return Ok(None);
            };
            if confirm != password {
                self.dialogs.show("비밀번호가 일치하지 않습니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            return Ok(Some(password));
        }
    }

    /// 大學搜尋 modal。選定回傳 (name, id)，跳過回傳 None。
    pub async fn university_modal_flow<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<(String, String)>> {
        let mut modal = UniversitySearch::new();
        modal.open();
        writeln!(out, "== 대학교 검색 ==")?;

        loop {
            let Some(keyword) = prompt(input, out, "대학교명 (건너뛰기: Enter)")? else {
                modal.close();
                return Ok(None);
            };
            if keyword.is_empty() {
                modal.close();
                return Ok(None);
            }

            let Some(request) = modal.submit(&keyword) else {
                continue;
            };
            writeln!(out, "검색 중...")?;
            let result = self
                .lookup
                .search_universities(&request.keyword, request.page)
                .await;

            if let Resolution::Failed(err) = modal.resolve(request.tag, result) {
                tracing::error!("대학교 검색 실패: {}", err);
                self.dialogs.show("대학교 검색에 실패했습니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            match modal.state() {
                SearchState::Empty => {
                    writeln!(out, "검색 결과가 없습니다.")?;
                }
                SearchState::Results(_) => {
                    for (index, university) in modal.results().iter().enumerate() {
                        writeln!(
                            out,
                            "{}. {} ({} • {})",
                            index + 1,
                            university.name,
                            university.kind,
                            university.region
                        )?;
                    }
                    writeln!(out, "총 {}개의 결과", modal.total_count())?;

                    let Some(choice) = prompt(input, out, "번호 선택 (다시 검색: Enter)")? else {
                        modal.close();
                        return Ok(None);
                    };
                    if let Ok(number) = choice.parse::<usize>() {
                        if let Some(selection) = modal.select(number.saturating_sub(1)) {
                            return Ok(Some(selection));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// 學系搜尋 modal。大學還沒選定就不打開。
    pub async fn major_modal_flow<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        university_name: &str,
        university_id: &str,
    ) -> Result<Option<String>> {
        if university_id.trim().is_empty() {
            return Ok(None);
        }

        let mut modal = MajorSearch::new(university_id);
        modal.open();
        writeln!(out, "== 학과 검색 ==")?;
        writeln!(out, "선택된 대학교: {}", university_name)?;

        loop {
            let Some(keyword) = prompt(input, out, "학과명 (전체: *, 건너뛰기: Enter)")? else {
                modal.close();
                return Ok(None);
            };
            if keyword.is_empty() {
                modal.close();
                return Ok(None);
            }
            // 想看整份遠端列表時用空 keyword 提交
            let keyword = if keyword == "*" { String::new() } else { keyword };

            let Some(request) = modal.submit(&keyword) else {
                continue;
            };
            writeln!(out, "검색 중...")?;
            let result = self
                .lookup
                .search_majors(modal.university_id(), &request.keyword, request.page)
                .await;

            if let Resolution::Failed(err) = modal.resolve(request.tag, result) {
                tracing::error!("학과 검색 실패: {}", err);
                self.dialogs.show("학과 검색에 실패했습니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                continue;
            }

            match modal.state() {
                SearchState::Empty => {
                    writeln!(out, "학과 정보가 없습니다.")?;
                }
                SearchState::Results(_) => {
                    for (index, major) in modal.results().iter().enumerate() {
                        writeln!(
                            out,
                            "{}. {} ({} • {} • {})",
                            index + 1,
                            major.name,
                            major.college_name,
                            major.degree_level,
                            major.term_name
                        )?;
                    }
                    writeln!(out, "총 {}개의 결과", modal.total_count())?;

                    let Some(choice) = prompt(input, out, "번호 선택 (다시 검색: Enter)")? else {
                        modal.close();
                        return Ok(None);
                    };
                    if let Ok(number) = choice.parse::<usize>() {
                        if let Some(name) = modal.select(number.saturating_sub(1)) {
                            return Ok(Some(name));
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
