use crate::app::{drain_dialogs, failure_message, prompt, App};
use crate::core::auth::UpdateUserRequest;
use crate::domain::model::User;
use crate::domain::ports::TokenStore;
use crate::utils::error::{ClientError, Result};
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

impl<S: TokenStore> App<S> {
    /// My page：顯示 profile、輸入推薦人代碼、刪除帳號。
    pub async fn account<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        if !self.session.is_authenticated() {
            self.dialogs.show("로그인이 필요합니다.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let user = match self.auth.me().await {
            Ok(user) => {
                self.session.set_user(user.clone());
                user
            }
            Err(err) => {
                tracing::error!("사용자 정보 조회 실패: {}", err);
                self.dialogs.show("사용자 정보를 불러오는데 실패했습니다.");
                return drain_dialogs(&mut self.dialogs, input, out);
            }
        };

        print_profile(out, &user)?;

        loop {
            let Some(choice) =
                prompt(input, out, "[1] 추천인 코드 입력 [2] 계정 탈퇴 (종료: Enter)")?
            else {
                return Ok(());
            };

            match choice.as_str() {
                "" => return Ok(()),
                "1" => self.submit_referral(input, out, &user).await?,
                "2" => {
                    let deleted = self.delete_account(input, out, &user).await?;
                    if deleted {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    async fn submit_referral<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        user: &User,
    ) -> Result<()> {
        writeln!(out, "내 추천인 코드: {}", user.nickname)?;
        let Some(code) = prompt(input, out, "추천인 코드")? else {
            return Ok(());
        };
        if code.is_empty() {
            self.dialogs.show("추천인 코드를 입력해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let id = user
            .user_id
            .parse::<u64>()
            .map_err(|_| ClientError::ValidationError {
                field: "userId".to_string(),
                reason: format!("invalid user id: {}", user.user_id),
            })?;

        // 既有的大學/學系值一起送出
        let request = UpdateUserRequest {
            id,
            recommend_nickname: code,
            university: user.university.clone(),
            major: user.major.clone(),
        };

        match self.auth.update_user(&request).await {
            Ok(()) => self
                .dialogs
                .show("추천인 코드가 입력되었습니다. 문제 생성 횟수가 1회 추가됩니다."),
            Err(err) => {
                tracing::error!("추천인 코드 입력 실패: {}", err);
                self.dialogs.show(failure_message(
                    &err,
                    "추천인 코드 입력에 실패했습니다. 다시 시도해주세요.",
                ));
            }
        }
        drain_dialogs(&mut self.dialogs, input, out)
    }

    async fn delete_account<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        user: &User,
    ) -> Result<bool> {
        let accepted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&accepted);
        self.dialogs.confirm(
            "계정을 삭제하시겠습니까?",
            "모든 데이터는 계정 삭제 후 30일 안에 영구적으로 삭제됩니다.",
            move || flag.store(true, Ordering::SeqCst),
        );
        drain_dialogs(&mut self.dialogs, input, out)?;

        if !accepted.load(Ordering::SeqCst) {
            return Ok(false);
        }

        match self.auth.delete_user(&user.user_id).await {
            Ok(()) => {
                self.session.teardown()?;
                self.dialogs.show("계정이 삭제되었습니다.");
                drain_dialogs(&mut self.dialogs, input, out)?;
                Ok(true)
            }
            Err(err) => {
                tracing::error!("계정 탈퇴 실패: {}", err);
                self.dialogs.show(failure_message(
                    &err,
                    "계정 탈퇴에 실패했습니다. 다시 시도해주세요.",
                ));
                drain_dialogs(&mut self.dialogs, input, out)?;
                Ok(false)
            }
        }
    }
}

fn print_profile<W: Write>(out: &mut W, user: &User) -> Result<()> {
    writeln!(out, "== 내 계정 ==")?;
    writeln!(out, "닉네임: {}", user.nickname)?;
    writeln!(out, "이메일: {}", user.email)?;
    if let Some(university) = user.university.as_ref() {
        writeln!(out, "대학교: {}", university)?;
    }
    if let Some(major) = user.major.as_ref() {
        writeln!(out, "학과: {}", major)?;
    }
    writeln!(out, "무료 생성: {}회", user.free_count)?;
    Ok(())
}
