use crate::app::{drain_dialogs, failure_message, prompt, App};
use crate::domain::model::RedirectOutcome;
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use url::Url;

impl<S: TokenStore> App<S> {
    pub async fn login<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        email: Option<String>,
        password: Option<String>,
        kakao: bool,
    ) -> Result<()> {
        if kakao {
            match self.config.kakao_login_url(false)? {
                Some(url) => {
                    writeln!(out, "카카오 로그인: {}", url)?;
                    writeln!(
                        out,
                        "로그인 후 redirect된 URL을 `improfessor kakao-callback <url>`로 전달해주세요."
                    )?;
                }
                None => self.dialogs.show("카카오 로그인이 설정되어 있지 않습니다."),
            }
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        let email = match email {
            Some(value) => value,
            None => match prompt(input, out, "이메일")? {
                Some(value) => value,
                None => return Ok(()),
            },
        };
        let password = match password {
            Some(value) => value,
            None => match prompt(input, out, "비밀번호")? {
                Some(value) => value,
                None => return Ok(()),
            },
        };

        if email.is_empty() || password.is_empty() {
            self.dialogs.show("이메일과 비밀번호를 입력해주세요.");
            return drain_dialogs(&mut self.dialogs, input, out);
        }

        match self.auth.login(&email, &password).await {
            Ok(tokens) => {
                self.session.apply_tokens(tokens)?;
                if let Ok(user) = self.auth.me().await {
                    self.session.set_user(user);
                }
                writeln!(out, "로그인되었습니다.")?;
            }
            Err(err) => {
                tracing::error!("로그인 실패: {}", err);
                self.dialogs.show(failure_message(
                    &err,
                    "로그인에 실패했습니다. 다시 시도해주세요.",
                ));
            }
        }

        drain_dialogs(&mut self.dialogs, input, out)
    }

    /// 消費 Kakao OAuth redirect URL：保存 token 或表出錯誤後，
    /// 回傳移除了被消費參數的 URL。
    pub async fn kakao_callback<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        raw_url: &str,
    ) -> Result<()> {
        let url = Url::parse(raw_url)?;
        let (outcome, cleaned) = self.session.consume_redirect(&url)?;

        match outcome {
            RedirectOutcome::Tokens(_) => {
                if let Ok(user) = self.auth.me().await {
                    self.session.set_user(user);
                }
                self.dialogs.show("카카오 로그인에 성공했어요!");
            }
            RedirectOutcome::Error { error, message } => {
                self.dialogs.show(format!(
                    "카카오 로그인 실패: {}",
                    message.unwrap_or(error)
                ));
            }
            RedirectOutcome::None => {
                self.dialogs.show("redirect URL에 토큰이 없습니다.");
            }
        }

        writeln!(out, "{}", cleaned)?;
        drain_dialogs(&mut self.dialogs, input, out)
    }

    pub async fn logout<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        if let Err(err) = self.auth.logout().await {
            // server 呼叫失敗也照樣清掉本地 token
            tracing::error!("로그아웃 실패: {}", err);
        }
        self.session.teardown()?;
        writeln!(out, "로그아웃되었습니다.")?;
        drain_dialogs(&mut self.dialogs, input, out)
    }
}
