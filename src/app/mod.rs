pub mod account;
pub mod generate;
pub mod login;
pub mod notices;
pub mod signup;

use crate::config::cli::FileTokenStore;
use crate::config::toml_config::AppConfig;
use crate::config::CliConfig;
use crate::core::alert::{Dialog, DialogController};
use crate::core::api::ApiClient;
use crate::core::auth::AuthClient;
use crate::core::lookup::LookupClient;
use crate::core::notice::NoticeClient;
use crate::core::problem::ProblemClient;
use crate::core::session::SessionContext;
use crate::domain::ports::TokenStore;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::Validate;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// 各 flow 共用的 application context。
/// session 與 dialog queue 整個 process 各只有一個。
pub struct App<S: TokenStore> {
    pub api: Arc<ApiClient>,
    pub auth: AuthClient,
    pub problem: ProblemClient,
    pub notice: NoticeClient,
    pub lookup: LookupClient,
    pub session: SessionContext<S>,
    pub dialogs: DialogController,
    pub config: AppConfig,
}

impl App<FileTokenStore> {
    pub fn new(cli: &CliConfig) -> Result<Self> {
        let mut config = match cli.config.as_ref() {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.service.base_url = cli.base_url.clone();
        config.validate()?;

        let api = Arc::new(ApiClient::new(
            &config.service.base_url,
            config.timeout_seconds(),
        )?);
        let store = FileTokenStore::new(&cli.data_dir);
        let session = SessionContext::init(store, Arc::clone(&api))?;

        Ok(Self {
            auth: AuthClient::new(Arc::clone(&api)),
            problem: ProblemClient::new(Arc::clone(&api)),
            notice: NoticeClient::new(Arc::clone(&api)),
            lookup: LookupClient::new(Arc::clone(&api)),
            session,
            dialogs: DialogController::new(),
            config,
            api,
        })
    }
}

/// envelope 錯誤用原樣 message，其餘用各 flow 的一般文案。
pub(crate) fn failure_message(err: &ClientError, generic: &str) -> String {
    match err {
        ClientError::ApiError { .. }
        | ClientError::LookupError { .. }
        | ClientError::ValidationError { .. }
        | ClientError::MissingFieldError { .. } => err.user_friendly_message(),
        _ => generic.to_string(),
    }
}

/// 讀一行輸入。EOF 回 None（flow 中止訊號）。
pub(crate) fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// 把排隊中的 dialog 全部表出。
/// alert 只需確認，confirm 輸入 y 才執行接受 callback。
pub(crate) fn drain_dialogs<R: BufRead, W: Write>(
    dialogs: &mut DialogController,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        let ask_confirm = match dialogs.active() {
            None => break,
            Some(Dialog::Alert { message }) => {
                writeln!(out, "[알림] {}", message)?;
                false
            }
            Some(Dialog::Confirm { title, detail, .. }) => {
                writeln!(out, "[확인] {}", title)?;
                if !detail.is_empty() {
                    writeln!(out, "{}", detail)?;
                }
                true
            }
        };

        if ask_confirm {
            write!(out, "(y/N): ")?;
            out.flush()?;
            let mut line = String::new();
            let accepted =
                input.read_line(&mut line)? > 0 && line.trim().eq_ignore_ascii_case("y");
            if accepted {
                dialogs.accept();
            } else {
                dialogs.dismiss();
            }
        } else {
            dialogs.dismiss();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_forwards_envelope_verbatim() {
        let err = ClientError::ApiError {
            message: "이미 가입된 이메일입니다.".to_string(),
        };
        assert_eq!(
            failure_message(&err, "회원가입에 실패했습니다."),
            "이미 가입된 이메일입니다."
        );
    }

    #[test]
    fn test_failure_message_generic_for_transport() {
        let err = ClientError::StatusError { status: 502 };
        assert_eq!(
            failure_message(&err, "로그인에 실패했습니다. 다시 시도해주세요."),
            "로그인에 실패했습니다. 다시 시도해주세요."
        );
    }

    #[test]
    fn test_drain_dialogs_prints_alerts_in_order() {
        let mut dialogs = DialogController::new();
        dialogs.show("첫 번째");
        dialogs.show("두 번째");

        let mut input = std::io::Cursor::new(Vec::new());
        let mut out = Vec::new();
        drain_dialogs(&mut dialogs, &mut input, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("[알림] 첫 번째"));
        assert!(printed.contains("[알림] 두 번째"));
        assert!(dialogs.is_idle());
    }

    #[test]
    fn test_drain_dialogs_confirm_accept() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let accepted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&accepted);

        let mut dialogs = DialogController::new();
        dialogs.confirm("계정을 삭제하시겠습니까?", "", move || {
            flag.store(true, Ordering::SeqCst);
        });

        let mut input = std::io::Cursor::new(b"y\n".to_vec());
        let mut out = Vec::new();
        drain_dialogs(&mut dialogs, &mut input, &mut out).unwrap();

        assert!(accepted.load(Ordering::SeqCst));
    }

    #[test]
    fn test_prompt_returns_none_on_eof() {
        let mut input = std::io::Cursor::new(Vec::new());
        let mut out = Vec::new();
        assert!(prompt(&mut input, &mut out, "이메일").unwrap().is_none());
    }
}
