pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "improfessor")]
#[command(about = "내가 교수님 — practice problem generator client")]
pub struct CliConfig {
    #[arg(long, default_value = "https://api.improfessor.kro.kr")]
    pub base_url: String,

    /// Optional TOML config file; CLI flags win over file values.
    #[arg(long)]
    pub config: Option<String>,

    /// 토큰 등 로컬 상태가 저장되는 디렉터리.
    #[arg(long, default_value = ".improfessor")]
    pub data_dir: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 이메일/비밀번호 로그인 (또는 --kakao로 카카오 로그인 URL 출력)
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, help = "Print the Kakao authorize URL instead")]
        kakao: bool,
    },
    /// 카카오 OAuth redirect URL을 소비해 토큰을 저장
    KakaoCallback { url: String },
    /// 회원가입 (대화형: 이메일 인증, 대학교/학과 검색 포함)
    Signup,
    Logout,
    /// 수업 자료(필수)와 족보(선택)로 문제 생성
    Generate {
        #[arg(long, value_delimiter = ',', required = true)]
        concept_files: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        format_files: Vec<String>,
    },
    /// 결과 URL의 state를 복원해 문제를 표시하고, 필요하면 PDF 저장
    Result {
        url: String,
        #[arg(long, help = "Save the problems as PDF to this path")]
        save_pdf: Option<String>,
    },
    /// 공지사항 목록 (페이지 단위)
    Notices {
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// 마이페이지: 프로필, 추천인 코드 입력, 계정 탈퇴
    Account,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_command() {
        let config = CliConfig::parse_from([
            "improfessor",
            "generate",
            "--concept-files",
            "ch1.pdf,ch2.pdf",
            "--format-files",
            "exam.pdf",
        ]);

        match config.command {
            Command::Generate {
                concept_files,
                format_files,
            } => {
                assert_eq!(concept_files, vec!["ch1.pdf", "ch2.pdf"]);
                assert_eq!(format_files, vec!["exam.pdf"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let config = CliConfig::parse_from(["improfessor", "--base-url", "not-a-url", "logout"]);
        assert!(config.validate().is_err());
    }
}
