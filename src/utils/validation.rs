use crate::utils::error::{ClientError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 上傳上限：每個檔案 15MB
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 3] = ["pdf", "ppt", "pptx"];

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const PASSWORD_MIN_LENGTH: usize = 8;

/// 密碼逐條件的檢查結果。四個條件全部成立才算有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    pub has_min_length: bool,
    pub has_letter: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordCheck {
    pub fn is_valid(&self) -> bool {
        self.has_min_length && self.has_letter && self.has_digit && self.has_special
    }
}

/// Pure function over the current password string; recomputed on every change.
pub fn check_password(password: &str) -> PasswordCheck {
    PasswordCheck {
        has_min_length: password.chars().count() >= PASSWORD_MIN_LENGTH,
        has_letter: password.chars().any(|c| c.is_ascii_alphabetic()),
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_special: password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)),
    }
}

/// 只允許 15MB 以下（含邊界值）。
pub fn admit_file_size(size: u64) -> bool {
    size <= MAX_UPLOAD_BYTES
}

pub fn validate_upload_size(field_name: &str, file_name: &str, size: u64) -> Result<()> {
    if !admit_file_size(size) {
        return Err(ClientError::ValidationError {
            field: field_name.to_string(),
            reason: format!("\"{}\"의 크기가 15MB를 초과합니다.", file_name),
        });
    }
    Ok(())
}

pub fn validate_upload_extension(field_name: &str, file_name: &str) -> Result<()> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(ClientError::ValidationError {
            field: field_name.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                ALLOWED_UPLOAD_EXTENSIONS.join(", ")
            ),
        }),
        None => Err(ClientError::ValidationError {
            field: field_name.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ClientError::ConfigError {
            field: field_name.to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    match url::Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ClientError::ConfigError {
                field: field_name.to_string(),
                message: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ClientError::ConfigError {
            field: field_name.to_string(),
            message: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::MissingFieldError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ClientError::MissingFieldError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    // 字元走訪的實作必須跟正規表達式的基準實作一致
    fn reference_check(password: &str) -> PasswordCheck {
        let letter = Regex::new(r"[a-zA-Z]").unwrap();
        let digit = Regex::new(r"\d").unwrap();
        let special = Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap();
        PasswordCheck {
            has_min_length: password.chars().count() >= 8,
            has_letter: letter.is_match(password),
            has_digit: digit.is_match(password),
            has_special: special.is_match(password),
        }
    }

    #[test]
    fn test_password_check_matches_reference_regexes() {
        let cases = [
            "",
            "short1!",
            "password",
            "12345678",
            "!!!!!!!!",
            "password1",
            "password!",
            "12345678!",
            "passw0rd!",
            "Abcdef1?",
            "한글비밀번호1a!",
            "spaces in pw 1!",
            "a1!a1!a",
            "a1!a1!a1",
        ];

        for case in cases {
            let got = check_password(case);
            let expected = reference_check(case);
            assert_eq!(got, expected, "mismatch for {:?}", case);
            assert_eq!(
                got.is_valid(),
                expected.has_min_length
                    && expected.has_letter
                    && expected.has_digit
                    && expected.has_special,
                "aggregate mismatch for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_password_conditions_are_independent() {
        let check = check_password("abcdefgh");
        assert!(check.has_min_length);
        assert!(check.has_letter);
        assert!(!check.has_digit);
        assert!(!check.has_special);
        assert!(!check.is_valid());

        assert!(check_password("passw0rd!").is_valid());
    }

    #[test]
    fn test_admit_file_size_boundary() {
        assert!(admit_file_size(0));
        assert!(admit_file_size(15_728_640));
        assert!(!admit_file_size(15_728_641));
    }

    #[test]
    fn test_validate_upload_extension() {
        assert!(validate_upload_extension("conceptFiles", "chapter1.pdf").is_ok());
        assert!(validate_upload_extension("conceptFiles", "slides.PPTX").is_ok());
        assert!(validate_upload_extension("conceptFiles", "notes.hwp").is_err());
        assert!(validate_upload_extension("conceptFiles", "no_extension").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("service.base_url", "https://api.improfessor.kro.kr").is_ok());
        assert!(validate_url("service.base_url", "").is_err());
        assert!(validate_url("service.base_url", "ftp://example.com").is_err());
        assert!(validate_url("service.base_url", "not-a-url").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("이메일", "user@example.com").is_ok());
        assert!(validate_non_empty_string("이메일", "   ").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let some: Option<String> = Some("값".to_string());
        let none: Option<String> = None;
        assert_eq!(validate_required_field("대학교", &some).unwrap().as_str(), "값");
        assert!(validate_required_field("대학교", &none).is_err());
    }
}
