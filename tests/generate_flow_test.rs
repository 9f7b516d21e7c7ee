use httpmock::prelude::*;
use improfessor_client::core::api::ApiClient;
use improfessor_client::core::navstate::{decode_from_url, result_url, ResultState};
use improfessor_client::core::problem::ProblemClient;
use improfessor_client::domain::model::Problem;
use improfessor_client::ClientError;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

fn problem_client(server: &MockServer) -> ProblemClient {
    let api = Arc::new(ApiClient::new(&server.base_url(), 5).unwrap());
    ProblemClient::new(api)
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::File::create(&path).unwrap().write_all(bytes).unwrap();
    path
}

fn problems_response() -> serde_json::Value {
    serde_json::json!({
        "message": "생성 완료",
        "data": {
            "problems": [
                {"number": 1, "content": "다음 중 옳은 것은?", "description": "개념 설명", "answer": "②"},
                {"number": 2, "content": "서술하시오.", "answer": "자유 서술"}
            ],
            "downloadKey": "dl-abc123"
        }
    })
}

#[tokio::test]
async fn test_generate_uploads_multipart_and_parses_problems() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/problem");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(problems_response());
    });

    let dir = TempDir::new().unwrap();
    let concept = write_file(&dir, "chapter1.pdf", b"%PDF-1.4 concept");
    let format = write_file(&dir, "past_exam.pdf", b"%PDF-1.4 format");

    let client = problem_client(&server);
    let generated = client.generate(&[&concept], &[&format]).await.unwrap();

    mock.assert();
    assert_eq!(generated.problems.len(), 2);
    assert_eq!(generated.problems[0].number, 1);
    assert_eq!(generated.problems[0].description.as_deref(), Some("개념 설명"));
    assert!(generated.problems[1].description.is_none());
    assert_eq!(generated.download_key, "dl-abc123");
}

#[tokio::test]
async fn test_generate_rejects_oversized_file_before_upload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/problem");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(problems_response());
    });

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.pdf");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(15 * 1024 * 1024 + 1).unwrap();

    let client = problem_client(&server);
    let err = client
        .generate(&[&path], &[] as &[&std::path::Path])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ValidationError { .. }));
    mock.assert_hits(0);
}

#[tokio::test]
async fn test_generate_failure_surfaces_envelope_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/problem");
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "message": "무료 생성 횟수가 부족합니다.",
                "data": null
            }));
    });

    let dir = TempDir::new().unwrap();
    let concept = write_file(&dir, "chapter1.pdf", b"%PDF-1.4");

    let client = problem_client(&server);
    let err = client
        .generate(&[&concept], &[] as &[&std::path::Path])
        .await
        .unwrap_err();

    match err {
        ClientError::ApiError { message } => assert_eq!(message, "무료 생성 횟수가 부족합니다."),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_download_pdf_returns_raw_bytes() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/problem/pdf");
        then.status(200)
            .header("Content-Type", "application/pdf")
            .body("%PDF-1.4 rendered");
    });

    let problems = vec![Problem {
        number: 1,
        content: "문제".to_string(),
        description: None,
        answer: "답".to_string(),
    }];

    let client = problem_client(&server);
    let bytes = client.download_pdf(&problems).await.unwrap();

    mock.assert();
    assert_eq!(bytes, b"%PDF-1.4 rendered");
}

#[test]
fn test_navigation_state_round_trip_through_result_url() {
    let problems = vec![
        Problem {
            number: 1,
            content: "내용 with &=?# and \"quotes\"".to_string(),
            description: Some("설명\n둘째 줄".to_string()),
            answer: "정답".to_string(),
        },
        Problem {
            number: 2,
            content: "plain".to_string(),
            description: None,
            answer: "42".to_string(),
        },
    ];
    let state = ResultState {
        problems,
        download_key: "dl-key".to_string(),
    };

    let base = Url::parse("https://improfessor.kro.kr").unwrap();
    let url = result_url(&base, &state).unwrap();
    assert_eq!(url.path(), "/result");

    let restored = decode_from_url(&url).unwrap();
    assert_eq!(restored, state);
}
