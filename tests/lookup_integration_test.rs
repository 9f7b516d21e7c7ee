use httpmock::prelude::*;
use improfessor_client::core::api::ApiClient;
use improfessor_client::domain::ports::UniversityRegistry;
use improfessor_client::{ClientError, LookupClient};
use std::sync::Arc;

fn lookup_client(server: &MockServer) -> LookupClient {
    let api = Arc::new(ApiClient::new(&server.base_url(), 5).unwrap());
    LookupClient::new(api)
}

fn registry_xml(items: &str) -> String {
    format!(
        "<response><header><resultCode>00</resultCode><resultMsg>SUCCESS</resultMsg></header><body><items>{}</items></body></response>",
        items
    )
}

#[tokio::test]
async fn test_university_search_parses_items() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/university")
            .query_param("type", "university")
            .query_param("keyword", "한국")
            .query_param("page", "1");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(registry_xml(
                "<item><schlNm>한국대학교</schlNm><schlId>0001</schlId><schlKndNm>대학(4년제)</schlKndNm><mjrAreaNm>서울</mjrAreaNm></item>\
                 <item><schlNm>한국전문대학</schlNm><schlId>0002</schlId><schlKndNm>전문대학</schlKndNm><mjrAreaNm>경기</mjrAreaNm></item>",
            ));
    });

    let client = lookup_client(&server);
    let universities = client.search_universities("한국", 1).await.unwrap();

    mock.assert();
    assert_eq!(universities.len(), 2);
    assert_eq!(universities[0].name, "한국대학교");
    assert_eq!(universities[0].id, "0001");
    assert_eq!(universities[1].kind, "전문대학");
}

#[tokio::test]
async fn test_university_search_dedupes_by_id() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/university");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(registry_xml(
                "<item><schlNm>본교</schlNm><schlId>0001</schlId><schlKndNm>대학</schlKndNm><mjrAreaNm>서울</mjrAreaNm></item>\
                 <item><schlNm>분교</schlNm><schlId>0001</schlId><schlKndNm>대학</schlKndNm><mjrAreaNm>세종</mjrAreaNm></item>",
            ));
    });

    let client = lookup_client(&server);
    let universities = client.search_universities("본교", 1).await.unwrap();

    assert_eq!(universities.len(), 1);
    assert_eq!(universities[0].name, "본교");
    assert_eq!(universities[0].region, "서울");
}

#[tokio::test]
async fn test_result_code_99_surfaces_upstream_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/university");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body("<response><header><resultCode>99</resultCode><resultMsg>quota exceeded</resultMsg></header></response>");
    });

    let client = lookup_client(&server);
    let err = client.search_universities("한국", 1).await.unwrap_err();

    match err {
        ClientError::LookupError { message } => assert_eq!(message, "quota exceeded"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_xml_is_a_parse_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/university");
        then.status(200).body("<response><item>");
    });

    let client = lookup_client(&server);
    let err = client.search_universities("한국", 1).await.unwrap_err();
    assert!(matches!(err, ClientError::XmlError(_)));
}

#[tokio::test]
async fn test_major_search_with_blank_university_makes_no_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/university");
        then.status(200).body(registry_xml(""));
    });

    let client = lookup_client(&server);
    let majors = client.search_majors("", "eng", 1).await.unwrap();

    assert!(majors.is_empty());
    mock.assert_hits(0);
}

#[tokio::test]
async fn test_major_search_filters_by_keyword_client_side() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/university")
            .query_param("type", "major")
            .query_param("universityId", "0001")
            .query_param("page", "1");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(registry_xml(
                "<item><korMjrNm>Engineering</korMjrNm><kediMjrId>m1</kediMjrId><clgNm>공과대학</clgNm><pbnfDgriCrseDivNm>학사</pbnfDgriCrseDivNm><lsnTrmNm>4년</lsnTrmNm></item>\
                 <item><korMjrNm>English</korMjrNm><kediMjrId>m2</kediMjrId><clgNm>인문대학</clgNm><pbnfDgriCrseDivNm>학사</pbnfDgriCrseDivNm><lsnTrmNm>4년</lsnTrmNm></item>\
                 <item><korMjrNm>Biology</korMjrNm><kediMjrId>m3</kediMjrId><clgNm>자연과학대학</clgNm><pbnfDgriCrseDivNm>학사</pbnfDgriCrseDivNm><lsnTrmNm>4년</lsnTrmNm></item>",
            ));
    });

    let client = lookup_client(&server);
    let majors = client.search_majors("0001", "eng", 1).await.unwrap();

    mock.assert();
    let names: Vec<&str> = majors.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Engineering", "English"]);
}

#[tokio::test]
async fn test_major_search_empty_keyword_returns_full_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/university");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(registry_xml(
                "<item><korMjrNm>컴퓨터공학과</korMjrNm><kediMjrId>m1</kediMjrId><clgNm>공과대학</clgNm><pbnfDgriCrseDivNm>학사</pbnfDgriCrseDivNm><lsnTrmNm>4년</lsnTrmNm></item>\
                 <item><korMjrNm>영어영문학과</korMjrNm><kediMjrId>m2</kediMjrId><clgNm>인문대학</clgNm><pbnfDgriCrseDivNm>학사</pbnfDgriCrseDivNm><lsnTrmNm>4년</lsnTrmNm></item>",
            ));
    });

    let client = lookup_client(&server);
    let majors = client.search_majors("0001", "", 1).await.unwrap();
    assert_eq!(majors.len(), 2);
}
