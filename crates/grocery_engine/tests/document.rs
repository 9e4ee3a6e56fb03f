use grocery_engine::{
    decode_text, export_url, DocumentSettings, DocumentSource, FailureKind, ReqwestDocumentSource,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn export_url_replaces_edit_suffix() {
    assert_eq!(
        export_url("https://docs.google.com/document/d/abc/edit?usp=sharing"),
        "https://docs.google.com/document/d/abc/export?format=txt"
    );
    assert_eq!(
        export_url("https://docs.google.com/document/d/abc/"),
        "https://docs.google.com/document/d/abc/export?format=txt"
    );
}

#[test]
fn export_url_only_cuts_a_whole_edit_segment() {
    assert_eq!(
        export_url("https://example.com/editorial/d/abc"),
        "https://example.com/editorial/d/abc/export?format=txt"
    );
    assert_eq!(
        export_url("https://example.com/editorial/d/abc/edit#heading=h.1"),
        "https://example.com/editorial/d/abc/export?format=txt"
    );
    assert_eq!(
        export_url("https://docs.google.com/document/d/abc/edit/"),
        "https://docs.google.com/document/d/abc/export?format=txt"
    );
}

#[tokio::test]
async fn fetches_plain_text_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document/d/abc/export"))
        .and(query_param("format", "txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("\u{feff}1. Leche - 2 litros\n", "text/plain; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = ReqwestDocumentSource::new(DocumentSettings::default()).unwrap();
    let url = format!("{}/document/d/abc/edit", server.uri());
    let text = source.fetch_document(&url).await.expect("fetched");
    assert_eq!(text, "1. Leche - 2 litros\n");
}

#[tokio::test]
async fn missing_document_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = ReqwestDocumentSource::new(DocumentSettings::default()).unwrap();
    let err = source
        .fetch_document(&format!("{}/document/d/missing", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn oversized_document_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789A"))
        .mount(&server)
        .await;

    let source = ReqwestDocumentSource::new(DocumentSettings {
        max_bytes: 10,
        ..DocumentSettings::default()
    })
    .unwrap();
    let err = source
        .fetch_document(&format!("{}/document/d/big", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9";
    let decoded = decode_text(bytes, Some("text/plain; charset=ISO-8859-1")).unwrap();
    assert_eq!(decoded.text, "caf\u{e9}");
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_strips_utf8_bom() {
    let decoded = decode_text(b"\xEF\xBB\xBFhola", Some("text/plain")).unwrap();
    assert_eq!(decoded.text, "hola");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_rejects_invalid_utf8_when_declared() {
    assert!(decode_text(b"ab\xff\xfd", Some("text/plain; charset=utf-8")).is_err());
}
