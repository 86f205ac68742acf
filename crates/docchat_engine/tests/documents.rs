use docchat_engine::{DocumentListClient, ListError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn list_returns_document_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"documents": ["doc1.pdf", "notes.txt"], "status": "success"}
        })))
        .mount(&server)
        .await;

    let labels = DocumentListClient::new(server.uri())
        .list()
        .await
        .expect("list ok");
    assert_eq!(labels, vec!["doc1.pdf".to_string(), "notes.txt".to_string()]);
}

#[tokio::test]
async fn missing_data_yields_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let labels = DocumentListClient::new(server.uri())
        .list()
        .await
        .expect("list ok");
    assert!(labels.is_empty());
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = DocumentListClient::new(server.uri()).list().await.unwrap_err();
    assert!(matches!(err, ListError::Server(_)));
}
