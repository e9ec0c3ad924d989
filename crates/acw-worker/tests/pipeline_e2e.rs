//! End-to-end invocations against mocked vendor endpoints.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use acw_models::{ImsAuth, InvocationParams, MetricsSink, Rendition, SourceAsset, WorkerKind};
use acw_storage::MockFileStore;
use acw_vendor::{HttpConfig, PollConfig};
use acw_worker::{ErrorKind, InvocationRequest, RenditionExecutor, WorkerConfig};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY_PEM: &str = include_str!("fixtures/test_rsa_key.pem");

#[derive(Default)]
struct Recorder(Mutex<Vec<(String, f64)>>);

impl MetricsSink for Recorder {
    fn add(&self, name: &str, value: f64) {
        self.0.lock().unwrap().push((name.to_string(), value));
    }
}

impl Recorder {
    fn names(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }
}

fn ims_params() -> InvocationParams {
    InvocationParams {
        auth: Some(ImsAuth {
            org_id: Some("org@AdobeOrg".into()),
            client_id: Some("client".into()),
            access_token: Some("token".into()),
        }),
        ..InvocationParams::default()
    }
}

fn azure_params(endpoint: &str) -> InvocationParams {
    InvocationParams {
        azure_ocp_key: Some("azure-key".into()),
        azure_ocp_endpoint: Some(endpoint.to_string()),
        ..InvocationParams::default()
    }
}

fn doc_cloud_params() -> InvocationParams {
    InvocationParams {
        doc_cloud_client_id: Some("pdf-client".into()),
        doc_cloud_client_secret: Some("pdf-secret".into()),
        doc_cloud_private_key: Some(STANDARD.encode(TEST_KEY_PEM)),
        doc_cloud_org_id: Some("pdf-org@AdobeOrg".into()),
        doc_cloud_account_id: Some("pdf-account@techacct.adobe.com".into()),
        ..InvocationParams::default()
    }
}

fn local_source(dir: &TempDir, name: &str, content: &[u8]) -> SourceAsset {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    SourceAsset {
        path: Some(path),
        url: None,
        name: name.to_string(),
    }
}

fn remote_source(url: &str) -> SourceAsset {
    SourceAsset {
        path: None,
        url: Some(url.to_string()),
        name: "remote.jpg".into(),
    }
}

fn request(
    worker: WorkerKind,
    source: SourceAsset,
    rendition: Rendition,
    params: InvocationParams,
) -> InvocationRequest {
    InvocationRequest {
        worker,
        source,
        rendition,
        params,
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn color_response() -> Value {
    json!({
        "cas_responses": [{"status": 200, "result": {"response_type": "feature", "response": [
            {"feature_name": "color", "feature_value": [
                {"feature_name": "", "feature_value": "Gray,0.2,128,128,128"},
                {"feature_name": "", "feature_value": "Purple,0.9,169,9,254"},
                {"feature_name": "", "feature_value": "Navy,0.5,0,0,128"}
            ]}
        ]}}]
    })
}

// =============================================================================
// Azure tagging
// =============================================================================

#[tokio::test]
async fn test_tagging_writes_sorted_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vision/v3.0/analyze"))
        .and(query_param("language", "en"))
        .and(header("Ocp-Apim-Subscription-Key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [
                {"name": "abstract_", "score": 0.2},
                {"name": "animal_cat", "score": 0.9, "detail": {"landmarks": []}},
                {"name": "outdoor_", "score": 0.5}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let recorder = Arc::new(Recorder::default());
    let out = dir.path().join("rendition.json");
    let req = request(
        WorkerKind::AzureTagging,
        remote_source("https://assets/cat.jpg"),
        Rendition::new(&out),
        azure_params(&server.uri()).with_metrics(recorder.clone()),
    );

    let outcome = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap();
    assert_eq!(outcome.worker, WorkerKind::AzureTagging);

    let text = read(&out);
    assert!(text.starts_with("[\n {\n  \""));
    let written: Vec<Value> = serde_json::from_str(&text).unwrap();
    let names: Vec<&str> = written.iter().filter_map(|c| c["name"].as_str()).collect();
    assert_eq!(names, ["animal_cat", "outdoor_", "abstract_"]);
    assert_eq!(written[0]["detail"], json!({"landmarks": []}));
    assert_eq!(recorder.names(), ["azureApiDuration"]);
}

#[tokio::test]
async fn test_tagging_missing_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let params = InvocationParams {
        azure_ocp_endpoint: Some(server.uri()),
        ..InvocationParams::default()
    };
    let req = request(
        WorkerKind::AzureTagging,
        remote_source("https://assets/cat.jpg"),
        Rendition::new(&out),
        params,
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.to_string(), "Please provide the subscription key");
    assert!(!out.exists());
}

#[tokio::test]
async fn test_tagging_vendor_code_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vision/v3.0/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "InvalidImageUrl",
            "message": "Image URL is badly formatted."
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let req = request(
        WorkerKind::AzureTagging,
        remote_source("https://assets/cat.jpg"),
        Rendition::new(&out),
        azure_params(&server.uri()),
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Vendor);
    assert_eq!(err.vendor_code(), Some("InvalidImageUrl"));
    assert!(err.to_string().contains("InvalidImageUrl"));

    let envelope = serde_json::to_value(err.envelope()).unwrap();
    assert_eq!(envelope["kind"], "vendor");
    assert_eq!(envelope["code"], "InvalidImageUrl");
}

#[tokio::test]
async fn test_tagging_skips_unnamed_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vision/v3.0/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [{"score": 0.5}, {"name": "outdoor_", "score": 0.3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let req = request(
        WorkerKind::AzureTagging,
        remote_source("https://assets/cat.jpg"),
        Rendition::new(&out),
        azure_params(&server.uri()),
    );

    RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap();

    let written: Vec<Value> = serde_json::from_str(&read(&out)).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0]["name"], "outdoor_");
}

#[tokio::test]
async fn test_tagging_timeout_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"categories": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let config = WorkerConfig {
        http: HttpConfig {
            timeout: Duration::from_millis(200),
            connect_timeout: Duration::from_millis(200),
        },
        ..WorkerConfig::default()
    };
    let req = request(
        WorkerKind::AzureTagging,
        remote_source("https://assets/cat.jpg"),
        Rendition::new(&out),
        azure_params(&server.uri()),
    );

    let err = RenditionExecutor::new(config).execute(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.vendor_code().is_none());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_tagging_requires_source_url() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let req = request(
        WorkerKind::AzureTagging,
        SourceAsset::default(),
        Rendition::new(&out),
        azure_params("http://127.0.0.1:9"),
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceInvalid);
}

// =============================================================================
// Sensei colour and entities
// =============================================================================

#[tokio::test]
async fn test_color_writes_sorted_xmp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header("authorization", "Bearer token"))
        .and(header("x-api-key", "client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(color_response()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let rendition = Rendition::new(&out)
        .with_instruction("CCAI_ENDPOINT", format!("{}/predict", server.uri()));
    let req = request(
        WorkerKind::CcaiColor,
        local_source(&dir, "photo.png", b"not really a png"),
        rendition,
        ims_params(),
    );

    RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap();

    let xml = read(&out);
    assert!(xml.contains("xmlns:ccai=\"https://example.com/schema/ccai\""));
    let purple = xml.find("<rdf:li>Purple</rdf:li>").unwrap();
    let navy = xml.find("<rdf:li>Navy</rdf:li>").unwrap();
    let gray = xml.find("<rdf:li>Gray</rdf:li>").unwrap();
    assert!(purple < navy && navy < gray);
    assert!(xml.contains("<rdf:li>#a909fe</rdf:li>"));
    assert!(xml.contains("<rdf:li>90%</rdf:li>"));
}

#[tokio::test]
async fn test_color_unfamiliar_document_writes_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cas_responses": [{"status": 200, "result": {
                "response_type": "classification",
                "response": {"labels": ["x"]}
            }}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let rendition = Rendition::new(&out).with_instruction("CCAI_ENDPOINT", server.uri());
    let req = request(
        WorkerKind::CcaiColor,
        local_source(&dir, "photo.png", b"bytes"),
        rendition,
        ims_params(),
    );

    RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap();

    let xml = read(&out);
    assert!(xml.contains("ccai:colorNames"));
    assert!(!xml.contains("<rdf:li>"));
}

#[tokio::test]
async fn test_color_unreachable_endpoint_is_transport() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/predict", closed.local_addr().unwrap());
    drop(closed);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let rendition = Rendition::new(&out).with_instruction("CCAI_ENDPOINT", endpoint);
    let req = request(
        WorkerKind::CcaiColor,
        local_source(&dir, "photo.png", b"bytes"),
        rendition,
        ims_params(),
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.envelope().kind, ErrorKind::Transport);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_color_empty_source_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(color_response()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let rendition = Rendition::new(&out).with_instruction("CCAI_ENDPOINT", server.uri());
    let req = request(
        WorkerKind::CcaiColor,
        local_source(&dir, "empty.png", b""),
        rendition,
        ims_params(),
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceInvalid);
    assert_eq!(err.to_string(), "Source file is empty.");
    assert!(!out.exists());
}

#[tokio::test]
async fn test_color_missing_token_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(color_response()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let rendition = Rendition::new(&out).with_instruction("CCAI_ENDPOINT", server.uri());
    let params = InvocationParams {
        auth: Some(ImsAuth {
            client_id: Some("client".into()),
            ..ImsAuth::default()
        }),
        ..InvocationParams::default()
    };
    let req = request(
        WorkerKind::CcaiColor,
        local_source(&dir, "photo.png", b"bytes"),
        rendition,
        params,
    );

    let err = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("accessToken"));
}

#[tokio::test]
async fn test_entities_in_test_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cas_responses": [{"status": 200, "result": {"response_type": "feature", "response": [
                {"feature_name": "abc123", "feature_value": [
                    {"feature_name": "labels", "feature_value": [
                        {"feature_name": "Adobe", "feature_value": [
                            {"feature_name": "type", "feature_value": "ORG"},
                            {"feature_name": "score", "feature_value": 0.4}
                        ]},
                        {"feature_name": "San Jose", "feature_value": [
                            {"feature_name": "type", "feature_value": "GPE"},
                            {"feature_name": "score", "feature_value": 0.8}
                        ]}
                    ]}
                ]}
            ]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.xmp");
    let config = WorkerConfig {
        sensei_endpoint: format!("{}/predict", server.uri()),
        ..WorkerConfig::test()
    };
    let req = request(
        WorkerKind::CcaiEntities,
        local_source(&dir, "doc.pdf", b"%PDF-1.4"),
        Rendition::new(&out),
        InvocationParams::default(),
    );

    RenditionExecutor::new(config).execute(&req).await.unwrap();

    let xml = read(&out);
    let first = xml.find("<rdf:li>GPE: San Jose</rdf:li>").unwrap();
    let second = xml.find("<rdf:li>ORG: Adobe</rdf:li>").unwrap();
    assert!(first < second);
    assert!(xml.contains("<ccai:entityLocation>"));
    assert!(xml.contains("<ccai:score>0.8</ccai:score>"));
}

// =============================================================================
// PDF Services
// =============================================================================

#[tokio::test]
async fn test_pdf_properties_written_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operation/pdfProperties"))
        .and(header("x-api-key", "pdf-client"))
        .and(header("x-gw-ims-org-id", "pdf-org@AdobeOrg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document": {"page_count": 2, "pdf_version": "1.6"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let config = WorkerConfig {
        pdf_services_endpoint: server.uri(),
        ..WorkerConfig::default()
    };
    let req = request(
        WorkerKind::PdfServices,
        local_source(&dir, "doc.pdf", b"%PDF-1.4"),
        Rendition::new(&out),
        doc_cloud_params(),
    );

    RenditionExecutor::new(config).execute(&req).await.unwrap();
    assert_eq!(read(&out), r#"{"document":{"page_count":2,"pdf_version":"1.6"}}"#);
}

#[tokio::test]
async fn test_pdf_compress_written_as_binary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operation/compressPDF"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-small".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.pdf");
    let config = WorkerConfig {
        pdf_services_endpoint: server.uri(),
        ..WorkerConfig::default()
    };
    let req = request(
        WorkerKind::PdfServices,
        local_source(&dir, "doc.pdf", b"%PDF-1.4 large"),
        Rendition::new(&out).with_instruction("operation", "compressPDF"),
        doc_cloud_params(),
    );

    let outcome = RenditionExecutor::new(config).execute(&req).await.unwrap();
    assert_eq!(outcome.bytes_written, 10);
    assert_eq!(std::fs::read(&out).unwrap(), b"%PDF-small");
}

#[tokio::test]
async fn test_pdf_corrupt_document_is_source_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operation/pdfProperties"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "CORRUPT_DOCUMENT", "message": "Input file is corrupted"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let config = WorkerConfig {
        pdf_services_endpoint: server.uri(),
        ..WorkerConfig::default()
    };
    let req = request(
        WorkerKind::PdfServices,
        local_source(&dir, "doc.pdf", b"garbage"),
        Rendition::new(&out),
        doc_cloud_params(),
    );

    let err = RenditionExecutor::new(config).execute(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceInvalid);
    assert!(err.to_string().contains("CORRUPT_DOCUMENT"));
}

#[tokio::test]
async fn test_pdf_missing_account_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.json");
    let config = WorkerConfig {
        pdf_services_endpoint: server.uri(),
        ..WorkerConfig::default()
    };
    let params = InvocationParams {
        doc_cloud_org_id: None,
        ..doc_cloud_params()
    };
    let req = request(
        WorkerKind::PdfServices,
        local_source(&dir, "doc.pdf", b"%PDF-1.4"),
        Rendition::new(&out),
        params,
    );

    let err = RenditionExecutor::new(config).execute(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("docCloudOrgId"));
}

// =============================================================================
// Photoshop actions
// =============================================================================

fn photoshop_config(server: &MockServer) -> WorkerConfig {
    WorkerConfig {
        photoshop_endpoint: server.uri(),
        photoshop_poll: PollConfig {
            interval: Duration::from_millis(5),
            max_polls: 3,
        },
        ..WorkerConfig::test()
    }
}

async fn mount_photoshop_job(server: &MockServer, final_status: Value) {
    Mock::given(method("POST"))
        .and(path("/pie/psdService/photoshopActions"))
        .and(header("x-gw-ims-org-id", "test-ims-org-id"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "_links": {"self": {"href": format!("{}/pie/psdService/status/job-1", server.uri())}}
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pie/psdService/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(final_status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_photoshop_copies_and_deletes_staged_output() {
    let server = MockServer::start().await;
    mount_photoshop_job(
        &server,
        json!({"jobId": "job-1", "outputs": [{"status": "succeeded"}]}),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.jpg");
    let store = Arc::new(MockFileStore::new());
    let req = request(
        WorkerKind::PhotoshopActions,
        remote_source("https://assets/source.psd"),
        Rendition::new(&out).with_instruction("photoshopAction", "https://actions/sepia.atn"),
        InvocationParams::default(),
    );

    RenditionExecutor::new(photoshop_config(&server))
        .with_file_store(store.clone())
        .execute(&req)
        .await
        .unwrap();

    assert_eq!(read(&out), acw_storage::mock::MOCK_CONTENT);
    let deleted = store.deleted_keys();
    assert_eq!(deleted.len(), 1);
    assert!(deleted[0].starts_with("output/"));
    assert!(deleted[0].ends_with("/rendition.jpg"));
}

#[tokio::test]
async fn test_photoshop_failure_propagates_and_cleans_up() {
    let server = MockServer::start().await;
    mount_photoshop_job(
        &server,
        json!({"outputs": [{"status": "failed", "errors": {"code": "400", "title": "bad action"}}]}),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.jpg");
    let store = Arc::new(MockFileStore::new());
    let req = request(
        WorkerKind::PhotoshopActions,
        remote_source("https://assets/source.psd"),
        Rendition::new(&out).with_instruction("photoshopAction", "https://actions/sepia.atn"),
        InvocationParams::default(),
    );

    let err = RenditionExecutor::new(photoshop_config(&server))
        .with_file_store(store.clone())
        .execute(&req)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Vendor);
    assert_eq!(err.vendor_code(), Some("400"));
    assert!(!out.exists());
    assert_eq!(store.deleted_keys().len(), 1);
}

#[tokio::test]
async fn test_photoshop_requires_org_outside_test_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.jpg");
    let config = WorkerConfig {
        test_mode: acw_worker::TestMode::Disabled,
        ..photoshop_config(&server)
    };
    let params = InvocationParams {
        auth: Some(ImsAuth {
            org_id: None,
            client_id: Some("client".into()),
            access_token: Some("token".into()),
        }),
        ..InvocationParams::default()
    };
    let req = request(
        WorkerKind::PhotoshopActions,
        remote_source("https://assets/source.psd"),
        Rendition::new(&out).with_instruction("photoshopAction", "https://actions/sepia.atn"),
        params,
    );

    let err = RenditionExecutor::new(config)
        .with_file_store(Arc::new(MockFileStore::new()))
        .execute(&req)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("orgId"));
}

// =============================================================================
// Animal pictures and metadata
// =============================================================================

#[tokio::test]
async fn test_animal_cat_downloads_configured_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pictures/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"meow".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.jpg");
    let mut config = WorkerConfig::default();
    config.animal_urls.cat = Some(format!("{}/pictures/cat.jpg", server.uri()));

    // The source path does not exist; the worker must never read it.
    let source = SourceAsset {
        path: Some(dir.path().join("never-downloaded.bin")),
        url: None,
        name: "never-downloaded.bin".into(),
    };
    let recorder = Arc::new(Recorder::default());
    let req = request(
        WorkerKind::AnimalPictures,
        source,
        Rendition::new(&out).with_instruction("animal", "cat"),
        InvocationParams::default().with_metrics(recorder.clone()),
    );

    RenditionExecutor::new(config).execute(&req).await.unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), b"meow");
    assert_eq!(recorder.names(), ["animalDownloadDuration"]);
}

#[tokio::test]
async fn test_animal_download_failure_is_vendor_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendition.jpg");
    let mut config = WorkerConfig::default();
    config.animal_urls.dog = Some(format!("{}/pictures/dog.jpg", server.uri()));
    let req = request(
        WorkerKind::AnimalPictures,
        SourceAsset::default(),
        Rendition::new(&out).with_instruction("animal", "dog"),
        InvocationParams::default(),
    );

    let err = RenditionExecutor::new(config).execute(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Vendor);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_metadata_from_invocation_document() {
    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("picture.png");
    std::fs::write(&source_path, b"0123456789").unwrap();
    let out = dir.path().join("rendition.xmp");

    let req: InvocationRequest = serde_json::from_value(json!({
        "worker": "metadata",
        "source": {"path": source_path, "name": "picture.png"},
        "rendition": {"path": out, "instructions": {"animal": "elephant"}}
    }))
    .unwrap();

    let outcome = RenditionExecutor::new(WorkerConfig::default())
        .execute(&req)
        .await
        .unwrap();
    assert_eq!(outcome.stages.len(), 7);

    let xml = read(&out);
    assert!(xml.contains("<ns1:filesize>10</ns1:filesize>"));
    assert!(xml.contains("<ns1:requestedAnimal>elephant</ns1:requestedAnimal>"));
}
