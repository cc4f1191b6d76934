//! HTTP-level tests for the Gemini backend client against a mock server.

use std::time::Duration;
use studyforge_gen::backends::gemini::GeminiClient;
use studyforge_gen::{
    classify, Credential, CredentialPool, FailureKind, GenerateOptions, GenerateRequest,
    GenerativeBackend, KeyFormat,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credential() -> Credential {
    let key = format!("AIza{}", "t".repeat(35));
    CredentialPool::from_sources(&[key], &KeyFormat::default()).pick()
}

fn request() -> GenerateRequest {
    GenerateRequest {
        prompt: "Explain photosynthesis.".to_string(),
        system: "Plain text only.".to_string(),
        options: GenerateOptions::default(),
    }
}

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(server.uri(), Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn success_returns_candidate_text() {
    let server = MockServer::start().await;
    let credential = test_credential();

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", credential.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Plants convert light into sugar." }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .generate(&credential, "gemini-2.5-flash", &request())
        .await
        .expect("generation succeeds");
    assert_eq!(text, "Plants convert light into sugar.");
}

#[tokio::test]
async fn quota_error_classifies_as_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate(&test_credential(), "gemini-2.5-flash", &request())
        .await
        .expect_err("429 must fail");
    assert_eq!(classify(&err), FailureKind::RateLimited);
    assert!(err.to_string().contains("exhausted"));
}

#[tokio::test]
async fn invalid_key_classifies_as_credential_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate(&test_credential(), "gemini-2.5-flash", &request())
        .await
        .expect_err("bad key must fail");
    assert_eq!(classify(&err), FailureKind::CredentialInvalid);
}

#[tokio::test]
async fn unknown_model_classifies_as_model_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-99:generateContent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": 404,
                "message": "models/gemini-99 is not found for API version v1beta",
                "status": "NOT_FOUND"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate(&test_credential(), "gemini-99", &request())
        .await
        .expect_err("unknown model must fail");
    assert_eq!(classify(&err), FailureKind::ModelUnavailable);
}
