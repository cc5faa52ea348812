//! HTTP-level tests for the Pinecone provider.
//!
//! These tests run the real `PineconeProvider` against a local `wiremock`
//! server to check request shape (paths, headers, body) and the mapping of
//! response statuses to `IndexProviderError` variants.

use std::time::Duration;

use index_provisioner_repository::pinecone::{API_KEY_HEADER, API_VERSION_HEADER};
use index_provisioner_repository::{
    IndexProvider, IndexProviderError, PineconeConfig, PineconeProvider,
};
use index_provisioner_shared::{Cloud, DeploymentSpec, IndexDescriptor, Metric};
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "pc-test-key";

fn provider_for(server: &MockServer) -> PineconeProvider {
    PineconeProvider::new(
        SecretString::from(TEST_KEY.to_string()),
        PineconeConfig::with_base_url(server.uri()).timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn index_model(name: &str, dimension: u32, metric: &str, ready: bool) -> Value {
    json!({
        "name": name,
        "dimension": dimension,
        "metric": metric,
        "host": format!("{}-abc123.svc.aped-4627-b74a.pinecone.io", name),
        "spec": {
            "serverless": {
                "cloud": "aws",
                "region": "us-east-1"
            }
        },
        "status": {
            "ready": ready,
            "state": if ready { "Ready" } else { "Initializing" }
        },
        "deletion_protection": "disabled"
    })
}

fn error_body(code: &str, message: &str, status: u16) -> Value {
    json!({
        "error": { "code": code, "message": message },
        "status": status
    })
}

#[tokio::test]
async fn test_list_indexes_sends_credential_and_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .and(header(API_KEY_HEADER, TEST_KEY))
        .and(header(API_VERSION_HEADER, "2024-07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indexes": [
                index_model("snaps-prod", 1536, "cosine", true),
                index_model("snaps-dev", 768, "dotproduct", false)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let indexes = provider_for(&server).list_indexes().await.unwrap();

    let names: Vec<&str> = indexes.iter().map(|index| index.name.as_str()).collect();
    assert_eq!(names, vec!["snaps-prod", "snaps-dev"]);
}

#[tokio::test]
async fn test_list_indexes_tolerates_unmodelled_indexes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indexes": [
                index_model("snaps-prod", 1536, "cosine", true),
                {
                    "name": "other-team",
                    "dimension": 384,
                    "metric": "hamming",
                    "host": "other-team-def456.svc.pinecone.io",
                    "spec": { "byoc": { "environment": "aws-us-east-1-b921" } },
                    "status": { "ready": true, "state": "Ready" },
                    "vector_type": "dense"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let indexes = provider_for(&server).list_indexes().await.unwrap();

    let names: Vec<&str> = indexes.iter().map(|index| index.name.as_str()).collect();
    assert_eq!(names, vec!["snaps-prod", "other-team"]);
}

#[tokio::test]
async fn test_list_indexes_empty_project() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "indexes": [] })))
        .mount(&server)
        .await;

    let indexes = provider_for(&server).list_indexes().await.unwrap();

    assert!(indexes.is_empty());
}

#[tokio::test]
async fn test_list_indexes_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            "UNAUTHENTICATED",
            "Invalid API Key",
            401,
        )))
        .mount(&server)
        .await;

    let result = provider_for(&server).list_indexes().await;

    assert_eq!(
        result,
        Err(IndexProviderError::unauthorized(
            "UNAUTHENTICATED: Invalid API Key"
        ))
    );
}

#[tokio::test]
async fn test_list_indexes_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = provider_for(&server).list_indexes().await;

    assert!(matches!(result, Err(IndexProviderError::ParseError(_))));
}

#[tokio::test]
async fn test_describe_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/snaps-prod"))
        .and(header(API_KEY_HEADER, TEST_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(index_model("snaps-prod", 1536, "cosine", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let description = provider_for(&server)
        .describe_index("snaps-prod")
        .await
        .unwrap();

    assert_eq!(description.dimension, Some(1536));
    assert_eq!(description.metric, Metric::Cosine);
    assert_eq!(
        description.spec,
        DeploymentSpec::serverless(Cloud::Aws, "us-east-1")
    );
}

#[tokio::test]
async fn test_describe_index_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            "NOT_FOUND",
            "Resource missing not found",
            404,
        )))
        .mount(&server)
        .await;

    let result = provider_for(&server).describe_index("missing").await;

    assert!(matches!(result, Err(IndexProviderError::NotFound(_))));
}

#[tokio::test]
async fn test_create_index_sends_exact_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(header(API_KEY_HEADER, TEST_KEY))
        .and(body_json(json!({
            "name": "snaps-prod",
            "dimension": 1536,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": "aws",
                    "region": "us-east-1"
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(index_model("snaps-prod", 1536, "cosine", false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = provider_for(&server)
        .create_index(&IndexDescriptor::snapconnect_default())
        .await
        .unwrap();

    assert_eq!(created.name, "snaps-prod");
    assert!(!created.status.ready);
    assert_eq!(created.status.state, "Initializing");
}

#[tokio::test]
async fn test_create_index_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(409).set_body_json(error_body(
            "ALREADY_EXISTS",
            "Resource snaps-prod already exists",
            409,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .create_index(&IndexDescriptor::snapconnect_default())
        .await;

    assert_eq!(
        result,
        Err(IndexProviderError::already_exists(
            "ALREADY_EXISTS: Resource snaps-prod already exists"
        ))
    );
}

#[tokio::test]
async fn test_create_index_quota_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body(
            "FORBIDDEN",
            "Request failed. You've reached the max serverless indexes allowed in project",
            403,
        )))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .create_index(&IndexDescriptor::snapconnect_default())
        .await;

    assert!(matches!(result, Err(IndexProviderError::Forbidden(_))));
}

#[tokio::test]
async fn test_create_index_server_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .create_index(&IndexDescriptor::snapconnect_default())
        .await;

    assert_eq!(result, Err(IndexProviderError::api(500, "internal error")));
}

#[tokio::test]
async fn test_connection_refused() {
    let provider = PineconeProvider::new(
        SecretString::from(TEST_KEY.to_string()),
        PineconeConfig::with_base_url("http://127.0.0.1:1").timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let result = provider.list_indexes().await;

    assert!(matches!(result, Err(IndexProviderError::ConnectionError(_))));
}
