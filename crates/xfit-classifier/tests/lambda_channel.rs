//! AWS Lambda channel tests against a local mock endpoint.

use std::sync::Arc;

use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{future, ProvideCredentials};
use aws_credential_types::Credentials;
use aws_sdk_lambda::config::{Builder, Region};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xfit_classifier::{
    AwsLambdaChannel, ClassifierClient, ClassifierConfig, ClassifierError, InvocationChannel,
};
use xfit_models::encode_data_uri;

const INVOKE_PATH: &str = "/2015-03-31/functions/movinet_for_crossfit/invocations";

fn channel_for(server: &MockServer) -> AwsLambdaChannel {
    let credentials = Credentials::new("AKIDTEST", "test-secret", None, None, "test");

    let config = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(server.uri())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .build();

    AwsLambdaChannel::from_client(aws_sdk_lambda::Client::from_conf(config))
}

/// Provider chain with nothing configured.
#[derive(Debug)]
struct EmptyProviderChain;

impl ProvideCredentials for EmptyProviderChain {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::ready(Err(CredentialsError::not_loaded(
            "no credentials found in chain",
        )))
    }
}

fn client_for(server: &MockServer) -> ClassifierClient {
    ClassifierClient::new(Arc::new(channel_for(server)), ClassifierConfig::default())
}

#[tokio::test]
async fn test_invoke_returns_prediction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(body_json(serde_json::json!({ "video": "UVVKRA==" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "body": { "prediction": [["burpee", 0.8], ["deadlift", 0.1]] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = encode_data_uri("data:video/mp4;base64,QUJD").unwrap();
    let prediction = client_for(&server).classify(&message).await.unwrap();

    let cells: Vec<_> = prediction
        .iter()
        .map(|p| (p.label.as_str(), p.probability))
        .collect();
    assert_eq!(cells, vec![("burpee", 0.8), ("deadlift", 0.1)]);
}

#[tokio::test]
async fn test_invoke_reports_function_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Amz-Function-Error", "Unhandled")
                .set_body_json(serde_json::json!({
                    "errorMessage": "Incorrect padding",
                    "errorType": "Error"
                })),
        )
        .mount(&server)
        .await;

    let output = channel_for(&server)
        .invoke("movinet_for_crossfit", br#"{"video":"UVVKRA=="}"#.to_vec())
        .await
        .unwrap();
    assert_eq!(output.function_error.as_deref(), Some("Unhandled"));
    assert!(!output.is_success());

    let message = encode_data_uri("data:video/mp4;base64,QUJD").unwrap();
    let err = client_for(&server).classify(&message).await.unwrap_err();
    assert!(
        matches!(err, ClassifierError::FunctionError { ref message, .. } if message == "Incorrect padding"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_rejected_credentials_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-amzn-ErrorType", "UnrecognizedClientException")
                .set_body_json(serde_json::json!({
                    "message": "The security token included in the request is invalid."
                })),
        )
        .mount(&server)
        .await;

    let message = encode_data_uri("data:video/mp4;base64,QUJD").unwrap();
    let client = client_for(&server);

    let err = client.classify(&message).await.unwrap_err();
    assert!(err.is_credentials(), "unexpected error: {err:?}");

    let prediction = client.classify_or_sentinel(&message).await.unwrap();
    assert!(prediction.is_error_sentinel());
}

#[tokio::test]
async fn test_missing_function_is_invocation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-amzn-ErrorType", "ResourceNotFoundException")
                .set_body_json(serde_json::json!({
                    "Type": "User",
                    "Message": "Function not found: movinet_for_crossfit"
                })),
        )
        .mount(&server)
        .await;

    let message = encode_data_uri("data:video/mp4;base64,QUJD").unwrap();
    let err = client_for(&server).classify_or_sentinel(&message).await.unwrap_err();
    assert!(matches!(err, ClassifierError::Invocation(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_missing_credentials_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "body": { "prediction": [["burpee", 0.8]] }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let config = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(server.uri())
        .region(Region::new("us-east-1"))
        .credentials_provider(EmptyProviderChain)
        .retry_config(RetryConfig::disabled())
        .build();
    let channel = AwsLambdaChannel::from_client(aws_sdk_lambda::Client::from_conf(config));
    let client = ClassifierClient::new(Arc::new(channel), ClassifierConfig::default());

    let message = encode_data_uri("data:video/mp4;base64,QUJD").unwrap();
    let err = client.classify(&message).await.unwrap_err();
    assert!(matches!(err, ClassifierError::Credentials(_)), "unexpected error: {err:?}");

    let prediction = client.classify_or_sentinel(&message).await.unwrap();
    assert_eq!(prediction.len(), 5);
    assert!(prediction
        .iter()
        .all(|p| p.label == "ERROR" && p.probability == -1.0));
}
