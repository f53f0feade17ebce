//! AWS Lambda invocation channel.

use std::error::Error as StdError;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::operation::invoke::InvokeError;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client;
use aws_types::region::Region;
use tracing::debug;

use crate::channel::{InvocationChannel, InvocationOutput};
use crate::client::ClassifierConfig;
use crate::error::{ClassifierError, ClassifierResult};

/// Service error codes that mean the caller's identity was rejected.
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "SignatureDoesNotMatch",
    "IncompleteSignature",
    "MissingAuthenticationToken",
    "MissingAuthenticationTokenException",
    "ExpiredToken",
    "ExpiredTokenException",
    "InvalidClientTokenId",
    "AccessDeniedException",
];

/// Invokes functions through the AWS Lambda API.
#[derive(Clone)]
pub struct AwsLambdaChannel {
    client: Client,
}

impl AwsLambdaChannel {
    /// Build a channel using the default AWS credential provider chain.
    pub async fn new(config: &ClassifierConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            // Retries are driven by `ClassifierClient`.
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        Self {
            client: Client::new(&sdk_config),
        }
    }

    /// Wrap an already configured Lambda client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InvocationChannel for AwsLambdaChannel {
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> ClassifierResult<InvocationOutput> {
        debug!("Invoking {} with {} bytes", function_name, payload.len());

        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(InvocationOutput {
            status_code: output.status_code(),
            function_error: output.function_error().map(str::to_string),
            payload: output
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default(),
        })
    }
}

fn map_sdk_error(err: SdkError<InvokeError>) -> ClassifierError {
    let message = DisplayErrorContext(&err).to_string();

    if is_credentials_failure(&err, &message) {
        return ClassifierError::Credentials(message);
    }

    match err {
        SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => ClassifierError::Network(message),
        SdkError::TimeoutError(_) => ClassifierError::Network(message),
        _ => ClassifierError::Invocation(message),
    }
}

fn is_credentials_failure(err: &SdkError<InvokeError>, message: &str) -> bool {
    if let Some(code) = err.code() {
        if CREDENTIAL_ERROR_CODES.contains(&code) {
            return true;
        }
    }

    // Provider chain failures are wrapped a few layers deep.
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(inner) = source {
        if inner.downcast_ref::<CredentialsError>().is_some() {
            return true;
        }
        source = inner.source();
    }

    let lower = message.to_lowercase();
    lower.contains("no credentials") || lower.contains("failed to load credentials")
}
