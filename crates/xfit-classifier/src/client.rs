//! Movement classifier client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use xfit_models::{Prediction, TransportMessage};

use crate::channel::InvocationChannel;
use crate::error::{ClassifierError, ClassifierResult};
use crate::lambda::AwsLambdaChannel;
use crate::response::{function_error, parse_prediction};

/// Name of the deployed classifier function.
pub const DEFAULT_FUNCTION_NAME: &str = "movinet_for_crossfit";
/// Region the classifier function is deployed in.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Delay before the first retry; doubles per attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(500);
/// Upper bound on a single retry delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Configuration for the classifier client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Remote function name
    pub function_name: String,
    /// AWS region
    pub region: String,
    /// Endpoint override (local emulators, tests)
    pub endpoint_url: Option<String>,
    /// Bound on a single invocation
    pub timeout: Duration,
    /// Max retries for transport failures
    pub max_retries: u32,
    /// Substitute the `("ERROR", -1.0)` placeholder on credential failures
    pub legacy_sentinel: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            timeout: Duration::from_secs(60),
            max_retries: 1,
            legacy_sentinel: false,
        }
    }
}

impl ClassifierConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            function_name: std::env::var("CLASSIFIER_FUNCTION_NAME")
                .unwrap_or_else(|_| DEFAULT_FUNCTION_NAME.to_string()),
            region: std::env::var("CLASSIFIER_REGION")
                .or_else(|_| std::env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            endpoint_url: std::env::var("CLASSIFIER_ENDPOINT_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            timeout: Duration::from_secs(
                std::env::var("CLASSIFIER_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("CLASSIFIER_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            legacy_sentinel: std::env::var("CLASSIFIER_LEGACY_SENTINEL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Worst-case wall time of one `classify` call: every attempt times out
    /// and every retry waits its full backoff.
    pub fn invocation_budget(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        let ramp: Vec<Duration> = (0..self.max_retries)
            .map(backoff_delay)
            .take_while(|delay| *delay < MAX_BACKOFF)
            .collect();
        let capped = self.max_retries - ramp.len() as u32;
        let backoff = ramp
            .into_iter()
            .fold(Duration::ZERO, Duration::saturating_add)
            .saturating_add(MAX_BACKOFF.saturating_mul(capped));

        self.timeout.saturating_mul(attempts).saturating_add(backoff)
    }
}

/// Delay before retry number `attempt` (zero-based).
fn backoff_delay(attempt: u32) -> Duration {
    BASE_BACKOFF
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

/// Client for the remote movement classifier.
#[derive(Clone)]
pub struct ClassifierClient {
    channel: Arc<dyn InvocationChannel>,
    config: ClassifierConfig,
}

impl ClassifierClient {
    /// Create a client over any invocation channel.
    pub fn new(channel: Arc<dyn InvocationChannel>, config: ClassifierConfig) -> Self {
        Self { channel, config }
    }

    /// Create a client backed by AWS Lambda.
    pub async fn lambda(config: ClassifierConfig) -> Self {
        let channel = AwsLambdaChannel::new(&config).await;
        Self::new(Arc::new(channel), config)
    }

    /// Create an AWS Lambda backed client from environment variables.
    pub async fn from_env() -> Self {
        Self::lambda(ClassifierConfig::from_env()).await
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a clip.
    pub async fn classify(&self, message: &TransportMessage) -> ClassifierResult<Prediction> {
        let payload = message.to_bytes()?;
        info!(
            function = %self.config.function_name,
            payload_bytes = payload.len(),
            "Calling classifier"
        );

        let result = self.with_retry(|| self.invoke_once(payload.clone())).await;

        match &result {
            Ok(prediction) => info!("prediction: {}", prediction),
            Err(e) => warn!("Classifier call failed: {}", e),
        }

        result
    }

    /// Classify a clip, substituting [`Prediction::error_sentinel`] when the
    /// credentials are missing or rejected. Other failures still propagate.
    pub async fn classify_or_sentinel(&self, message: &TransportMessage) -> ClassifierResult<Prediction> {
        match self.classify(message).await {
            Err(ClassifierError::Credentials(e)) => {
                warn!("Credential errors when calling the classifier: {}", e);
                Ok(Prediction::error_sentinel())
            }
            other => other,
        }
    }

    /// Classify using the configured failure policy.
    pub async fn classify_with_policy(&self, message: &TransportMessage) -> ClassifierResult<Prediction> {
        if self.config.legacy_sentinel {
            self.classify_or_sentinel(message).await
        } else {
            self.classify(message).await
        }
    }

    async fn invoke_once(&self, payload: Vec<u8>) -> ClassifierResult<Prediction> {
        let output = tokio::time::timeout(
            self.config.timeout,
            self.channel.invoke(&self.config.function_name, payload),
        )
        .await
        .map_err(|_| ClassifierError::Timeout(self.config.timeout.as_secs()))??;

        if let Some(kind) = &output.function_error {
            return Err(function_error(kind, &output.payload));
        }

        if !output.is_success() {
            return Err(function_error(
                &format!("status {}", output.status_code),
                &output.payload,
            ));
        }

        parse_prediction(&output.payload)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> ClassifierResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ClassifierResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Classifier request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use xfit_models::encode_data_uri;

    use super::*;
    use crate::channel::InvocationOutput;

    /// Replays scripted results and records payloads.
    struct ScriptedChannel {
        results: Mutex<Vec<ClassifierResult<InvocationOutput>>>,
        calls: AtomicUsize,
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl ScriptedChannel {
        fn new(mut results: Vec<ClassifierResult<InvocationOutput>>) -> Arc<Self> {
            results.reverse();
            Arc::new(Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl InvocationChannel for ScriptedChannel {
        async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> ClassifierResult<InvocationOutput> {
            assert_eq!(function_name, DEFAULT_FUNCTION_NAME);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload);
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ClassifierError::invocation("no scripted result")))
        }
    }

    /// Never answers.
    struct HangingChannel;

    #[async_trait]
    impl InvocationChannel for HangingChannel {
        async fn invoke(&self, _function_name: &str, _payload: Vec<u8>) -> ClassifierResult<InvocationOutput> {
            std::future::pending().await
        }
    }

    fn message() -> TransportMessage {
        encode_data_uri("data:video/mp4;base64,QUJD").unwrap()
    }

    fn client(channel: Arc<dyn InvocationChannel>) -> ClassifierClient {
        ClassifierClient::new(channel, ClassifierConfig::default())
    }

    #[test]
    fn test_config_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.function_name, "movinet_for_crossfit");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.legacy_sentinel);
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(0), Duration::from_millis(500));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(6), MAX_BACKOFF);
        assert_eq!(backoff_delay(64), MAX_BACKOFF);
        assert_eq!(backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_invocation_budget() {
        let config = ClassifierConfig::default();
        // Two 60 s attempts and one 500 ms backoff.
        assert_eq!(config.invocation_budget(), Duration::from_millis(120_500));

        let config = ClassifierConfig {
            timeout: Duration::from_secs(10),
            max_retries: 8,
            ..Default::default()
        };
        // 0.5 + 1 + 2 + 4 + 8 + 16, then two capped 30 s waits.
        assert_eq!(
            config.invocation_budget(),
            Duration::from_secs(90) + Duration::from_millis(31_500) + Duration::from_secs(60)
        );

        let config = ClassifierConfig {
            max_retries: u32::MAX,
            ..Default::default()
        };
        assert!(config.invocation_budget() > Duration::from_secs(60 * 1_000_000));
    }

    #[tokio::test]
    async fn test_classify_sends_envelope_and_parses() {
        let channel = ScriptedChannel::new(vec![Ok(InvocationOutput::ok(
            r#"{"body": {"prediction": [["burpee", 0.8], ["deadlift", 0.1]]}}"#,
        ))]);
        let prediction = client(channel.clone()).classify(&message()).await.unwrap();

        assert_eq!(
            prediction,
            Prediction::from(vec![("burpee".to_string(), 0.8), ("deadlift".to_string(), 0.1)])
        );
        assert_eq!(
            channel.payloads.lock().unwrap()[0],
            br#"{"video":"UVVKRA=="}"#.to_vec()
        );
    }

    #[tokio::test]
    async fn test_credentials_error_is_tagged() {
        let channel = ScriptedChannel::new(vec![Err(ClassifierError::credentials("no credentials"))]);
        let err = client(channel.clone()).classify(&message()).await.unwrap_err();
        assert!(err.is_credentials());
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_legacy_sentinel_on_credentials() {
        let channel = ScriptedChannel::new(vec![Err(ClassifierError::credentials("no credentials"))]);
        let prediction = client(channel).classify_or_sentinel(&message()).await.unwrap();

        assert_eq!(prediction.len(), 5);
        assert!(prediction
            .iter()
            .all(|p| p.label == "ERROR" && p.probability == -1.0));
    }

    #[tokio::test]
    async fn test_legacy_sentinel_keeps_other_errors() {
        let channel = ScriptedChannel::new(vec![Err(ClassifierError::invocation("function not found"))]);
        let err = client(channel).classify_or_sentinel(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Invocation(_)));
    }

    #[tokio::test]
    async fn test_policy_follows_config() {
        let channel = ScriptedChannel::new(vec![Err(ClassifierError::credentials("expired"))]);
        let config = ClassifierConfig {
            legacy_sentinel: true,
            ..Default::default()
        };
        let prediction = ClassifierClient::new(channel, config)
            .classify_with_policy(&message())
            .await
            .unwrap();
        assert!(prediction.is_error_sentinel());
    }

    #[tokio::test]
    async fn test_function_error_is_reported() {
        let channel = ScriptedChannel::new(vec![Ok(InvocationOutput {
            status_code: 200,
            function_error: Some("Unhandled".to_string()),
            payload: br#"{"errorMessage": "out of memory"}"#.to_vec(),
        })]);
        let err = client(channel).classify(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::FunctionError { ref message, .. } if message == "out of memory"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let channel = ScriptedChannel::new(vec![Ok(InvocationOutput {
            status_code: 502,
            function_error: None,
            payload: b"bad gateway".to_vec(),
        })]);
        let err = client(channel).classify(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::FunctionError { ref kind, .. } if kind == "status 502"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_are_retried() {
        let channel = ScriptedChannel::new(vec![
            Err(ClassifierError::Network("connection reset".to_string())),
            Ok(InvocationOutput::ok(r#"{"prediction": [["ghd", 0.9]]}"#)),
        ]);
        let prediction = client(channel.clone()).classify(&message()).await.unwrap();
        assert_eq!(prediction.top().unwrap().label, "ghd");
        assert_eq!(channel.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_bounded() {
        let channel = ScriptedChannel::new(vec![
            Err(ClassifierError::Network("reset".to_string())),
            Err(ClassifierError::Network("reset".to_string())),
            Ok(InvocationOutput::ok(r#"{"prediction": []}"#)),
        ]);
        let err = client(channel.clone()).classify(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Network(_)));
        assert_eq!(channel.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_distinct() {
        let config = ClassifierConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let client = ClassifierClient::new(Arc::new(HangingChannel), config.clone());
        let err = client.classify(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Timeout(5)));

        // The sentinel path does not hide timeouts.
        let err = client.classify_or_sentinel(&message()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Timeout(5)));
    }
}
