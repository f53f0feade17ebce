//! Application state.

use std::sync::Arc;

use anyhow::Context;
use xfit_classifier::ClassifierClient;
use xfit_models::{ExampleCatalog, LabelSet};

use crate::config::ApiConfig;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub classifier: ClassifierClient,
    pub labels: Arc<LabelSet>,
    pub examples: ExampleCatalog,
}

impl AppState {
    /// Create application state: load labels, configure the classifier.
    ///
    /// Fails when the label file is missing or empty.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let labels = LabelSet::load(&config.labels_path)
            .with_context(|| format!("loading labels from {}", config.labels_path.display()))?;

        let classifier = ClassifierClient::from_env().await;

        Ok(Self::with_classifier(config, labels, classifier))
    }

    /// Assemble state from already built parts.
    pub fn with_classifier(config: ApiConfig, labels: LabelSet, classifier: ClassifierClient) -> Self {
        Self {
            config,
            classifier,
            labels: Arc::new(labels),
            examples: ExampleCatalog::new(),
        }
    }
}
