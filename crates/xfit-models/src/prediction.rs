//! Ranked classifier output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used by the legacy error sentinel.
pub const SENTINEL_LABEL: &str = "ERROR";
/// Probability used by the legacy error sentinel.
pub const SENTINEL_PROBABILITY: f64 = -1.0;
/// Number of entries in the legacy error sentinel.
pub const SENTINEL_LEN: usize = 5;

/// One `(label, probability)` entry of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePair")]
pub struct LabelProbability {
    pub label: String,
    pub probability: f64,
}

/// Wire forms accepted from the remote function.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePair {
    Pair(String, f64),
    Object { label: String, probability: f64 },
}

impl From<WirePair> for LabelProbability {
    fn from(wire: WirePair) -> Self {
        match wire {
            WirePair::Pair(label, probability) | WirePair::Object { label, probability } => {
                Self { label, probability }
            }
        }
    }
}

impl LabelProbability {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Ordered list of label/probability pairs as ranked by the remote model.
///
/// Order is preserved exactly as received. Labels may repeat.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(Vec<LabelProbability>);

impl Prediction {
    pub fn new(entries: Vec<LabelProbability>) -> Self {
        Self(entries)
    }

    /// The five-entry `("ERROR", -1.0)` placeholder returned by the legacy
    /// credential-failure path.
    pub fn error_sentinel() -> Self {
        Self(vec![
            LabelProbability::new(SENTINEL_LABEL, SENTINEL_PROBABILITY);
            SENTINEL_LEN
        ])
    }

    /// Whether this prediction is the legacy error sentinel.
    pub fn is_error_sentinel(&self) -> bool {
        self.0.len() == SENTINEL_LEN
            && self
                .0
                .iter()
                .all(|p| p.label == SENTINEL_LABEL && p.probability == SENTINEL_PROBABILITY)
    }

    pub fn entries(&self) -> &[LabelProbability] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelProbability> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First (highest ranked) entry.
    pub fn top(&self) -> Option<&LabelProbability> {
        self.0.first()
    }
}

impl From<Vec<(String, f64)>> for Prediction {
    fn from(pairs: Vec<(String, f64)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(label, probability)| LabelProbability { label, probability })
                .collect(),
        )
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", entry.label, format_probability(entry.probability))?;
        }
        write!(f, "]")
    }
}

/// Shortest decimal text that round-trips the probability (`-1.0`, `0.92`).
pub fn format_probability(probability: f64) -> String {
    serde_json::Number::from_f64(probability)
        .map(|n| n.to_string())
        .unwrap_or_else(|| probability.to_string())
}
