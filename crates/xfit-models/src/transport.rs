//! Transport envelope sent to the remote classifier.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelResult;
use crate::upload::UploadPayload;

/// Number of payload characters included in debug logs.
const LOG_PREFIX_LEN: usize = 50;

/// Request body for the classifier function: `{"video": <string>}`.
///
/// `video` is base64 of the upload's base64 text. The remote function decodes
/// twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransportMessage {
    video: String,
}

impl TransportMessage {
    /// The double-encoded video string.
    pub fn video(&self) -> &str {
        &self.video
    }

    /// Serialize as UTF-8 JSON bytes.
    pub fn to_bytes(&self) -> ModelResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Size of the serialized body in bytes.
    pub fn payload_len(&self) -> usize {
        // `{"video":"` + `"}`
        self.video.len() + 12
    }
}

/// Encode an upload into a transport message.
pub fn encode(upload: &UploadPayload) -> TransportMessage {
    let message = TransportMessage {
        video: STANDARD.encode(upload.data().as_bytes()),
    };

    debug!(
        mime_type = upload.mime_type().unwrap_or("unknown"),
        payload_len = message.payload_len(),
        video_prefix = %&message.video[..message.video.len().min(LOG_PREFIX_LEN)],
        "Encoded upload for classifier"
    );

    message
}

/// Parse a data URI and encode it in one step.
pub fn encode_data_uri(contents: &str) -> ModelResult<TransportMessage> {
    let upload = UploadPayload::parse(contents)?;
    Ok(encode(&upload))
}
