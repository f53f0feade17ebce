//! Uploaded clip as delivered by the browser.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ModelError, ModelResult};

/// An uploaded clip in data URI form (`data:video/mp4;base64,<data>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    descriptor: String,
    data: String,
}

impl UploadPayload {
    /// Parse a data URI.
    ///
    /// Splits on the first comma. The remainder must be non-empty standard
    /// base64; anything else is rejected as a malformed upload.
    pub fn parse(contents: &str) -> ModelResult<Self> {
        let (descriptor, data) = contents
            .split_once(',')
            .ok_or_else(|| ModelError::malformed_upload("missing ',' separator in data URI"))?;

        if data.is_empty() {
            return Err(ModelError::malformed_upload("empty video payload"));
        }

        STANDARD
            .decode(data)
            .map_err(|e| ModelError::malformed_upload(format!("payload is not valid base64: {}", e)))?;

        Ok(Self {
            descriptor: descriptor.to_string(),
            data: data.to_string(),
        })
    }

    /// The MIME type inside the descriptor, if present.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.descriptor.strip_prefix("data:")?;
        let mime = rest.split(';').next()?;
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }

    /// Base64 payload text after the first comma.
    pub fn data(&self) -> &str {
        &self.data
    }
}
