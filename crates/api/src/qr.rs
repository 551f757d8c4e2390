//! QR encoder collaborator.
//!
//! Locker codes are rendered to QR images by an external service; the
//! application only stores the resulting image URL. The trait keeps the
//! seam mockable for tests, and lets the import reconciler render every
//! QR up front, outside its merge transaction.

use async_trait::async_trait;

use lockbase_core::error::CoreError;

/// Renders a locker code into a QR image URL. May fail; callers treat a
/// failure as an upstream error and abort the surrounding operation.
#[async_trait]
pub trait QrEncoder: Send + Sync {
    async fn encode(&self, code: &str) -> Result<String, CoreError>;
}

/// QR encoder backed by an HTTP render service (goqr-style API: the
/// image URL itself is the stored artifact).
pub struct HttpQrEncoder {
    client: reqwest::Client,
    endpoint: String,
}

/// Rendered image size in pixels, both dimensions.
const QR_IMAGE_SIZE: u32 = 200;

impl HttpQrEncoder {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// The image URL for a code, as stored on the locker row.
    fn image_url(&self, code: &str) -> String {
        format!(
            "{}?size={size}x{size}&data={code}",
            self.endpoint.trim_end_matches('?'),
            size = QR_IMAGE_SIZE,
        )
    }
}

#[async_trait]
impl QrEncoder for HttpQrEncoder {
    /// Render `code` and return the image URL.
    ///
    /// The service is probed with a GET so a dead endpoint fails the
    /// operation now rather than leaving lockers with broken image links.
    async fn encode(&self, code: &str) -> Result<String, CoreError> {
        let url = self.image_url(code);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("QR encoder unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "QR encoder returned HTTP {} for code {code}",
                response.status()
            )));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_embeds_size_and_code() {
        let encoder = HttpQrEncoder::new("https://qr.example/render".into());
        assert_eq!(
            encoder.image_url("A001"),
            "https://qr.example/render?size=200x200&data=A001"
        );
    }

    #[test]
    fn image_url_tolerates_trailing_question_mark() {
        let encoder = HttpQrEncoder::new("https://qr.example/render?".into());
        assert_eq!(
            encoder.image_url("B123"),
            "https://qr.example/render?size=200x200&data=B123"
        );
    }
}
