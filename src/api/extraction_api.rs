use crate::config::ExtractionConfig;
use crate::error::CardError;
use crate::service::images::ImageFormat;
use crate::types::ExtractedFields;
use axum::body::Bytes;
use backon::{ExponentialBuilder, Retryable};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Client for the remote business-card extraction service.
#[derive(Clone)]
pub struct ExtractionApi {
    client: reqwest::Client,
    endpoint: Url,
    retry_policy: ExponentialBuilder,
}

impl ExtractionApi {
    pub fn new(cfg: &ExtractionConfig) -> Result<Self, CardError> {
        let endpoint = Url::parse(&cfg.endpoint)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("cardkeep/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(3))
            .with_max_times(cfg.max_retries)
            .with_jitter();
        Ok(Self {
            client,
            endpoint,
            retry_policy,
        })
    }

    /// Post the image as multipart part `file` and decode whatever subset of
    /// fields the service returns.
    pub async fn extract(
        &self,
        image: &Bytes,
        format: ImageFormat,
        file_name: &str,
    ) -> Result<ExtractedFields, CardError> {
        let resp = (|| async {
            let part = Part::bytes(image.to_vec())
                .file_name(file_name.to_string())
                .mime_str(format.content_type())?;
            let resp = self
                .client
                .post(self.endpoint.clone())
                .multipart(Form::new().part("file", part))
                .send()
                .await?;
            if resp.status().is_server_error() {
                return Err(CardError::UpstreamStatus(resp.status()));
            }
            Ok::<_, CardError>(resp)
        })
        .retry(self.retry_policy)
        .when(|e: &CardError| e.is_retryable())
        .notify(|err: &CardError, dur: Duration| {
            warn!("extraction retrying after error {}, sleeping {:?}", err, dur);
        })
        .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "extraction service rejected image");
            return Err(CardError::UpstreamStatus(status));
        }

        let fields: ExtractedFields = resp.json().await?;
        info!(size = image.len(), "card details extracted");
        Ok(fields)
    }
}
