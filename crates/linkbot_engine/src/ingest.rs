use std::sync::Arc;

use bot_logging::bot_debug;

use crate::{decode_body, FetchError, Fetcher, TitleExtractor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("page has no title")]
    MissingTitle,
}

/// Fetch a page and extract its title. One network call, no retry.
pub struct LinkIngestor {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn TitleExtractor>,
}

impl LinkIngestor {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn TitleExtractor>) -> Self {
        Self { fetcher, extractor }
    }

    pub async fn fetch_title(&self, url: &str) -> Result<String, IngestError> {
        let output = self.fetcher.fetch(url).await?;
        let decoded = decode_body(&output.bytes, output.metadata.content_type.as_deref());
        bot_debug!(
            "decoded {} bytes from {} as {}",
            output.metadata.byte_len,
            output.metadata.final_url,
            decoded.encoding_label
        );
        self.extractor
            .extract_title(&decoded.text)
            .ok_or(IngestError::MissingTitle)
    }
}
