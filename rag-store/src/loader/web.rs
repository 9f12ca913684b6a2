//! Web page loading: fetch a URL and convert the HTML body to markdown-ish
//! plain text.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::errors::RagError;
use crate::record::{Document, META_SOURCE, Metadata};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads `url` and extracts its readable text as a single [`Document`].
///
/// Returns an empty vec for pages with no visible text (e.g. a bare redirect
/// stub).
pub async fn load_url(url: &str) -> Result<Vec<Document>, RagError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RagError::InvalidSource(format!(
            "`{url}` is not an absolute http(s) URL"
        )));
    }

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| RagError::InvalidSource(format!("failed to fetch `{url}`: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RagError::InvalidSource(format!("failed to fetch `{url}`: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RagError::InvalidSource(format!(
            "`{url}` answered with HTTP {status}"
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| RagError::InvalidSource(format!("failed to fetch `{url}`: {e}")))?;
    debug!(url, bytes = html.len(), "fetched page");

    let text = html_to_text(&html)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut metadata = Metadata::new();
    metadata.insert(META_SOURCE.to_string(), json!(url));
    Ok(vec![Document::new(text, metadata)])
}

/// Strips tags, scripts and styles, keeping headings and list structure as
/// markdown so chunk boundaries stay meaningful.
pub(crate) fn html_to_text(html: &str) -> Result<String, RagError> {
    htmd::convert(html).map_err(|e| RagError::Extract(format!("HTML conversion failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relative_url_is_rejected() {
        let err = load_url("ftp://example.com/doc").await.unwrap_err();
        assert!(matches!(err, RagError::InvalidSource(msg) if msg.contains("http(s)")));
    }

    #[test]
    fn html_markup_is_stripped() {
        let text = html_to_text(
            "<html><head><script>var x = 1;</script></head>\
             <body><h1>Title</h1><p>Body copy.</p></body></html>",
        )
        .unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Body copy."));
        assert!(!text.contains("var x"));
    }
}
