use async_trait::async_trait;

use crate::captions::decoder::{decode_captions, decode_xml};
use crate::error::{DecodeError, DecodeResult};
use crate::models::TranscriptUnit;
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

const JSON_FORMAT_PARAM: &str = "fmt=json3";

/// Retrieves a raw captions payload for a URL.
#[async_trait]
pub trait CaptionFetcher: Send + Sync {
    /// Non-success statuses and empty bodies are errors.
    async fn fetch(&self, url: &str) -> DecodeResult<String>;
}

/// [`CaptionFetcher`] over plain HTTP.
#[derive(Clone, Default)]
pub struct HttpCaptionFetcher {
    client: reqwest::Client,
}

impl HttpCaptionFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CaptionFetcher for HttpCaptionFetcher {
    async fn fetch(&self, url: &str) -> DecodeResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DecodeError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(body)
    }
}

/// Append the json3 format parameter unless the URL already names a format.
pub fn with_json_format(url: &str) -> String {
    if url.contains("fmt=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, JSON_FORMAT_PARAM)
}

/// Cut the URL at its format parameter, dropping everything after it.
pub fn strip_format(url: &str) -> &str {
    let cut = [url.find("&fmt="), url.find("?fmt=")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(url.len());
    &url[..cut]
}

/// Fetch and decode a caption track.
///
/// The first attempt asks for json3; if anything about it fails the bare
/// URL is fetched once more and parsed as XML. A failed retry degrades to
/// an empty transcript.
pub async fn fetch_transcript(fetcher: &dyn CaptionFetcher, url: &str) -> Vec<TranscriptUnit> {
    let primary = with_json_format(url);
    let json_requested = primary.contains(JSON_FORMAT_PARAM);

    let first_attempt = match fetcher.fetch(&primary).await {
        Ok(body) => {
            log_debug!("Caption response length: {}", body.len());
            decode_captions(&body, json_requested)
        }
        Err(e) => Err(e),
    };

    match first_attempt {
        Ok(units) => {
            log_info!("Decoded {} caption units", units.len());
            return units;
        }
        Err(e) => log_warn!("Caption fetch failed ({}), retrying without format", e),
    }

    match fetcher.fetch(strip_format(url)).await {
        Ok(body) => {
            let units = decode_xml(&body);
            log_info!("Retry decoded {} XML caption units", units.len());
            units
        }
        Err(e) => {
            log_warn!("Caption retry also failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JSON_BODY: &str = r#"{"events":[{"tStartMs":2000,"dDurationMs":1000,"segs":[{"utf8":"sponsored by nordvpn"}]}]}"#;
    const XML_BODY: &str = r#"<transcript><text start="3" dur="1">use code save</text></transcript>"#;

    #[test]
    fn test_with_json_format() {
        assert_eq!(
            with_json_format("https://x.test/api/timedtext?v=abc"),
            "https://x.test/api/timedtext?v=abc&fmt=json3"
        );
        assert_eq!(
            with_json_format("https://x.test/timedtext"),
            "https://x.test/timedtext?fmt=json3"
        );
        assert_eq!(
            with_json_format("https://x.test/t?v=1&fmt=srv3"),
            "https://x.test/t?v=1&fmt=srv3"
        );
    }

    #[test]
    fn test_strip_format() {
        assert_eq!(strip_format("https://x.test/t?v=1&fmt=json3&x=2"), "https://x.test/t?v=1");
        assert_eq!(strip_format("https://x.test/t?fmt=json3"), "https://x.test/t");
        assert_eq!(strip_format("https://x.test/t?v=1"), "https://x.test/t?v=1");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_transcript_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("fmt", "json3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(JSON_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpCaptionFetcher::default();
        let url = format!("{}/api/timedtext?v=abc", server.uri());
        let units = fetch_transcript(&fetcher, &url).await;

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].start, 2.0);
        assert_eq!(units[0].text, "sponsored by nordvpn");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_transcript_retries_without_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("fmt", "json3"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string(XML_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpCaptionFetcher::default();
        let url = format!("{}/api/timedtext?v=abc", server.uri());
        let units = fetch_transcript(&fetcher, &url).await;

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "use code save");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_fetch_transcript_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = HttpCaptionFetcher::default();
        let url = format!("{}/api/timedtext?v=abc", server.uri());
        assert!(fetch_transcript(&fetcher, &url).await.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_empty_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpCaptionFetcher::default();
        let result = fetcher.fetch(&server.uri()).await;
        assert!(matches!(result, Err(DecodeError::Empty)));
    }
}
