// src/fetch/http.rs
// =============================================================================
// This module downloads pages and images over HTTP.
//
// Key functionality:
// - One reqwest Client shared by every worker (connection pooling)
// - Fixed per-request timeout
// - Response text is always decoded as UTF-8, whatever the server claims,
//   so the HTML parser sees the same characters on every run
// - Non-2xx answers become FetchError::HttpStatus
//
// No retries here: a failed request is reported once and the caller decides.
// =============================================================================

use crate::error::FetchError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A downloaded HTML page.
///
/// We keep the decoded text instead of a parsed `Html` because `Html` is not
/// `Send`, and pages travel between tokio tasks. Call `document()` where the
/// tree is actually needed.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

impl Page {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

// Cheap to clone: reqwest::Client is an Arc internally
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// GETs an HTML page and decodes it as UTF-8.
    pub async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let bytes = self.get_bytes(url).await?;
        // Invalid sequences become U+FFFD instead of failing the page
        let body = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Page::new(url.clone(), body))
    }

    /// GETs a binary resource (cover images).
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.get_bytes(url).await
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| network(url, source))?;

        Ok(bytes.to_vec())
    }
}

fn network(url: &Url, source: reqwest::Error) -> FetchError {
    FetchError::Network {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5), "test-agent").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/index.html")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><h1>Hello</h1></body></html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/index.html", server.url())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.url, url);
        assert!(page.body.contains("<h1>Hello</h1>"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_declared_charset_is_ignored() {
        // "£" encoded as UTF-8 but announced as latin-1
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/price.html")
            .with_status(200)
            .with_header("content-type", "text/html; charset=iso-8859-1")
            .with_body("<p>£51.77</p>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/price.html", server.url())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert!(page.body.contains("£51.77"));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.html")
            .with_status(404)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing.html", server.url())).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 1 is reserved and nothing listens there
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        // Accepts the connection and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let fetcher = PageFetcher::new(Duration::from_millis(200), "test-agent").unwrap();
        let url = Url::parse(&format!("http://{addr}/slow.html")).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }));
        assert!(err.is_timeout());
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_bytes_keeps_binary_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cover.jpg")
            .with_status(200)
            .with_body(vec![0xFF, 0xD8, 0xFF, 0x00])
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/cover.jpg", server.url())).unwrap();
        let bytes = fetcher().fetch_bytes(&url).await.unwrap();

        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0x00]);
    }
}
