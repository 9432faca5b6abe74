// src/fetch.rs
// =============================================================================
// Getting the HTML to audit: either download a page or read a local file.
//
// This sits outside the checker on purpose. The checker only ever sees the
// HTML string and the list of links; it never downloads page bodies.
// =============================================================================

use crate::config::CheckerConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::path::Path;
use tracing::info;
use url::Url;

// Fetches a web page and returns its HTML content
//
// Unlike the link probes this is a GET that follows redirects: we want the
// body of the page the user pointed at.
pub async fn fetch_page(config: &CheckerConfig, page_url: &str) -> Result<String> {
    // Bad settings are reported as such, before any network traffic
    config.validate()?;

    // Parse and validate the page URL up front for a clear error message
    let url = Url::parse(page_url).map_err(|e| anyhow!("Invalid URL '{}': {}", page_url, e))?;

    let client = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;

    info!(page = %url, "fetching page");
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", page_url))?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch {}: HTTP {}", page_url, response.status()));
    }

    let html = response.text().await?;
    Ok(html)
}

// Reads an HTML document from disk
pub async fn read_page(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_page_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"http://a.example\"></a>"))
            .mount(&server)
            .await;

        let html = fetch_page(&CheckerConfig::default(), &format!("{}/index.html", server.uri()))
            .await
            .unwrap();
        assert!(html.contains("http://a.example"));
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start().await;
        let result = fetch_page(&CheckerConfig::default(), &format!("{}/nope", server.uri())).await;
        assert!(result.unwrap_err().to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_invalid_config() {
        let server = MockServer::start().await;
        let config = CheckerConfig::default().with_timeout(std::time::Duration::ZERO);

        let result = fetch_page(&config, &format!("{}/index.html", server.uri())).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid configuration"));

        let config = CheckerConfig::default().with_concurrency(0);
        assert!(fetch_page(&config, &server.uri()).await.is_err());
        // Nothing was downloaded
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_invalid_url() {
        let result = fetch_page(&CheckerConfig::default(), "not a url").await;
        assert!(result.unwrap_err().to_string().contains("Invalid URL"));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let result = read_page(Path::new("/definitely/not/here.html")).await;
        assert!(result.is_err());
    }
}
