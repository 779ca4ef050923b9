//! HTTP access: permalink resolution and archive download.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;
use reqwest::Url;
use reqwest::header::LOCATION;
use tracing::debug;

use crate::error::MirrorError;

fn parse_url(url: &str) -> Result<Url, MirrorError> {
    Url::parse(url).map_err(|e| MirrorError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Asks the entry point where the current release lives.
///
/// `client` must not follow redirects. A 3xx answer yields its `Location`
/// target, resolved against `entry_url` when relative.
///
/// # Errors
///
/// [`MirrorError::UnexpectedStatus`] for any non-3xx answer and
/// [`MirrorError::MissingLocation`] for a 3xx without a usable location.
#[tracing::instrument(skip(client))]
pub async fn resolve_redirect<C: HttpClient>(client: &C, entry_url: &str) -> Result<Url, MirrorError> {
    let base = parse_url(entry_url)?;
    let req = reqwest::Request::new(reqwest::Method::GET, base.clone());

    let resp = client.execute(req).await?;
    let status = resp.status();

    if !status.is_redirection() {
        return Err(MirrorError::UnexpectedStatus {
            url: entry_url.to_string(),
            status,
        });
    }

    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| MirrorError::MissingLocation {
            url: entry_url.to_string(),
        })?;

    debug!(%status, location, "Entry point redirected");

    base.join(location).map_err(|e| MirrorError::InvalidUrl {
        url: location.to_string(),
        reason: e.to_string(),
    })
}

/// Downloads `url` fully into memory.
///
/// # Errors
///
/// [`MirrorError::Download`] when the server answers with a non-success status.
#[tracing::instrument(skip(client, url), fields(url = %url))]
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &Url) -> Result<Bytes, MirrorError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client.execute(req).await?;
    let status = resp.status();

    if !status.is_success() {
        return Err(MirrorError::Download {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Download complete");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_resolve_redirect_returns_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/permalink"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "https://host/feed_2024-06-01.zip"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = BasicClient::without_redirects().unwrap();
        let url = resolve_redirect(&client, &format!("{}/permalink", server.uri()))
            .await
            .unwrap();

        assert_eq!(url.as_str(), "https://host/feed_2024-06-01.zip");
    }

    #[tokio::test]
    async fn test_resolve_redirect_accepts_every_3xx() {
        for code in [301u16, 303, 307, 308] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(code).insert_header("Location", "/a/b.zip"))
                .mount(&server)
                .await;

            let client = BasicClient::without_redirects().unwrap();
            let url = resolve_redirect(&client, &format!("{}/permalink", server.uri()))
                .await
                .unwrap();

            assert_eq!(url.path(), "/a/b.zip", "status {code}");
        }
    }

    #[tokio::test]
    async fn test_resolve_redirect_joins_relative_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/files/gtfs_fp2024.zip"),
            )
            .mount(&server)
            .await;

        let client = BasicClient::without_redirects().unwrap();
        let url = resolve_redirect(&client, &format!("{}/dataset/permalink", server.uri()))
            .await
            .unwrap();

        assert_eq!(url.as_str(), format!("{}/files/gtfs_fp2024.zip", server.uri()));
    }

    #[tokio::test]
    async fn test_resolve_redirect_rejects_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a redirect"))
            .mount(&server)
            .await;

        let client = BasicClient::without_redirects().unwrap();
        let err = resolve_redirect(&client, &format!("{}/permalink", server.uri()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("200"));
        match err {
            MirrorError::UnexpectedStatus { status, .. } => assert_eq!(status, StatusCode::OK),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_redirect_requires_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let client = BasicClient::without_redirects().unwrap();
        let err = resolve_redirect(&client, &format!("{}/permalink", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, MirrorError::MissingLocation { .. }));
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let client = BasicClient::new().unwrap();
        let url: Url = format!("{}/feed.zip", server.uri()).parse().unwrap();
        let bytes = fetch_bytes(&client, &url).await.unwrap();

        assert_eq!(&bytes[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_bytes_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = BasicClient::new().unwrap();
        let url: Url = format!("{}/feed.zip", server.uri()).parse().unwrap();
        let err = fetch_bytes(&client, &url).await.unwrap_err();

        match err {
            MirrorError::Download { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }
}
