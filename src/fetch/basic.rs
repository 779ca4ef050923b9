use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::redirect::Policy;

/// Plain reqwest-backed [`HttpClient`].
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// Client that follows redirects, used for the archive download.
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self(reqwest::Client::builder().build()?))
    }

    /// Client that hands 3xx responses back to the caller untouched.
    pub fn without_redirects() -> reqwest::Result<Self> {
        Ok(Self(
            reqwest::Client::builder().redirect(Policy::none()).build()?,
        ))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
