use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used to download remote log files.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `req` and returns the raw response, whatever its status.
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
