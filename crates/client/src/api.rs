//! Typed HTTP client for the surgery REST API.

use crate::{ClientError, ClientResult};
use api_shared::{ErrorRes, HealthRes, Surgery, SurgeryMessageRes, SurgeryReq};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

/// Default server origin, matching the server's default bind address.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Client for one surgery API server.
///
/// `base_url` is the server origin (for example `http://localhost:3000`); surgery routes are
/// resolved under `/api`. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SurgeryClient {
    base_url: String,
    http: reqwest::Client,
}

impl SurgeryClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> ClientResult<HealthRes> {
        self.send(self.http.get(self.url("/health"))).await
    }

    /// Upcoming scheduled surgeries, soonest first.
    pub async fn list(&self) -> ClientResult<Vec<Surgery>> {
        self.send(self.http.get(self.url("/api/surgeries"))).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Surgery> {
        self.send(self.http.get(self.surgery_url(id))).await
    }

    pub async fn create(&self, req: &SurgeryReq) -> ClientResult<Surgery> {
        let res: SurgeryMessageRes = self
            .send(self.http.post(self.url("/api/surgeries")).json(req))
            .await?;
        Ok(res.surgery)
    }

    pub async fn update(&self, id: &str, req: &SurgeryReq) -> ClientResult<Surgery> {
        let res: SurgeryMessageRes = self
            .send(self.http.put(self.surgery_url(id)).json(req))
            .await?;
        Ok(res.surgery)
    }

    pub async fn cancel(&self, id: &str) -> ClientResult<Surgery> {
        let url = format!("{}/cancel", self.surgery_url(id));
        let res: SurgeryMessageRes = self.send(self.http.put(url)).await?;
        Ok(res.surgery)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn surgery_url(&self, id: &str) -> String {
        self.url(&format!("/api/surgeries/{id}"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Fall back to the status text when the body is not an `{ error }` document.
        let message = match response.json::<ErrorRes>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SurgeryClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.surgery_url("abc"),
            "http://localhost:3000/api/surgeries/abc"
        );
    }
}
