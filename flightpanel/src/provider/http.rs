//! HTTP client abstraction for testability.
//!
//! Provider clients talk to the network through [`AsyncHttpClient`] so unit
//! tests can inject canned responses instead of real HTTP traffic.

use std::future::Future;

use tracing::{trace, warn};

use super::types::ProviderError;

/// Trait for asynchronous HTTP client operations.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an HTTP GET request with custom headers.
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an HTTP GET request with Bearer token authentication.
    fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an HTTP POST with a urlencoded form body.
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<Vec<u8>, ProviderError> {
        // Check HTTP status before reading the body
        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ProviderError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => Err(ProviderError::Http(format!(
                "Failed to read response: {}",
                e
            ))),
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP GET request starting");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("Request failed: {}", e)))?;

        Self::read_body(url, response).await
    }

    async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, ProviderError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("Request failed: {}", e)))?;

        Self::read_body(url, response).await
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("Request failed: {}", e)))?;

        Self::read_body(url, response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("POST request failed: {}", e)))?;

        Self::read_body(url, response).await
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Mock HTTP client returning queued responses in order.
    ///
    /// Every request method pops the next queued response; an empty queue
    /// yields an HTTP error. Request URLs are recorded for assertions.
    pub struct MockAsyncHttpClient {
        responses: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        pub urls: Mutex<Vec<String>>,
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(body: &str) -> Self {
            let mock = Self::new();
            mock.push_body(body);
            mock
        }

        pub fn with_error(error: ProviderError) -> Self {
            let mock = Self::new();
            mock.push_error(error);
            mock
        }

        pub fn push_body(&self, body: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(body.as_bytes().to_vec()));
        }

        pub fn push_error(&self, error: ProviderError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }

        fn next(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.urls.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Http("no response queued".to_string())))
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.next(url)
        }

        async fn get_with_headers(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, ProviderError> {
            self.next(url)
        }

        async fn get_with_bearer(
            &self,
            url: &str,
            _bearer_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.next(url)
        }

        async fn post_form(
            &self,
            url: &str,
            _form: &[(&str, &str)],
        ) -> Result<Vec<u8>, ProviderError> {
            self.next(url)
        }
    }

    #[tokio::test]
    async fn mock_client_returns_queued_responses_in_order() {
        let mock = MockAsyncHttpClient::new();
        mock.push_body("first");
        mock.push_body("second");

        assert_eq!(mock.get("http://a").await.unwrap(), b"first".to_vec());
        assert_eq!(mock.get("http://b").await.unwrap(), b"second".to_vec());
        assert_eq!(mock.requested_urls(), vec!["http://a", "http://b"]);
    }

    #[tokio::test]
    async fn mock_client_errors_when_queue_is_empty() {
        let mock = MockAsyncHttpClient::new();
        assert!(mock.get("http://a").await.is_err());
    }

    #[tokio::test]
    async fn mock_client_returns_queued_error() {
        let mock = MockAsyncHttpClient::with_error(ProviderError::Http("boom".to_string()));
        let result = mock.get("http://a").await;
        assert_eq!(result, Err(ProviderError::Http("boom".to_string())));
    }
}
