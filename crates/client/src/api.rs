//! HTTP client for the Entity Store REST API.
//!
//! Wraps [`reqwest`] with bearer authentication and uniform handling of
//! non-2xx responses. Resource services in [`crate::services`] build on
//! the helpers here; nothing is retried.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::gate::OperationGate;

/// HTTP client for one Entity Store deployment.
///
/// Clones share the connection pool and the in-flight gates.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    files_url: String,
    token: Option<String>,
    gates: Arc<Gates>,
}

#[derive(Debug)]
struct Gates {
    upload: OperationGate,
    report: OperationGate,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            upload: OperationGate::new("file upload"),
            report: OperationGate::new("report export"),
        }
    }
}

impl ApiClient {
    /// Build a client from configuration, applying the request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.clone(),
            files_url: config.files_url.clone(),
            token: config.token.clone(),
            gates: Arc::default(),
        })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, files_url: String) -> Self {
        Self {
            client,
            api_url,
            files_url,
            token: None,
            gates: Arc::default(),
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn files_url(&self) -> &str {
        &self.files_url
    }

    pub fn upload_gate(&self) -> &OperationGate {
        &self.gates.upload
    }

    pub fn report_gate(&self) -> &OperationGate {
        &self.gates.report
    }

    /// `GET {api_url}{path}` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::parse_response(Method::GET, path, response).await
    }

    /// `GET` with query parameters, discarding the response body.
    pub async fn get_empty_query<Q>(&self, path: &str, query: &Q) -> Result<(), ClientError>
    where
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::check_status(Method::GET, path, response).await
    }

    /// Send `body` as JSON and decode the JSON response.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method.clone(), path).json(body).send().await?;
        Self::parse_response(method, path, response).await
    }

    /// Send `body` as JSON, discarding the response body.
    pub async fn send_json_empty<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(method.clone(), path).json(body).send().await?;
        Self::check_status(method, path, response).await
    }

    /// Send a request without a body, discarding the response body.
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ClientError> {
        let response = self.request(method.clone(), path).send().await?;
        Self::check_status(method, path, response).await
    }

    /// `GET {api_url}{path}` returning the raw body.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::ensure_success(&Method::GET, path, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `POST {files_url}{path}` as multipart and decode the JSON response.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.files_url, path);
        tracing::debug!(method = "POST", url = %url, "Uploading file");
        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        Self::parse_response(Method::POST, path, response).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(method = %method, path, "Sending request");
        let url = format!("{}{}", self.api_url, path);
        self.authorize(self.client.request(method, url))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Return the response unchanged on success, or an
    /// [`ClientError::Api`] with the status and body text on failure.
    async fn ensure_success(
        method: &Method,
        path: &str,
        response: Response,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if status.as_u16() == 404 {
                tracing::debug!(method = %method, path, "Entity not found");
            } else {
                tracing::error!(method = %method, path, status = status.as_u16(), "API request failed");
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        method: Method,
        path: &str,
        response: Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(&method, path, response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(method = %method, path, error = %e, "Unexpected response body");
            ClientError::Decode(e)
        })
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(method: Method, path: &str, response: Response) -> Result<(), ClientError> {
        Self::ensure_success(&method, path, response).await?;
        Ok(())
    }
}
