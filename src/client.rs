use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{ChatRequest, ChatResponse};

/// Base URL used when neither an explicit URL nor `FLOWFIX_CHAT_URL` is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "FLOWFIX_CHAT_URL";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CHAT_PATH: &str = "chat";

/// Client for the FlowFix assistant's `POST /chat` endpoint.
#[derive(Clone)]
pub struct FlowFix {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Duration,
    session_id: Option<String>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl FlowFix {
    /// Create a new FlowFix client.
    ///
    /// The base URL can be provided directly or read from the
    /// `FLOWFIX_CHAT_URL` environment variable; failing both, the client
    /// talks to `http://127.0.0.1:5000/`.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        base_url: Option<String>,
        timeout: Option<Duration>,
        session_id: Option<String>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let endpoint = chat_endpoint(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            session_id,
            logger: None,
        })
    }

    /// Attach a logger that observes every exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The fully resolved `/chat` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The session identifier attached to requests, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Build the request body for `message`, attaching the configured session id.
    pub fn request(&self, message: impl Into<String>) -> ChatRequest {
        let request = ChatRequest::new(message);
        match &self.session_id {
            Some(id) => request.with_session_id(id.clone()),
            None => request,
        }
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Process error responses and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or(error_body);

        match status_code {
            400 => Error::bad_request(error_message),
            408 => Error::request_timeout(error_message),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(status_code, error_message, retry_after),
            _ => Error::api(status_code, error_message),
        }
    }

    /// Send one message to the assistant and decode its reply.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        if let Some(logger) = &self.logger {
            logger.log_request(&self.endpoint, &request);
        }
        let result = self.exchange(&request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error(err);
                }
            }
        }
        result
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

impl fmt::Debug for FlowFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowFix")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("session_id", &self.session_id)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Resolve `base_url` to its `/chat` endpoint.
///
/// The base is treated as a directory, so `http://host/api` and
/// `http://host/api/` both resolve to `http://host/api/chat`.
fn chat_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(CHAT_PATH)?)
}
