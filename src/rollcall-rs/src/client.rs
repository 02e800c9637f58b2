use crate::{ClientError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, StatusCode};
use rollcall_core::{Person, SearchRequest, SearchResponse, HAS_MORE_HEADER, USERS_PATH};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Rollcall REST API Client
pub struct Client {
    base_url: String,
    access_token: String,
    timeout: Duration,
    client: HttpClient,
}

/// Builder for [`Client`]
pub struct ClientBuilder {
    base_url: String,
    access_token: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Upper bound for the whole call, connect through body
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        let client = HttpClient::builder().timeout(self.timeout).build()?;
        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            access_token: self.access_token,
            timeout: self.timeout,
            client,
        })
    }
}

/// How a response status is handled. Every status falls into exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Unauthorized,
    Forbidden,
    Rejected,
    ServerError,
    Unexpected,
}

impl StatusClass {
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=299 => StatusClass::Success,
            401 => StatusClass::Unauthorized,
            403 => StatusClass::Forbidden,
            400..=499 => StatusClass::Rejected,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Unexpected,
        }
    }
}

impl Client {
    /// Create a client with the default timeout
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::builder(base_url, access_token).build()
    }

    pub fn builder(base_url: impl Into<String>, access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Search for people.
    ///
    /// One HTTP call, no retries. The request goes out unchecked; the server's
    /// validation message comes back in [`ClientError::BadRequest`].
    pub async fn find_users(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}{}", self.base_url, USERS_PATH);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        match StatusClass::of(status) {
            StatusClass::Success => {}
            StatusClass::Unauthorized => return Err(ClientError::Unauthorized),
            StatusClass::Forbidden => return Err(ClientError::Forbidden),
            StatusClass::Rejected => {
                let message = response
                    .text()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                return Err(ClientError::BadRequest {
                    status: status.as_u16(),
                    message,
                });
            }
            StatusClass::ServerError => {
                return Err(ClientError::Internal {
                    status: status.as_u16(),
                })
            }
            StatusClass::Unexpected => {
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                })
            }
        }

        let has_more = parse_has_more(response.headers())?;
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let users: Vec<Person> = serde_json::from_slice(&body)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid body: {e}")))?;

        tracing::debug!(returned = users.len(), has_more, "find_users complete");
        Ok(SearchResponse { users, has_more })
    }

    fn transport_error(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::Network(error)
        }
    }
}

fn parse_has_more(headers: &HeaderMap) -> Result<bool> {
    let value = headers
        .get(HAS_MORE_HEADER)
        .ok_or_else(|| ClientError::MalformedResponse(format!("missing {HAS_MORE_HEADER} header")))?;

    match value.to_str() {
        Ok("true") => Ok(true),
        Ok("false") => Ok(false),
        _ => Err(ClientError::MalformedResponse(format!(
            "invalid {HAS_MORE_HEADER} header: {value:?}"
        ))),
    }
}
