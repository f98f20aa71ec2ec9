use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Path of the control endpoint on the mock server.
pub const CONTROL_PATH: &str = "/__ersatz";

/// Identifies an endpoint by URL and method token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRef {
    pub url: String,
    pub method: String,
}

/// Wire form of the `vary` control command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaryCommand {
    pub command: String, // Always "vary"
    pub endpoint: EndpointRef,
    pub variant: String,
}

impl VaryCommand {
    pub fn new(method: &str, url: &str, variant: &str) -> Self {
        Self {
            command: "vary".to_string(),
            endpoint: EndpointRef {
                url: url.to_string(),
                method: method.to_string(),
            },
            variant: variant.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    pub version: String,
    pub status: String,
    pub endpoints: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSummary {
    pub method: String,
    pub url: String,
    pub variants: Vec<String>,
    pub active: String,
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Rejected { status: StatusCode, reason: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Rejected { status, reason } if reason.is_empty() => {
                write!(f, "Server returned {}", status)
            }
            ClientError::Rejected { status, reason } => {
                write!(f, "Server returned {}: {}", status, reason)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct ErsatzClient {
    client: Client,
    server_url: String,
    admin_url: Option<String>,
    api_key: Option<String>,
}

impl ErsatzClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            admin_url: None,
            api_key: None,
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, TLS roots).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Configure the admin API location and its bearer key.
    pub fn with_admin(mut self, admin_url: &str, api_key: &str) -> Self {
        self.admin_url = Some(admin_url.trim_end_matches('/').to_string());
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Make `variant` the active variant of `method url`.
    pub async fn vary(&self, method: &str, url: &str, variant: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(format!("{}{}", self.server_url, CONTROL_PATH))
            .json(&VaryCommand::new(method, url, variant))
            .send()
            .await?;

        check(resp).await.map(|_| ())
    }

    pub async fn status(&self) -> Result<ServerStatus, ClientError> {
        let resp = self.admin_get("/admin/status").await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn endpoints(&self) -> Result<Vec<EndpointSummary>, ClientError> {
        let resp = self.admin_get("/admin/endpoints").await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn admin_get(&self, path: &str) -> Result<Response, ClientError> {
        // Without an explicit admin URL, assume the admin API shares the server address.
        let base = self.admin_url.as_deref().unwrap_or(&self.server_url);
        let mut req = self.client.get(format!("{}{}", base, path));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        Ok(req.send().await?)
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let reason = resp.text().await.unwrap_or_default();
    Err(ClientError::Rejected { status, reason })
}
