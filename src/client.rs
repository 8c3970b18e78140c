use crate::error::{Error, Result};
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use url::Url;

/// Fixed per-request timeout. Requests are never retried.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Proxmox,
    ProxmoxBackup,
    Whm,
}

impl Backend {
    pub fn label(self) -> &'static str {
        match self {
            Backend::Proxmox => "Proxmox",
            Backend::ProxmoxBackup => "PBS",
            Backend::Whm => "WHM",
        }
    }

    fn api_path(self) -> &'static str {
        match self {
            Backend::Proxmox | Backend::ProxmoxBackup => "api2/json",
            Backend::Whm => "json-api",
        }
    }

    /// Strips the transport envelope off a decoded response body.
    pub fn normalize(self, payload: Value) -> Result<Value> {
        match self {
            Backend::Proxmox | Backend::ProxmoxBackup => match payload {
                Value::Object(mut map) => match map.remove("data") {
                    Some(data) => Ok(data),
                    None => Ok(Value::Object(map)),
                },
                other => Ok(other),
            },
            Backend::Whm => {
                if is_failed_status(&payload) {
                    return Err(self.remote_error(&payload));
                }
                if let Some(items) = payload.get("result").and_then(Value::as_array) {
                    if let Some(failed) = items.iter().find(|i| is_failed_status(i)) {
                        return Err(self.remote_error(failed));
                    }
                }
                Ok(payload)
            }
        }
    }

    fn remote_error(self, item: &Value) -> Error {
        Error::Remote {
            backend: self.label(),
            message: item
                .get("statusmsg")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

fn is_failed_status(item: &Value) -> bool {
    match item.get("status") {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        _ => false,
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    authorization: String,
    backend: Backend,
    host: String,
}

impl ApiClient {
    pub fn new(
        backend: Backend,
        host: &str,
        port: u16,
        verify_ssl: bool,
        authorization: String,
    ) -> Result<Self> {
        let scheme = if host.starts_with("http://") {
            "http"
        } else {
            "https"
        };

        let host_cleaned = if let Some(stripped) = host.strip_prefix("http://") {
            stripped
        } else if let Some(stripped) = host.strip_prefix("https://") {
            stripped
        } else {
            host
        };
        let host_cleaned = host_cleaned.trim_end_matches('/');

        let url_str = format!(
            "{}://{}:{}/{}/",
            scheme,
            host_cleaned,
            port,
            backend.api_path()
        );
        let base_url = Url::parse(&url_str)?;

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            base_url,
            authorization,
            backend,
            host: host_cleaned.to_string(),
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        debug!("{} {} {}", self.backend.label(), method, url);

        let mut req = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, &self.authorization);

        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| self.classify(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                backend: self.backend.label(),
                status,
                body: text,
            });
        }

        let payload: Value = resp.json().await.map_err(|e| {
            if e.is_decode() {
                Error::Decode {
                    backend: self.backend.label(),
                    message: e.to_string(),
                }
            } else {
                self.classify(e)
            }
        })?;
        self.backend.normalize(payload)
    }

    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, endpoint, query, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.request(Method::POST, endpoint, &[], body).await
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout
        } else if let Some(detail) = tls_failure(&err) {
            Error::Tls(detail)
        } else if err.is_connect() {
            Error::Connect {
                backend: self.backend.label(),
                host: self.host.clone(),
            }
        } else {
            Error::Request {
                backend: self.backend.label(),
                source: err,
            }
        }
    }
}

/// Walks the source chain looking for a TLS failure. rustls errors arrive
/// wrapped in `io::Error`, whose `source()` skips the wrapped value.
fn tls_failure(err: &reqwest::Error) -> Option<String> {
    let mut cause = err.source();
    while let Some(e) = cause {
        if let Some(tls) = e.downcast_ref::<rustls::Error>() {
            return Some(tls.to_string());
        }
        if let Some(tls) = e
            .downcast_ref::<io::Error>()
            .and_then(|io_err| io_err.get_ref())
            .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        {
            return Some(tls.to_string());
        }
        let msg = e.to_string();
        let lower = msg.to_ascii_lowercase();
        if ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            return Some(msg);
        }
        cause = e.source();
    }
    None
}
