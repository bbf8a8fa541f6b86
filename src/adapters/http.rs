use crate::domain::model::{RequestSpec, ResponseBody, ResponseEncoding};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FacadeError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use url::Url;

/// Sends `RequestSpec`s to the modeling server and decodes the replies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let base_url = normalize_base_url(config.server_url())?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.default_headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FacadeError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| FacadeError::InvalidConfigValueError {
                    field: format!("headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base path. Never resolves it as a URL reference,
    /// so a segment like `C:` is not read as a scheme, but `.` and `..`
    /// segments are collapsed the way a browser would.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", self.base_url.path(), path);
        url.set_path(&full_path);
        url
    }

    pub async fn send(&self, spec: &RequestSpec) -> Result<ResponseBody> {
        let url = self.url_for(&spec.path);
        tracing::debug!("📡 {} {}", spec.method, url);

        let mut request = self.client.request(spec.method.clone(), url);
        if !spec.payload.is_empty() {
            request = if spec.method == Method::GET {
                request.query(&spec.payload)
            } else {
                request.form(&spec.payload)
            };
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {} {} -> {}", spec.method, spec.path, status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(FacadeError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        match spec.encoding {
            ResponseEncoding::Json => Ok(ResponseBody::Json(serde_json::from_str(&body)?)),
            ResponseEncoding::Text => Ok(ResponseBody::Text(body)),
        }
    }
}

fn normalize_base_url(server_url: &str) -> Result<Url> {
    let mut url = Url::parse(server_url)?;
    if url.cannot_be_a_base() {
        return Err(FacadeError::InvalidConfigValueError {
            field: "server_url".to_string(),
            value: server_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
