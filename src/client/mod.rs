//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName, USER_AGENT};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    ApiError, Credential, EmailOption, Payload, PreviewOption, SentEmail, SentSms, SmsOption,
    Template, TemplatePreview, TemplateType, ValidationError, email_payload, preview_payload,
    sms_payload,
};
use crate::transport::{
    PathParams, QueryValues, RequestTarget, SigningError, decode_api_error, decode_json_at,
    issued_at_now, sign_token,
};

const DEFAULT_BASE_URL: &str = "https://rest-api.notify.gov.au/";
const CLIENT_USER_AGENT: &str = concat!("notify-client-rust/", env!("CARGO_PKG_VERSION"));
const JSON: &str = "application/json";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    headers: Vec<(HeaderName, String)>,
    body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            // Reading to the end releases the connection back to the pool.
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`NotifyClient`].
///
/// Nothing is retried or logged; each failure is returned to the caller as-is.
pub enum NotifyError {
    /// The API key was empty or too short to hold a credential.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// A request URL could not be built from the base URL and path parameters.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[source] Box<dyn StdError + Send + Sync>),

    /// The per-request token could not be minted.
    #[error("token signing error: {0}")]
    Signing(#[from] SigningError),

    /// The request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The API answered with a status of 400 or above.
    #[error("API error: {0}")]
    Api(ApiError),

    /// A success response did not have the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),
}

impl NotifyError {
    /// The structured API error, if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`NotifyClient`].
///
/// Use this to point the client at another environment (or a local stub
/// server) or to give the transport a timeout.
pub struct NotifyClientBuilder {
    credential: Credential,
    base_url: String,
    timeout: Option<Duration>,
}

impl NotifyClientBuilder {
    /// Create a builder with the production base URL and no timeout.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
        }
    }

    /// Override the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a [`NotifyClient`].
    pub fn build(self) -> Result<NotifyClient, NotifyError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| NotifyError::Transport(Box::new(err)))?;

        Ok(NotifyClient {
            credential: self.credential,
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn invalid_url(err: impl StdError + Send + Sync + 'static) -> NotifyError {
    NotifyError::InvalidUrl(Box::new(err))
}

/// Parse `base_url` and make sure relative paths resolve beneath its path.
fn normalize_base_url(base_url: &str) -> Result<Url, NotifyError> {
    let mut url = Url::parse(base_url).map_err(NotifyError::InvalidBaseUrl)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Clone)]
/// High-level Notify client.
///
/// Every call builds its own payload and signs its own token, so one client can
/// be cloned or shared across tasks freely. By default it talks to
/// `https://rest-api.notify.gov.au/`.
pub struct NotifyClient {
    credential: Credential,
    base_url: Url,
    http: Arc<dyn HttpTransport>,
}

impl NotifyClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`NotifyClient::builder`].
    pub fn new(credential: Credential) -> Result<Self, NotifyError> {
        NotifyClientBuilder::new(credential).build()
    }

    /// Parse `api_key` and create a client using the default base URL.
    pub fn from_api_key(api_key: &str) -> Result<Self, NotifyError> {
        Self::new(Credential::parse(api_key)?)
    }

    /// Start building a client with custom settings.
    pub fn builder(credential: Credential) -> NotifyClientBuilder {
        NotifyClientBuilder::new(credential)
    }

    /// The base URL relative request paths are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetch the latest version of a template.
    pub async fn template_by_id(&self, id: &str) -> Result<Template, NotifyError> {
        let target = RequestTarget::new("v2/template/{}")
            .with(&[&PathParams::new([id])])
            .map_err(invalid_url)?;
        self.get_json(target, &[]).await
    }

    /// Fetch a specific version of a template.
    pub async fn template_version(&self, id: &str, version: u32) -> Result<Template, NotifyError> {
        let target = RequestTarget::new("v2/template/{}/version/{}")
            .with(&[&PathParams::new([id.to_owned(), version.to_string()])])
            .map_err(invalid_url)?;
        self.get_json(target, &[]).await
    }

    /// List templates, optionally only those of one type.
    pub async fn templates(
        &self,
        template_type: Option<TemplateType>,
    ) -> Result<Vec<Template>, NotifyError> {
        let mut query = QueryValues::new();
        if let Some(template_type) = template_type {
            query = query.add(TemplateType::FIELD, template_type.as_str());
        }
        let target = RequestTarget::new("v2/templates")
            .with(&[&query])
            .map_err(invalid_url)?;
        self.get_json(target, &["templates"]).await
    }

    /// Render a template with the given personalisation without sending it.
    pub async fn template_preview(
        &self,
        id: &str,
        options: &[&dyn PreviewOption],
    ) -> Result<TemplatePreview, NotifyError> {
        let payload = preview_payload(options);
        let target = RequestTarget::new("v2/template/{}/preview")
            .with(&[&PathParams::new([id])])
            .map_err(invalid_url)?;
        self.post_json(target, &payload).await
    }

    /// Send an email built from template `id` to `email_address`.
    pub async fn send_email(
        &self,
        id: &str,
        email_address: &str,
        options: &[&dyn EmailOption],
    ) -> Result<SentEmail, NotifyError> {
        let payload = email_payload(id, email_address, options);
        self.post_json(RequestTarget::new("v2/notifications/email"), &payload)
            .await
    }

    /// Send a text message built from template `id` to `phone_number`.
    pub async fn send_sms(
        &self,
        id: &str,
        phone_number: &str,
        options: &[&dyn SmsOption],
    ) -> Result<SentSms, NotifyError> {
        let payload = sms_payload(id, phone_number, options);
        self.post_json(RequestTarget::new("v2/notifications/sms"), &payload)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        target: RequestTarget,
        at: &[&str],
    ) -> Result<T, NotifyError> {
        let body = self.execute(Method::GET, target, None).await?;
        decode_json_at(&body, at).map_err(|err| NotifyError::Decode(Box::new(err)))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        target: RequestTarget,
        payload: &Payload,
    ) -> Result<T, NotifyError> {
        let body = serde_json::to_vec(payload).map_err(NotifyError::Encode)?;
        let body = self.execute(Method::POST, target, Some(body)).await?;
        decode_json_at(&body, &[]).map_err(|err| NotifyError::Decode(Box::new(err)))
    }

    /// Resolve, sign, dispatch and classify one request.
    ///
    /// Statuses of 400 and above always become [`NotifyError::Api`]; anything
    /// else returns the buffered body for the caller to decode.
    async fn execute(
        &self,
        method: Method,
        target: RequestTarget,
        body: Option<Vec<u8>>,
    ) -> Result<String, NotifyError> {
        let url = target.resolve(&self.base_url).map_err(invalid_url)?;
        let token = sign_token(&self.credential, issued_at_now()?)?;

        let request = HttpRequest {
            method,
            url,
            headers: vec![
                (CONTENT_TYPE, JSON.to_owned()),
                (ACCEPT, JSON.to_owned()),
                (AUTHORIZATION, format!("Bearer {token}")),
                (USER_AGENT, CLIENT_USER_AGENT.to_owned()),
            ],
            body,
        };

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .http
            .send(request)
            .await
            .map_err(NotifyError::Transport)?;
        tracing::debug!(status = response.status, "received response");

        if response.status >= 400 {
            return Err(NotifyError::Api(decode_api_error(
                response.status,
                response.headers,
                &response.body,
            )));
        }

        Ok(response.body)
    }
}
