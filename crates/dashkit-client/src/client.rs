//! Authenticated request pipeline.
//!
//! Every request reads the access token from the store at send time and
//! carries it as a bearer header (the configured login path is exempt).
//! A 401 on the first attempt triggers one refresh exchange and one
//! retry; the refresh itself is single-flight, so concurrent 401s share
//! a single exchange. A failed refresh tears the session down: store
//! cleared, user notified, hard redirect to the login entry point.

use std::sync::Arc;

use anyhow::Context;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorDetails};
use crate::hooks::{Navigator, NotificationSink, Severity};
use crate::store::{self, ACCESS_TOKEN_KEY, ACCESS_TOKEN_TTL, REFRESH_TOKEN_KEY, TokenStore};

/// Response envelope the backend wraps every payload in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Server-side pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub item_count: u64,
    pub items_per_page: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Request body. Multipart parts are owned values so the body can be
/// rebuilt when the request is retried after a token refresh.
#[derive(Debug, Clone)]
pub enum Payload {
    /// JSON body; sent with the JSON content type.
    Json(Value),
    /// Multipart form body; the transport sets the boundary per request.
    Multipart(Vec<Part>),
}

impl Payload {
    /// Serializes `value` into a JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    value: PartValue,
}

#[derive(Debug, Clone)]
enum PartValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            value: PartValue::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        }
    }
}

/// Authenticated API client.
///
/// Collaborators are injected; construct one per application and pass it
/// by reference to every caller.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    /// Serializes refresh exchanges; see [`Self::refresh_access_token`].
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config,
            store,
            notifier,
            navigator,
            refresh_gate: Mutex::new(()),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<Envelope<T>, ApiError> {
        self.request(Method::POST, path, Some(payload)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<Envelope<T>, ApiError> {
        self.request(Method::PUT, path, Some(payload)).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<Envelope<T>, ApiError> {
        self.request(Method::PATCH, path, Some(payload)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ApiError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Sends one logical request through the auth pipeline.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
    ) -> Result<Envelope<T>, ApiError> {
        let url = self.config.url_for(path);
        // The login endpoint must never carry credentials.
        let attach_auth = !path.contains(&self.config.login_path);

        let mut attempt: u8 = 0;
        loop {
            let token = if attach_auth {
                self.store.get(ACCESS_TOKEN_KEY)
            } else {
                None
            };

            tracing::debug!(%method, %url, attempt, "dispatching request");
            let response = self
                .send_once(&method, &url, payload.as_ref(), token.as_deref())
                .await?;
            let status = response.status();

            if status.is_success() {
                return response.json::<Envelope<T>>().await.map_err(ApiError::from);
            }

            if status == StatusCode::UNAUTHORIZED && attempt == 0 {
                tracing::debug!(%url, "access token rejected, refreshing");
                self.refresh_access_token(token.as_deref()).await?;
                attempt += 1;
                continue;
            }

            let body = response.bytes().await.unwrap_or_default();
            let details = ErrorDetails::from_response(status.as_u16(), &body);

            if status == StatusCode::FORBIDDEN {
                self.notifier.notify(
                    "You do not have permission to access this resource",
                    Severity::Error,
                );
                return Err(ApiError::Forbidden(details));
            }

            return Err(ApiError::Response(details));
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        payload: Option<&Payload>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self.http.request(method.clone(), url);

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match payload {
            Some(Payload::Json(value)) => builder.json(value),
            Some(Payload::Multipart(parts)) => builder.multipart(build_form(parts)?),
            None => builder,
        };

        builder.send().await.map_err(ApiError::from)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Single-flight: the gate serializes exchanges, and a waiter whose
    /// stale token no longer matches the store adopts the token a
    /// concurrent refresh already produced instead of issuing another
    /// exchange. On failure the session is torn down and the error
    /// propagates to every caller.
    async fn refresh_access_token(&self, stale_token: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        match self.store.get(ACCESS_TOKEN_KEY) {
            // A concurrent refresh already produced a new token; adopt it.
            Some(current) if stale_token != Some(current.as_str()) => return Ok(current),
            // This request held a token, and the store no longer does: a
            // concurrent refresh failed and tore the session down while
            // this one waited. Share that failure instead of exchanging
            // again.
            None if stale_token.is_some() => {
                return Err(ApiError::SessionExpired(ErrorDetails {
                    status_code: 401,
                    message: "Session expired".to_string(),
                    ..ErrorDetails::default()
                }));
            }
            _ => {}
        }

        let refresh_token = self.store.get(REFRESH_TOKEN_KEY).unwrap_or_default();
        match self.exchange_refresh_token(&refresh_token).await {
            Ok(access_token) => {
                self.store
                    .set(ACCESS_TOKEN_KEY, &access_token, Some(ACCESS_TOKEN_TTL));
                Ok(access_token)
            }
            Err(details) => {
                tracing::warn!(
                    status = details.status_code,
                    "token refresh failed, tearing down session"
                );
                store::clear_session(self.store.as_ref());
                self.notifier
                    .notify("Session expired, login to continue.", Severity::Error);
                self.navigator.redirect_to("/login");
                Err(ApiError::SessionExpired(details))
            }
        }
    }

    /// The refresh call itself never attaches an access token.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String, ErrorDetails> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RefreshData {
            access_token: String,
        }

        let response = self
            .http
            .post(self.config.refresh_url())
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|e| ErrorDetails::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ErrorDetails::from_response(status.as_u16(), &body));
        }

        let envelope: Envelope<RefreshData> = response
            .json()
            .await
            .map_err(|e| ErrorDetails::from_transport(&e))?;
        Ok(envelope.data.access_token)
    }
}

fn build_form(parts: &[Part]) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match &part.value {
            PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
            PartValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let file = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(ApiError::from)?;
                form.part(part.name.clone(), file)
            }
        };
    }
    Ok(form)
}
