//! Data-driven HTTP platform adapter
//!
//! One adapter implementation serves all platforms; everything
//! platform-specific lives in a [`PlatformProfile`] record: endpoints, auth
//! scheme, tag cap, payload builders, and the response fields to read back.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use crosspost_domain::{AdapterError, PlatformAdapter, Post, RemoteRef};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

use super::oauth1::{self, Oauth1Keys};

/// Credentials for one platform; which fields matter is profile-specific
#[derive(Clone, Default)]
pub struct PlatformCredentials {
    /// API key / bearer token / admin key, depending on the auth scheme
    pub token: Option<SecretString>,
    /// OAuth1 consumer key (Tumblr)
    pub consumer_key: Option<SecretString>,
    /// OAuth1 consumer secret (Tumblr)
    pub consumer_secret: Option<SecretString>,
    /// OAuth1 token secret (Tumblr)
    pub token_secret: Option<SecretString>,
    /// Site host (WordPress), admin URL (Ghost), or site ID (Wix)
    pub site: Option<String>,
    /// Blog identifier (Blogger, Tumblr)
    pub blog_id: Option<String>,
}

/// Credential fields a profile requires before attempting any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredField {
    Token,
    ConsumerKey,
    ConsumerSecret,
    TokenSecret,
    Site,
    BlogId,
}

#[derive(Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
        }
    }
}

/// One HTTP endpoint; `{id}`, `{user_id}`, `{blog_id}` and `{site_id}` in
/// the path are substituted at call time
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
}

/// How the base URL is determined
#[derive(Debug, Clone, Copy)]
pub enum BaseUrl {
    /// Constant API host
    Fixed(&'static str),
    /// `https://{site}` from the site credential (WordPress)
    HttpsSite,
    /// The site credential is already a full URL (Ghost)
    SiteUrl,
}

#[derive(Debug, Clone, Copy)]
pub enum AuthScheme {
    /// Token in a custom header, e.g. Dev.to's `api-key`
    ApiKeyHeader(&'static str),
    /// Token verbatim in `Authorization` (Hashnode, Wix)
    RawToken,
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `Authorization: Ghost <base64(admin key)>`
    GhostAdmin,
    /// OAuth 1.0a HMAC-SHA1 signature (Tumblr)
    OAuth1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Json,
    Form,
}

/// JSON pointers into the platform's response
#[derive(Debug, Clone, Copy)]
pub struct ResponsePaths {
    pub id: &'static str,
    pub url: Option<&'static str>,
}

/// Preflight request resolving the caller's user ID (Medium)
#[derive(Debug, Clone, Copy)]
pub struct UserLookup {
    pub path: &'static str,
    pub id: &'static str,
}

/// Builds the request body for one operation
pub type PayloadFn = fn(&Post, &PlatformProfile, Option<&str>) -> Value;

/// One publish or update operation
pub struct Operation {
    pub endpoint: Endpoint,
    pub payload: PayloadFn,
    pub response: ResponsePaths,
}

/// Everything platform-specific, as data
pub struct PlatformProfile {
    pub name: &'static str,
    /// Maximum tags the platform accepts; excess tags are dropped in order
    pub tag_limit: Option<usize>,
    pub base_url: BaseUrl,
    pub auth: AuthScheme,
    /// Extra header carrying the site ID (Wix)
    pub site_id_header: Option<&'static str>,
    pub user_lookup: Option<UserLookup>,
    pub encoding: PayloadEncoding,
    pub create: Operation,
    /// `None` means the platform has no update API
    pub update: Option<Operation>,
    pub required: &'static [CredField],
    /// Human-readable message for missing credentials
    pub credential_hint: &'static str,
}

/// The adapter: a profile, credentials, and a shared HTTP client
pub struct HttpPlatform {
    client: Client,
    profile: &'static PlatformProfile,
    credentials: PlatformCredentials,
    base_override: Option<String>,
}

impl HttpPlatform {
    pub fn new(profile: &'static PlatformProfile, credentials: PlatformCredentials) -> Self {
        Self::build(profile, credentials, None)
    }

    /// Point the adapter at a different host (mock mode, tests)
    pub fn with_base_url(
        profile: &'static PlatformProfile,
        credentials: PlatformCredentials,
        base_url: impl Into<String>,
    ) -> Self {
        Self::build(profile, credentials, Some(base_url.into()))
    }

    fn build(
        profile: &'static PlatformProfile,
        credentials: PlatformCredentials,
        base_override: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            profile,
            credentials,
            base_override,
        }
    }

    fn missing_credentials(&self) -> AdapterError {
        AdapterError::MissingCredentials {
            platform: self.profile.name,
            detail: self.profile.credential_hint.to_string(),
        }
    }

    fn require_credentials(&self) -> Result<(), AdapterError> {
        let missing = self.profile.required.iter().any(|field| match field {
            CredField::Token => self.credentials.token.is_none(),
            CredField::ConsumerKey => self.credentials.consumer_key.is_none(),
            CredField::ConsumerSecret => self.credentials.consumer_secret.is_none(),
            CredField::TokenSecret => self.credentials.token_secret.is_none(),
            CredField::Site => self.credentials.site.is_none(),
            CredField::BlogId => self.credentials.blog_id.is_none(),
        });

        if missing {
            tracing::warn!(
                platform = self.profile.name,
                "{}",
                self.profile.credential_hint
            );
            return Err(self.missing_credentials());
        }
        Ok(())
    }

    fn token_str(&self) -> Result<&str, AdapterError> {
        self.credentials
            .token
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| self.missing_credentials())
    }

    fn site_str(&self) -> Result<&str, AdapterError> {
        self.credentials
            .site
            .as_deref()
            .ok_or_else(|| self.missing_credentials())
    }

    fn base_url(&self) -> Result<String, AdapterError> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        match self.profile.base_url {
            BaseUrl::Fixed(base) => Ok(base.to_string()),
            BaseUrl::HttpsSite => Ok(format!("https://{}", self.site_str()?)),
            BaseUrl::SiteUrl => Ok(self.site_str()?.to_string()),
        }
    }

    fn render_path(&self, template: &str, remote_id: Option<&str>, user_id: Option<&str>) -> String {
        let mut path = template.to_string();
        if let Some(id) = remote_id {
            path = path.replace("{id}", id);
        }
        if let Some(user) = user_id {
            path = path.replace("{user_id}", user);
        }
        if let Some(blog) = self.credentials.blog_id.as_deref() {
            path = path.replace("{blog_id}", blog);
        }
        if let Some(site) = self.credentials.site.as_deref() {
            path = path.replace("{site_id}", site);
        }
        path
    }

    fn apply_auth(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
        form_params: Option<&[(String, String)]>,
    ) -> Result<RequestBuilder, AdapterError> {
        match self.profile.auth {
            AuthScheme::ApiKeyHeader(header) => Ok(request.header(header, self.token_str()?)),
            AuthScheme::RawToken => Ok(request.header(AUTHORIZATION, self.token_str()?)),
            AuthScheme::Bearer => {
                Ok(request.header(AUTHORIZATION, format!("Bearer {}", self.token_str()?)))
            }
            AuthScheme::GhostAdmin => Ok(request.header(
                AUTHORIZATION,
                format!("Ghost {}", BASE64.encode(self.token_str()?)),
            )),
            AuthScheme::OAuth1 => {
                let keys = Oauth1Keys {
                    consumer_key: self
                        .credentials
                        .consumer_key
                        .as_ref()
                        .map(ExposeSecret::expose_secret)
                        .ok_or_else(|| self.missing_credentials())?,
                    consumer_secret: self
                        .credentials
                        .consumer_secret
                        .as_ref()
                        .map(ExposeSecret::expose_secret)
                        .ok_or_else(|| self.missing_credentials())?,
                    token: self.token_str()?,
                    token_secret: self
                        .credentials
                        .token_secret
                        .as_ref()
                        .map(ExposeSecret::expose_secret)
                        .ok_or_else(|| self.missing_credentials())?,
                };
                let header = oauth1::authorization_header(
                    method,
                    url,
                    form_params.unwrap_or_default(),
                    &keys,
                    &Uuid::new_v4().simple().to_string(),
                    OffsetDateTime::now_utc().unix_timestamp(),
                );
                Ok(request.header(AUTHORIZATION, header))
            }
        }
    }

    async fn lookup_user(&self, base: &str, lookup: &UserLookup) -> Result<String, AdapterError> {
        let url = format!("{}{}", base, lookup.path);
        let request = self.apply_auth(self.client.get(&url), "GET", &url, None)?;

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::UnexpectedResponse(e.to_string()))?;

        value
            .pointer(lookup.id)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                AdapterError::UnexpectedResponse(format!("missing user id at {}", lookup.id))
            })
    }

    async fn execute(
        &self,
        operation: &Operation,
        post: &Post,
        remote_id: Option<&str>,
    ) -> Result<RemoteRef, AdapterError> {
        let base = self.base_url()?;

        let user_id = match (&self.profile.user_lookup, remote_id) {
            (Some(lookup), None) => Some(self.lookup_user(&base, lookup).await?),
            _ => None,
        };

        let path = self.render_path(operation.endpoint.path, remote_id, user_id.as_deref());
        let url = format!("{}{}", base, path);
        let payload = (operation.payload)(post, self.profile, remote_id);

        let form_body = match self.profile.encoding {
            PayloadEncoding::Json => None,
            PayloadEncoding::Form => Some(form_params(&payload)),
        };

        let method = operation.endpoint.method.as_reqwest();
        let mut request = self.client.request(method.clone(), &url);
        request = self.apply_auth(request, method.as_str(), &url, form_body.as_deref())?;

        if let Some(header) = self.profile.site_id_header {
            request = request.header(header, self.site_str()?);
        }

        request = match &form_body {
            Some(params) => request.form(params),
            None => request.json(&payload),
        };

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                platform = self.profile.name,
                file = %post.source_path,
                status = status.as_u16(),
                body = %body,
                "Platform call failed"
            );
            return Err(AdapterError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::UnexpectedResponse(e.to_string()))?;

        let remote = extract_remote(&value, &operation.response)?;

        tracing::info!(
            platform = self.profile.name,
            file = %post.source_path,
            remote_id = %remote.id,
            url = remote.url.as_deref().unwrap_or_default(),
            "Platform call succeeded"
        );

        Ok(remote)
    }
}

/// Flatten a JSON object into form key/value pairs
fn form_params(payload: &Value) -> Vec<(String, String)> {
    let Some(object) = payload.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn extract_remote(value: &Value, paths: &ResponsePaths) -> Result<RemoteRef, AdapterError> {
    let id = match value.pointer(paths.id) {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(AdapterError::UnexpectedResponse(format!(
                "missing id at {}",
                paths.id
            )));
        }
    };

    let url = paths
        .url
        .and_then(|path| value.pointer(path))
        .and_then(Value::as_str)
        .map(String::from);

    Ok(RemoteRef { id, url })
}

#[async_trait]
impl PlatformAdapter for HttpPlatform {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    async fn publish(&self, post: &Post) -> Result<RemoteRef, AdapterError> {
        self.require_credentials()?;

        tracing::info!(
            platform = self.profile.name,
            file = %post.source_path,
            title = %post.frontmatter.title,
            "Publishing new post"
        );

        self.execute(&self.profile.create, post, None).await
    }

    async fn update(&self, post: &Post, remote_id: &str) -> Result<RemoteRef, AdapterError> {
        let Some(operation) = &self.profile.update else {
            tracing::warn!(
                platform = self.profile.name,
                file = %post.source_path,
                "Platform does not support updating posts"
            );
            return Err(AdapterError::UpdateUnsupported {
                platform: self.profile.name,
            });
        };

        self.require_credentials()?;

        tracing::info!(
            platform = self.profile.name,
            file = %post.source_path,
            remote_id = remote_id,
            title = %post.frontmatter.title,
            "Updating existing post"
        );

        self.execute(operation, post, Some(remote_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_params_stringifies_values() {
        let payload = serde_json::json!({
            "title": "Hello",
            "count": 3,
            "published": true,
        });

        let params = form_params(&payload);
        assert!(params.contains(&("title".to_string(), "Hello".to_string())));
        assert!(params.contains(&("count".to_string(), "3".to_string())));
        assert!(params.contains(&("published".to_string(), "true".to_string())));
    }

    #[test]
    fn extract_remote_accepts_numeric_ids() {
        let value = serde_json::json!({"id": 123, "url": "https://example.com/p"});
        let paths = ResponsePaths {
            id: "/id",
            url: Some("/url"),
        };

        let remote = extract_remote(&value, &paths).unwrap();
        assert_eq!(remote.id, "123");
        assert_eq!(remote.url.as_deref(), Some("https://example.com/p"));
    }

    #[test]
    fn extract_remote_fails_without_id() {
        let value = serde_json::json!({"url": "https://example.com/p"});
        let paths = ResponsePaths {
            id: "/id",
            url: Some("/url"),
        };

        assert!(matches!(
            extract_remote(&value, &paths),
            Err(AdapterError::UnexpectedResponse(_))
        ));
    }
}
