//! Request executor shared by all resource clients.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, IF_MATCH, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::auth::TokenManager;
use crate::filter::FilterRequest;
use crate::user_agent::user_agent;
use crate::{Error, ErrorKind, Result};

pub(crate) struct ClientInner {
    /// The UAA base URL.
    pub base_url: Url,

    /// HTTP client (redirects disabled).
    pub http: reqwest::Client,

    /// Access token owner for this connection.
    pub tokens: TokenManager,
}

impl ClientInner {
    /// Resolves a path against the base URL, keeping any base path prefix.
    fn build_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    /// Builds the headers of an authenticated JSON request.
    async fn build_headers(&self, if_match: Option<&str>) -> Result<HeaderMap> {
        let token = self.tokens.token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent()));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token.authorization_header()).map_err(|_| {
                Error::new(ErrorKind::InvalidResponse, "access token is not a valid header value")
            })?,
        );

        if let Some(version) = if_match {
            headers.insert(
                IF_MATCH,
                HeaderValue::from_str(version)
                    .map_err(|_| Error::invalid_argument("invalid If-Match version"))?,
            );
        }

        Ok(headers)
    }

    async fn request(&self, method: Method, url: Url, if_match: Option<&str>) -> Result<RequestBuilder> {
        tracing::debug!(method = %method, url = %url, "sending request");
        let headers = self.build_headers(if_match).await?;
        Ok(self.http.request(method, url).headers(headers))
    }

    /// Makes a GET request.
    pub(crate) async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let response = self.execute(self.request(Method::GET, url, None).await?).await?;
        Self::decode(response).await
    }

    /// Makes a GET request with the query parameters of a filter request.
    pub(crate) async fn search<R>(&self, path: &str, filter: &FilterRequest) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let mut url = self.build_url(path)?;
        filter.apply_to(&mut url);
        let response = self.execute(self.request(Method::GET, url, None).await?).await?;
        Self::decode(response).await
    }

    /// Makes a POST request with a JSON body.
    pub(crate) async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let request = self.request(Method::POST, url, None).await?.json(body);
        Self::decode(self.execute(request).await?).await
    }

    /// Makes a PUT request with a JSON body, optionally guarded by `If-Match`.
    pub(crate) async fn put<T, R>(&self, path: &str, body: &T, if_match: Option<&str>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path)?;
        let request = self.request(Method::PUT, url, if_match).await?.json(body);
        Self::decode(self.execute(request).await?).await
    }

    /// Makes a PUT request and discards the response body.
    pub(crate) async fn put_discard<T>(&self, path: &str, body: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        let request = self.request(Method::PUT, url, None).await?.json(body);
        self.execute(request).await.map(drop)
    }

    /// Makes a DELETE request and discards the response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path)?;
        let request = self.request(Method::DELETE, url, None).await?;
        self.execute(request).await.map(drop)
    }

    /// Sends a request and maps non-success statuses to errors.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = Error::from_status(status.as_u16(), &body);
        if err.should_refresh_token() {
            tracing::warn!(status = status.as_u16(), "request rejected, access token may be revoked");
        } else {
            tracing::debug!(status = status.as_u16(), error = %err, "request failed");
        }
        Err(err)
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
        })
    }
}
