//! Identity-provider client.
//!
//! Sign-in happens entirely between the frontend and the provider; this
//! service only ever asks the provider one question: whose token is this?

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::{ApiError, ApiResult, GetField};

#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    user_url: String,
    service_key: String,
}

impl IdentityClient {
    pub fn new(identity_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            user_url: format!("{}/auth/v1/user", identity_url.trim_end_matches('/')),
            service_key: service_key.to_owned(),
        }
    }

    /// Resolve a bearer token to the provider's stable person id. Any
    /// non-success answer from the provider means the token is no good.
    pub async fn resolve(&self, token: &str) -> ApiResult<String> {
        let res = self
            .http
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ApiError::InvalidToken);
        }

        let body: serde_json::Value = res.json().await?;
        body.get_str_field("id")
    }
}

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();

    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

    use super::bearer_token;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn strips_the_bearer_prefix() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn lowercase_prefix_is_accepted() {
        let headers = headers_with("bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn empty_token_is_unauthorized() {
        let headers = headers_with("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }
}
