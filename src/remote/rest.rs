//! HTTP client for a Supabase-style backend.
//!
//! Tables go through PostgREST (`/rest/v1`), files through the storage API
//! (`/storage/v1`) and sign-in through GoTrue (`/auth/v1`). Every request
//! carries the project's anon key; data and storage calls add the user's
//! access token so row-level security applies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{AuthService, AuthSession, DataService, ObjectStorage, Query, RemoteError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_ROW: &str = "return=representation";

pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: RemoteUser,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl RestClient {
    /// * `base_url` - project URL, e.g. `https://xyz.supabase.co`.
    /// * `anon_key` - public API key sent as `apikey` on every request.
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, anon_key))
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, key)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Turn a non-2xx response into a [`RemoteError`], keeping the backend's message.
    async fn check(response: reqwest::Response, table: &str) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        match code {
            401 => Err(RemoteError::Unauthorized),
            // PostgREST answers 406 when a single-object request matched zero rows
            406 => Err(RemoteError::NotFound { table: table.to_string() }),
            _ => Err(RemoteError::Api { status: code, message: error_message(&body) }),
        }
    }
}

/// Pull a human-readable message out of a PostgREST / GoTrue / storage error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str))
        })
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl DataService for RestClient {
    async fn select(&self, token: &str, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&query.to_params())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response, table).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn insert(&self, token: &str, table: &str, row: Value) -> Result<Value, RemoteError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", RETURN_ROW)
            .header(ACCEPT, SINGLE_OBJECT)
            .bearer_auth(token)
            .json(&row)
            .send()
            .await?;
        let response = Self::check(response, table).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn update(&self, token: &str, table: &str, filter: &Query, patch: Value) -> Result<Value, RemoteError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&filter.filter_params())
            .header("apikey", &self.anon_key)
            .header("Prefer", RETURN_ROW)
            .header(ACCEPT, SINGLE_OBJECT)
            .bearer_auth(token)
            .json(&patch)
            .send()
            .await?;
        let response = Self::check(response, table).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn delete(&self, token: &str, table: &str, filter: &Query) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&filter.filter_params())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response, table).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for RestClient {
    async fn upload(
        &self,
        token: &str,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.object_url(bucket, key))
            .header("apikey", &self.anon_key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .bearer_auth(token)
            .body(bytes)
            .send()
            .await?;
        Self::check(response, bucket).await?;
        Ok(())
    }

    async fn remove(&self, token: &str, bucket: &str, key: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.object_url(bucket, key))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response, bucket).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, key)
    }
}

#[async_trait]
impl AuthService for RestClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, RemoteError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::check(response, "auth").await?;
        let token: TokenResponse = response.json().await?;
        Ok(into_session(token, email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, RemoteError> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::check(response, "auth").await?;
        let body: Value = response.json().await?;

        // With e-mail confirmation enabled the backend returns the bare user, no token
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let token: TokenResponse = serde_json::from_value(body)?;
        Ok(Some(into_session(token, email)))
    }

    async fn sign_out(&self, token: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response, "auth").await?;
        Ok(())
    }
}

fn into_session(token: TokenResponse, fallback_email: &str) -> AuthSession {
    AuthSession {
        access_token: token.access_token,
        user_id: token.user.id,
        email: token.user.email.unwrap_or_else(|| fallback_email.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(error_message(r#"{"message":"duplicate key"}"#), "duplicate key");
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let client = RestClient::with_client(reqwest::Client::new(), "https://proj.example.co/", "anon");
        assert_eq!(client.table_url("campaigns"), "https://proj.example.co/rest/v1/campaigns");
        assert_eq!(
            client.public_url("campaign-covers", "abc-1.png"),
            "https://proj.example.co/storage/v1/object/public/campaign-covers/abc-1.png"
        );
        assert_eq!(client.auth_url("token"), "https://proj.example.co/auth/v1/token");
    }
}
