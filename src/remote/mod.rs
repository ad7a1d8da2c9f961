//! Boundary to the managed backend that owns all durable state.
//!
//! Three object-safe traits cover what the dashboard needs from it: table
//! CRUD, object storage and password auth. [`rest::RestClient`] talks to a
//! Supabase-style HTTP API; [`memory::MemoryService`] keeps everything in
//! process for tests and local demos.

pub mod error;
pub mod memory;
pub mod query;
pub mod rest;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

pub use error::RemoteError;
pub use query::{Query, SortDir};

/// Table-scoped CRUD. Rows travel as JSON objects; typing happens in the store.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Filtered, ordered read.
    async fn select(&self, token: &str, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError>;

    /// Insert one row and return it as stored (with id and timestamps).
    async fn insert(&self, token: &str, table: &str, row: Value) -> Result<Value, RemoteError>;

    /// Partial update of the single row matching `filter`; returns the updated row.
    async fn update(&self, token: &str, table: &str, filter: &Query, patch: Value) -> Result<Value, RemoteError>;

    /// Delete every row matching `filter`.
    async fn delete(&self, token: &str, table: &str, filter: &Query) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        token: &str,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RemoteError>;

    async fn remove(&self, token: &str, bucket: &str, key: &str) -> Result<(), RemoteError>;

    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// An authenticated session issued by the backend's auth server.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, RemoteError>;

    /// Returns `None` when the account was created but needs e-mail confirmation.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, RemoteError>;

    async fn sign_out(&self, token: &str) -> Result<(), RemoteError>;
}
