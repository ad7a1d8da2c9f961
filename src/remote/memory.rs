//! In-process backend with the same contract as the REST client.
//!
//! Backs the integration tests and `REMOTE_BACKEND=memory` demo runs. Rows get
//! a v4 id and strictly increasing timestamps on insert. Failures can be
//! injected per operation to exercise the error and compensation paths.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{AuthService, AuthSession, DataService, ObjectStorage, Query, RemoteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
    Remove,
}

#[derive(Debug)]
struct FailRule {
    op: Operation,
    successes_left: usize,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    size: usize,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: Uuid,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, StoredObject>,
    accounts: HashMap<String, Account>,
    revoked: HashSet<String>,
    calls: HashMap<Operation, usize>,
    fail_rules: Vec<FailRule>,
    last_timestamp: Option<DateTime<Utc>>,
}

pub struct MemoryService {
    inner: Mutex<Inner>,
    base_url: String,
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryService {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            base_url: "http://localhost:54321".to_string(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the call of `op` that follows `successes` successful ones fail once.
    pub fn fail_after(&self, op: Operation, successes: usize) {
        self.lock().fail_rules.push(FailRule { op, successes_left: successes });
    }

    /// Number of calls issued for `op`, failed ones included.
    pub fn calls(&self, op: Operation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Every row currently in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Insert a raw row without going through the call counters.
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let mut inner = self.lock();
        let stored = stamp_new_row(&mut inner, row);
        inner.tables.entry(table.to_string()).or_default().push(stored.clone());
        stored
    }

    /// `bucket/key` for every stored object.
    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object_size(&self, bucket: &str, key: &str) -> Option<usize> {
        self.lock().objects.get(&format!("{bucket}/{key}")).map(|o| o.size)
    }

    pub fn object_content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.lock()
            .objects
            .get(&format!("{bucket}/{key}"))
            .map(|o| o.content_type.clone())
    }

    /// Reject every later call carrying `token` with 401.
    pub fn revoke(&self, token: &str) {
        self.lock().revoked.insert(token.to_string());
    }

    /// Record call, check the token, and fire any armed failure.
    fn enter(inner: &mut Inner, op: Operation, token: Option<&str>) -> Result<(), RemoteError> {
        *inner.calls.entry(op).or_insert(0) += 1;

        if let Some(token) = token {
            if inner.revoked.contains(token) {
                return Err(RemoteError::Unauthorized);
            }
        }

        if let Some(pos) = inner.fail_rules.iter().position(|r| r.op == op) {
            if inner.fail_rules[pos].successes_left == 0 {
                inner.fail_rules.remove(pos);
                return Err(RemoteError::Api {
                    status: 500,
                    message: format!("injected {op:?} failure"),
                });
            }
            inner.fail_rules[pos].successes_left -= 1;
        }
        Ok(())
    }
}

/// Strictly increasing so `created_at desc` is deterministic in tests.
fn next_timestamp(inner: &mut Inner) -> String {
    let mut now = Utc::now();
    if let Some(last) = inner.last_timestamp {
        if now <= last {
            now = last + Duration::microseconds(1);
        }
    }
    inner.last_timestamp = Some(now);
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn stamp_new_row(inner: &mut Inner, row: Value) -> Value {
    let mut object = match row {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let ts = next_timestamp(inner);
    object
        .entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    object
        .entry("created_at")
        .or_insert_with(|| Value::String(ts.clone()));
    object.entry("updated_at").or_insert_with(|| Value::String(ts));
    Value::Object(object)
}

#[async_trait]
impl DataService for MemoryService {
    async fn select(&self, token: &str, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Select, Some(token))?;

        let mut rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        query.sort(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, token: &str, table: &str, row: Value) -> Result<Value, RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Insert, Some(token))?;

        if !row.is_object() {
            return Err(RemoteError::Api { status: 400, message: "row must be an object".to_string() });
        }
        let stored = stamp_new_row(&mut inner, row);
        inner.tables.entry(table.to_string()).or_default().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, token: &str, table: &str, filter: &Query, patch: Value) -> Result<Value, RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Update, Some(token))?;

        let Value::Object(changes) = patch else {
            return Err(RemoteError::Api { status: 400, message: "patch must be an object".to_string() });
        };
        let ts = next_timestamp(&mut inner);
        let rows = inner.tables.entry(table.to_string()).or_default();

        let matched: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();
        match matched.as_slice() {
            [] => Err(RemoteError::NotFound { table: table.to_string() }),
            [index] => {
                let row = &mut rows[*index];
                if let Value::Object(fields) = &mut *row {
                    for (key, value) in changes {
                        fields.insert(key, value);
                    }
                    fields.insert("updated_at".to_string(), Value::String(ts));
                }
                Ok(row.clone())
            }
            _ => Err(RemoteError::Api {
                status: 406,
                message: "update matched more than one row".to_string(),
            }),
        }
    }

    async fn delete(&self, token: &str, table: &str, filter: &Query) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Delete, Some(token))?;

        if let Some(rows) = inner.tables.get_mut(table) {
            rows.retain(|r| !filter.matches(r));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MemoryService {
    async fn upload(
        &self,
        token: &str,
        bucket: &str,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Upload, Some(token))?;

        let path = format!("{bucket}/{key}");
        if inner.objects.contains_key(&path) {
            return Err(RemoteError::Api { status: 409, message: "The resource already exists".to_string() });
        }
        inner.objects.insert(
            path,
            StoredObject { content_type: content_type.to_string(), size: bytes.len() },
        );
        Ok(())
    }

    async fn remove(&self, token: &str, bucket: &str, key: &str) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        Self::enter(&mut inner, Operation::Remove, Some(token))?;
        inner.objects.remove(&format!("{bucket}/{key}"));
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, key)
    }
}

#[async_trait]
impl AuthService for MemoryService {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, RemoteError> {
        let inner = self.lock();
        let account = inner
            .accounts
            .get(&email.to_lowercase())
            .filter(|a| a.password == password)
            .cloned()
            .ok_or_else(|| RemoteError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })?;

        Ok(AuthSession {
            access_token: Uuid::new_v4().simple().to_string(),
            user_id: account.user_id,
            email: email.to_lowercase(),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, RemoteError> {
        let mut inner = self.lock();
        let email = email.to_lowercase();
        if inner.accounts.contains_key(&email) {
            return Err(RemoteError::Api { status: 422, message: "User already registered".to_string() });
        }
        let user_id = Uuid::new_v4();
        inner.accounts.insert(email.clone(), Account { password: password.to_string(), user_id });
        Ok(Some(AuthSession {
            access_token: Uuid::new_v4().simple().to_string(),
            user_id,
            email,
        }))
    }

    async fn sign_out(&self, token: &str) -> Result<(), RemoteError> {
        self.lock().revoked.insert(token.to_string());
        Ok(())
    }
}
