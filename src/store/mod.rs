//! Request-local access to one remote table.
//!
//! A [`ResourceStore`] is scoped to the signed-in owner and, for child tables,
//! to one parent campaign. It keeps a [`Mirror`] of the rows it has seen, a
//! loading flag, and the toasts produced by each call. Remote failures never
//! escape: they are logged, turned into a fixed toast, and leave the mirror as
//! it was.

pub mod mirror;
pub mod reorder;
pub mod resource;
pub mod toast;
pub mod upload;

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::remote::{DataService, Query, RemoteError};

pub use mirror::Mirror;
pub use resource::{Keyed, Messages, Ordered, Resource, sanitize_patch};
pub use toast::{Toast, ToastKind};

/// The signed-in user every read and write is filtered by.
#[derive(Debug, Clone)]
pub struct Owner {
    pub user_id: Uuid,
    pub access_token: String,
}

/// How the mirror follows a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SyncPolicy {
    /// Patch the mirror with the row the backend returned.
    #[default]
    Merge,
    /// Re-list from the backend after every mutation.
    Refetch,
}

pub struct ResourceStore<R: Resource> {
    service: Arc<dyn DataService>,
    owner: Owner,
    parent: Option<Uuid>,
    policy: SyncPolicy,
    mirror: Mirror<R>,
    loading: bool,
    toasts: Vec<Toast>,
    session_expired: bool,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(service: Arc<dyn DataService>, owner: Owner) -> Self {
        Self {
            service,
            owner,
            parent: None,
            policy: SyncPolicy::default(),
            mirror: Mirror::new(),
            loading: false,
            toasts: Vec::new(),
            session_expired: false,
        }
    }

    /// Store for a child table, restricted to one campaign.
    pub fn scoped(service: Arc<dyn DataService>, owner: Owner, parent: Uuid) -> Self {
        let mut store = Self::new(service, owner);
        store.parent = Some(parent);
        store
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rows(&self) -> &[R] {
        self.mirror.as_slice()
    }

    pub fn into_rows(self) -> Vec<R> {
        self.mirror.into_vec()
    }

    pub fn find(&self, id: Uuid) -> Option<&R> {
        self.mirror.get(id)
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the backend rejected the access token.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub(crate) fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Owner filter, plus the parent filter for scoped stores.
    fn scope_query(&self) -> Query {
        let mut query = Query::new().eq("user_id", self.owner.user_id);
        if let (Some(column), Some(parent)) = (R::PARENT_COLUMN, self.parent) {
            query = query.eq(column, parent);
        }
        query
    }

    /// Filter that pins a single row of this owner (and parent, when scoped).
    fn row_query(&self, id: Uuid) -> Query {
        self.scope_query().eq("id", id)
    }

    /// Log a caught remote failure and queue its toast.
    pub(crate) fn record_failure(&mut self, action: &str, err: &RemoteError, toast: (&str, &str)) {
        log::error!("{} {} failed: {}", action, R::TABLE, err);
        if err.is_unauthorized() {
            self.session_expired = true;
        }
        self.toasts.push(Toast::error(toast.0, toast.1));
    }

    async fn fetch(&self) -> Result<Vec<R>, RemoteError> {
        let query = R::ordering(self.scope_query());
        let rows = self
            .service
            .select(&self.owner.access_token, R::TABLE, &query)
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value::<R>(row).map_err(RemoteError::from))
            .collect()
    }

    /// Filtered, ordered read into the mirror. On failure the previous
    /// mirror is kept and an error toast is queued.
    pub async fn list(&mut self) -> &[R] {
        self.loading = true;
        match self.fetch().await {
            Ok(rows) => self.mirror.replace_all(rows),
            Err(e) => self.record_failure("list", &e, R::MESSAGES.load_failed),
        }
        self.loading = false;
        self.mirror.as_slice()
    }

    pub async fn refetch(&mut self) -> &[R] {
        self.list().await
    }

    /// Insert with owner (and parent) attached. The stored row goes to the
    /// head of the mirror.
    pub async fn create(&mut self, new: &R::New) -> Option<R> {
        let result = self.insert_row(new).await;
        match result {
            Ok(row) => {
                let (title, description) = R::MESSAGES.created;
                let description = description.replace("{title}", &row.display_title());
                self.toasts.push(Toast::success(title, &description));
                self.sync_created(row.clone()).await;
                Some(row)
            }
            Err(e) => {
                self.record_failure("create", &e, R::MESSAGES.create_failed);
                None
            }
        }
    }

    async fn insert_row(&self, new: &R::New) -> Result<R, RemoteError> {
        let mut row = serde_json::to_value(new)?;
        let Value::Object(fields) = &mut row else {
            return Err(RemoteError::Api { status: 400, message: "insert payload is not an object".to_string() });
        };
        fields.insert("user_id".to_string(), Value::String(self.owner.user_id.to_string()));
        if let Some(column) = R::PARENT_COLUMN {
            let parent = self.parent.ok_or_else(|| RemoteError::Api {
                status: 400,
                message: format!("{} rows need a parent campaign", R::TABLE),
            })?;
            fields.insert(column.to_string(), Value::String(parent.to_string()));
        }

        let stored = self
            .service
            .insert(&self.owner.access_token, R::TABLE, row)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Partial update filtered by id, owner and parent. Identity columns are dropped
    /// from the patch before it leaves the process.
    pub async fn update(&mut self, id: Uuid, patch: &R::Update) -> Option<R> {
        let value = match serde_json::to_value(patch) {
            Ok(v) => v,
            Err(e) => {
                self.record_failure("update", &RemoteError::from(e), R::MESSAGES.update_failed);
                return None;
            }
        };
        self.update_value(id, value).await
    }

    /// Same as [`update`](Self::update) for an untyped JSON patch.
    pub async fn update_value(&mut self, id: Uuid, mut patch: Value) -> Option<R> {
        let dropped = sanitize_patch(&mut patch);
        if !dropped.is_empty() {
            log::warn!("Ignoring identity columns {:?} in {} patch", dropped, R::TABLE);
        }
        if patch.as_object().is_none_or(|fields| fields.is_empty()) {
            log::warn!("Empty patch for {} {}, nothing sent", R::TABLE, id);
            return None;
        }

        match self.apply_patch(id, patch).await {
            Ok(row) => {
                let (title, description) = R::MESSAGES.updated;
                self.toasts.push(Toast::success(title, description));
                self.sync_updated(row.clone()).await;
                Some(row)
            }
            Err(e) => {
                self.record_failure("update", &e, R::MESSAGES.update_failed);
                None
            }
        }
    }

    /// Raw update without toasts or mirror changes. Used by the multi-step
    /// operations, which report once for the whole sequence.
    pub(crate) async fn apply_patch(&self, id: Uuid, patch: Value) -> Result<R, RemoteError> {
        let stored = self
            .service
            .update(&self.owner.access_token, R::TABLE, &self.row_query(id), patch)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete(&mut self, id: Uuid) -> bool {
        let result = self
            .service
            .delete(&self.owner.access_token, R::TABLE, &self.row_query(id))
            .await;
        match result {
            Ok(()) => {
                let (title, description) = R::MESSAGES.deleted;
                self.toasts.push(Toast::success(title, description));
                match self.policy {
                    SyncPolicy::Merge => {
                        self.mirror.remove(id);
                    }
                    SyncPolicy::Refetch => {
                        self.list().await;
                    }
                }
                true
            }
            Err(e) => {
                self.record_failure("delete", &e, R::MESSAGES.delete_failed);
                false
            }
        }
    }

    async fn sync_created(&mut self, row: R) {
        match self.policy {
            SyncPolicy::Merge => self.mirror.prepend(row),
            SyncPolicy::Refetch => {
                self.list().await;
            }
        }
    }

    pub(crate) async fn sync_updated(&mut self, row: R) {
        match self.policy {
            SyncPolicy::Merge => {
                self.mirror.replace(row);
            }
            SyncPolicy::Refetch => {
                self.list().await;
            }
        }
    }
}
