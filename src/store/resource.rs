use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::remote::{Query, SortDir};

/// Columns a patch may never touch, whatever the caller sends.
pub const IDENTITY_COLUMNS: [&str; 4] = ["id", "user_id", "campaign_id", "created_at"];

/// Anything kept in a [`super::mirror::Mirror`].
pub trait Keyed {
    fn key(&self) -> Uuid;
}

/// Fixed toast copy for one resource: `(title, description)` per outcome.
/// `{title}` in a description is replaced by the row's display title.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub load_failed: (&'static str, &'static str),
    pub created: (&'static str, &'static str),
    pub create_failed: (&'static str, &'static str),
    pub updated: (&'static str, &'static str),
    pub update_failed: (&'static str, &'static str),
    pub deleted: (&'static str, &'static str),
    pub delete_failed: (&'static str, &'static str),
}

/// A remote table the generic store can manage.
pub trait Resource: Keyed + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Insert payload, without owner or parent columns.
    type New: Serialize + Send + Sync;
    /// Partial update payload; `None` fields must not serialize.
    type Update: Serialize + Send + Sync;

    const TABLE: &'static str;
    /// Foreign key to the parent campaign, for child tables.
    const PARENT_COLUMN: Option<&'static str> = None;
    const MESSAGES: Messages;

    fn display_title(&self) -> String;

    /// Ordering of `list`.
    fn ordering(query: Query) -> Query {
        query.order("created_at", SortDir::Desc)
    }
}

/// Children carrying an explicit sibling order.
pub trait Ordered: Resource {
    const ORDER_COLUMN: &'static str = "order_index";

    fn order_index(&self) -> i32;
}

/// Drop identity columns from a JSON patch. Returns the names that were removed.
pub fn sanitize_patch(patch: &mut Value) -> Vec<String> {
    let mut dropped = vec![];
    if let Value::Object(fields) = patch {
        for column in IDENTITY_COLUMNS {
            if fields.remove(column).is_some() {
                dropped.push(column.to_string());
            }
        }
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_strips_identity_and_keeps_the_rest() {
        let mut patch = json!({
            "id": "other",
            "user_id": "someone-else",
            "campaign_id": "elsewhere",
            "created_at": "1999-01-01",
            "title": "Novo título"
        });
        let dropped = sanitize_patch(&mut patch);
        assert_eq!(dropped.len(), 4);
        assert_eq!(patch, json!({"title": "Novo título"}));
    }

    #[test]
    fn sanitize_leaves_clean_patch_untouched() {
        let mut patch = json!({"status": "paused"});
        assert!(sanitize_patch(&mut patch).is_empty());
        assert_eq!(patch, json!({"status": "paused"}));
    }
}
