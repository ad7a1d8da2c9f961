// src/remote/query.rs

use std::cmp::Ordering;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub dir: SortDir,
}

/// Equality filter on one column. The remote tables only ever need `eq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: String,
}

/// Row filter plus ordering for a single table.
///
/// Rendered to PostgREST query pairs by [`Query::filter_params`] /
/// [`Query::order_param`], and evaluated in-process by [`Query::matches`] /
/// [`Query::sort`] for the memory backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub orders: Vec<Order>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.conditions.push(Condition {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn order(mut self, column: &str, dir: SortDir) -> Self {
        self.orders.push(Order { column: column.to_string(), dir });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.orders.is_empty()
    }

    /// `column=eq.value` pairs, in insertion order.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|c| (c.column.clone(), format!("eq.{}", c.value)))
            .collect()
    }

    /// `col.asc,other.desc`, or None when unordered.
    pub fn order_param(&self) -> Option<String> {
        if self.orders.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .orders
            .iter()
            .map(|o| format!("{}.{}", o.column, o.dir.as_str()))
            .collect();
        Some(parts.join(","))
    }

    /// Full parameter list for a read: `select=*`, filters, then `order`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.filter_params());
        if let Some(order) = self.order_param() {
            params.push(("order".to_string(), order));
        }
        params
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|c| {
            row.get(&c.column)
                .map(|v| value_as_text(v) == c.value)
                .unwrap_or(false)
        })
    }

    /// Stable multi-column sort. Nulls sort last ascending and first
    /// descending, like Postgres.
    pub fn sort(&self, rows: &mut [Value]) {
        if self.orders.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            for order in &self.orders {
                let left = a.get(&order.column).unwrap_or(&Value::Null);
                let right = b.get(&order.column).unwrap_or(&Value::Null);
                let ord = compare_values(left, right);
                let ord = match order.dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => value_as_text(a).cmp(&value_as_text(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_render_filters_then_order() {
        let q = Query::new()
            .eq("user_id", "u1")
            .eq("campaign_id", "c9")
            .order("order_index", SortDir::Asc)
            .order("created_at", SortDir::Desc);
        let params = q.to_params();
        assert_eq!(params[0], ("select".to_string(), "*".to_string()));
        assert_eq!(params[1], ("user_id".to_string(), "eq.u1".to_string()));
        assert_eq!(params[2], ("campaign_id".to_string(), "eq.c9".to_string()));
        assert_eq!(
            params[3],
            ("order".to_string(), "order_index.asc,created_at.desc".to_string())
        );
    }

    #[test]
    fn unordered_query_has_no_order_param() {
        let q = Query::new().eq("id", 3);
        assert!(q.order_param().is_none());
        assert_eq!(q.filter_params(), vec![("id".to_string(), "eq.3".to_string())]);
    }

    #[test]
    fn matches_requires_every_condition() {
        let row = json!({"user_id": "u1", "campaign_id": "c1", "order_index": 2});
        assert!(Query::new().eq("user_id", "u1").matches(&row));
        assert!(Query::new().eq("user_id", "u1").eq("order_index", 2).matches(&row));
        assert!(!Query::new().eq("user_id", "u1").eq("campaign_id", "c2").matches(&row));
        assert!(!Query::new().eq("missing", "x").matches(&row));
    }

    #[test]
    fn sort_uses_secondary_key_on_ties() {
        let mut rows = vec![
            json!({"n": 1, "t": "2024-01-01"}),
            json!({"n": 0, "t": "2024-01-01"}),
            json!({"n": 1, "t": "2024-03-01"}),
        ];
        Query::new()
            .order("n", SortDir::Asc)
            .order("t", SortDir::Desc)
            .sort(&mut rows);
        assert_eq!(rows[0]["n"], 0);
        assert_eq!(rows[1]["t"], "2024-03-01");
        assert_eq!(rows[2]["t"], "2024-01-01");
    }

    #[test]
    fn nulls_last_ascending_first_descending() {
        let mut rows = vec![json!({"v": null}), json!({"v": "a"})];
        Query::new().order("v", SortDir::Asc).sort(&mut rows);
        assert_eq!(rows[0]["v"], "a");
        Query::new().order("v", SortDir::Desc).sort(&mut rows);
        assert!(rows[0]["v"].is_null());
    }
}
