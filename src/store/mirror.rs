use uuid::Uuid;

use super::resource::Keyed;

/// Request-local copy of the rows a store has seen.
///
/// Every change to the copy goes through these four operations; rows are
/// unique by key at all times.
#[derive(Debug, Clone)]
pub struct Mirror<T> {
    rows: Vec<T>,
}

impl<T> Default for Mirror<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Keyed + Clone> Mirror<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the remote list as the new truth.
    pub fn replace_all(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    /// Put a freshly created row at the head, dropping any stale copy of it.
    pub fn prepend(&mut self, row: T) {
        let key = row.key();
        self.rows.retain(|r| r.key() != key);
        self.rows.insert(0, row);
    }

    /// Swap in the server's version of a row. Returns false if the row is not mirrored.
    pub fn replace(&mut self, row: T) -> bool {
        let key = row.key();
        match self.rows.iter_mut().find(|r| r.key() == key) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: Uuid) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.key() != key);
        self.rows.len() != before
    }

    pub fn get(&self, key: Uuid) -> Option<&T> {
        self.rows.iter().find(|r| r.key() == key)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: Uuid,
        label: &'static str,
    }

    impl Keyed for Row {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    fn row(label: &'static str) -> Row {
        Row { id: Uuid::new_v4(), label }
    }

    #[test]
    fn prepend_keeps_row_unique_and_first() {
        let a = row("a");
        let b = row("b");
        let mut m = Mirror::new();
        m.replace_all(vec![a.clone(), b.clone()]);

        m.prepend(Row { id: b.id, label: "b2" });
        assert_eq!(m.len(), 2);
        assert_eq!(m.as_slice()[0].label, "b2");
        assert_eq!(m.as_slice().iter().filter(|r| r.id == b.id).count(), 1);
    }

    #[test]
    fn replace_only_touches_known_rows() {
        let a = row("a");
        let mut m = Mirror::new();
        m.replace_all(vec![a.clone()]);

        assert!(m.replace(Row { id: a.id, label: "a2" }));
        assert_eq!(m.get(a.id).unwrap().label, "a2");
        assert!(!m.replace(row("stranger")));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let a = row("a");
        let mut m = Mirror::new();
        m.replace_all(vec![a.clone(), row("b")]);
        assert!(m.remove(a.id));
        assert!(!m.remove(a.id));
        assert!(m.get(a.id).is_none());
    }
}
