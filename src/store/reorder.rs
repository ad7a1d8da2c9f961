//! Sibling reordering as a compensated sequence of single-row updates.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Ordered, ResourceStore, Toast};

/// Target index for each id: its position in the requested order.
pub fn plan(ids: &[Uuid]) -> Vec<(Uuid, i32)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    Applied,
    /// Nothing was written (bad input or the pre-read failed).
    Aborted,
    /// Step `failed_at` failed; earlier steps were restored.
    RolledBack { failed_at: Uuid },
    /// Step `failed_at` failed and some restores failed too.
    Inconsistent { failed_at: Uuid, unrestored: Vec<Uuid> },
}

impl ReorderOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReorderOutcome::Applied)
    }
}

const REORDER_FAILED: (&str, &str) = (
    "Erro ao reordenar materiais",
    "Não foi possível reordenar os materiais.",
);
const REORDERED: (&str, &str) = ("Ordem atualizada!", "A nova ordem foi salva.");

impl<R: Ordered> ResourceStore<R> {
    /// Give each id the index of its position, one update per id, then
    /// re-list. `ids` must name every sibling exactly once. The current
    /// indices are read first; if any update fails the ones already written
    /// are put back in reverse order.
    pub async fn reorder(&mut self, ids: &[Uuid]) -> ReorderOutcome {
        self.list().await;
        if self.session_expired() {
            return ReorderOutcome::Aborted;
        }

        let previous: HashMap<Uuid, i32> = self
            .rows()
            .iter()
            .map(|r| (r.key(), r.order_index()))
            .collect();

        let unknown: Vec<&Uuid> = ids.iter().filter(|id| !previous.contains_key(*id)).collect();
        let missing: Vec<&Uuid> = previous.keys().filter(|id| !ids.contains(*id)).collect();
        if !unknown.is_empty() || !missing.is_empty() || has_duplicates(ids) {
            log::warn!(
                "Reorder of {} rejected: unknown {:?}, missing {:?}, {} ids sent",
                R::TABLE,
                unknown,
                missing,
                ids.len()
            );
            self.notify(Toast::error(REORDER_FAILED.0, REORDER_FAILED.1));
            return ReorderOutcome::Aborted;
        }

        let steps = plan(ids);
        let mut applied: Vec<Uuid> = Vec::with_capacity(steps.len());
        let mut outcome = ReorderOutcome::Applied;

        for (id, index) in &steps {
            let patch = order_patch(R::ORDER_COLUMN, *index);
            match self.apply_patch(*id, patch).await {
                Ok(_) => applied.push(*id),
                Err(e) => {
                    self.record_failure("reorder", &e, REORDER_FAILED);
                    outcome = self.compensate(&applied, &previous, *id).await;
                    break;
                }
            }
        }

        if outcome.is_applied() {
            self.notify(Toast::success(REORDERED.0, REORDERED.1));
        }
        self.list().await;
        outcome
    }

    async fn compensate(
        &mut self,
        applied: &[Uuid],
        previous: &HashMap<Uuid, i32>,
        failed_at: Uuid,
    ) -> ReorderOutcome {
        let mut unrestored = vec![];
        for id in applied.iter().rev() {
            let Some(index) = previous.get(id) else { continue };
            let patch = order_patch(R::ORDER_COLUMN, *index);
            if let Err(e) = self.apply_patch(*id, patch).await {
                log::error!("Could not restore {} order of {}: {}", R::TABLE, id, e);
                unrestored.push(*id);
            }
        }
        if unrestored.is_empty() {
            ReorderOutcome::RolledBack { failed_at }
        } else {
            ReorderOutcome::Inconsistent { failed_at, unrestored }
        }
    }
}

fn order_patch(column: &str, index: i32) -> Value {
    let mut fields = Map::new();
    fields.insert(column.to_string(), Value::from(index));
    Value::Object(fields)
}

fn has_duplicates(ids: &[Uuid]) -> bool {
    let mut seen = std::collections::HashSet::new();
    !ids.iter().all(|id| seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_assigns_positions() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let steps = plan(&ids);
        assert_eq!(steps, vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]);
    }

    #[test]
    fn plan_is_stable_across_calls() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        assert_eq!(plan(&ids), plan(&ids));
    }

    #[test]
    fn duplicates_are_detected() {
        let a = Uuid::new_v4();
        assert!(has_duplicates(&[a, Uuid::new_v4(), a]));
        assert!(!has_duplicates(&[a, Uuid::new_v4()]));
    }
}
