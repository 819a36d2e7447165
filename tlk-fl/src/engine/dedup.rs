//! Per-invocation deduplication state

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::Listing;

/// Ids already placed in the working result during one invocation
///
/// **[FLS-DEDUP-010]** Passed through the pipeline stages as an explicit
/// value; discarded when the invocation completes. Guards against an entity
/// surfacing from two tier queries when its flags are inconsistent
/// (`is_vip` and `is_top` both set).
#[derive(Debug, Default)]
pub struct SelectionState {
    used_ids: HashSet<Uuid>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop candidates already selected earlier in this invocation and
    /// record the survivors
    pub fn admit<E: Listing>(&mut self, candidates: Vec<E>) -> Vec<E> {
        candidates
            .into_iter()
            .filter(|entity| self.used_ids.insert(entity.id()))
            .collect()
    }

    pub fn is_used(&self, id: Uuid) -> bool {
        self.used_ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.used_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tutor;

    fn tutor(name: &str) -> Tutor {
        Tutor::new(name.to_string())
    }

    #[test]
    fn admit_records_survivors() {
        let mut state = SelectionState::new();
        let a = tutor("a");
        let id = a.id;
        let kept = state.admit(vec![a]);
        assert_eq!(kept.len(), 1);
        assert!(state.is_used(id));
    }

    #[test]
    fn admit_drops_already_used() {
        let mut state = SelectionState::new();
        let a = tutor("a");
        let duplicate = a.clone();
        assert_eq!(state.admit(vec![a]).len(), 1);
        assert_eq!(state.admit(vec![duplicate]).len(), 0);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn admit_dedups_within_one_batch() {
        let mut state = SelectionState::new();
        let a = tutor("a");
        let duplicate = a.clone();
        let b = tutor("b");
        let kept = state.admit(vec![a, duplicate, b]);
        assert_eq!(kept.len(), 2);
    }
}
