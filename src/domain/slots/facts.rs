//! Accumulated boolean case facts for one conversation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::SlotId;

/// Sparse map of slot id to observed value.
///
/// Absence means "unknown", not "false". Facts are monotone: once a slot is
/// recorded, [`merge_new`](SlotFacts::merge_new) never overwrites it, so a
/// fact confirmed in an early turn survives every later turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotFacts(BTreeMap<SlotId, bool>);

impl SlotFacts {
    /// Creates an empty fact map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value for a slot, overwriting any existing entry.
    ///
    /// This is the raw mutation used while assembling a per-turn result;
    /// cross-turn accumulation goes through [`merge_new`](SlotFacts::merge_new)
    /// instead.
    pub fn set(&mut self, slot: SlotId, value: bool) {
        self.0.insert(slot, value);
    }

    /// Returns the recorded value for a slot, if any.
    pub fn get(&self, slot: &str) -> Option<bool> {
        self.0.get(slot).copied()
    }

    /// Returns true only if the slot is recorded with value true.
    ///
    /// An unknown slot counts as false, matching how conditions treat
    /// unobserved facts.
    pub fn is_true(&self, slot: &str) -> bool {
        self.get(slot).unwrap_or(false)
    }

    /// Returns whether the slot has any recorded value.
    pub fn contains(&self, slot: &str) -> bool {
        self.0.contains_key(slot)
    }

    /// Folds newly observed facts into this map without overwriting.
    ///
    /// Only slot ids absent from `self` are added; existing entries keep
    /// their first recorded value forever.
    pub fn merge_new(&mut self, newly: &SlotFacts) {
        for (slot, value) in newly.iter() {
            if !self.0.contains_key(slot) {
                self.0.insert(slot.clone(), *value);
            }
        }
    }

    /// Iterates over the slots recorded as true.
    pub fn true_slots(&self) -> impl Iterator<Item = &SlotId> {
        self.0
            .iter()
            .filter_map(|(slot, value)| value.then_some(slot))
    }

    /// Iterates over all recorded entries in slot-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &bool)> {
        self.0.iter()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no facts have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SlotId, bool)> for SlotFacts {
    fn from_iter<I: IntoIterator<Item = (SlotId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, bool)> for SlotFacts {
    fn from_iter<I: IntoIterator<Item = (&'a str, bool)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(slot, value)| (SlotId::from(slot), value))
                .collect(),
        )
    }
}
