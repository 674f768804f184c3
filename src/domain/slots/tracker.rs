//! Per-turn fact assembly: which slots to ask about and which verdicts
//! survive cross-slot validation.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use crate::domain::dialogue::DialogueGraph;
use crate::domain::foundation::{ConfigurationError, SlotId, StateId};
use crate::domain::slots::facts::SlotFacts;
use crate::domain::slots::template::{SlotDescriptor, SlotTemplate};

/// Raw per-slot verdicts as a classifier reports them, before validation.
pub type SlotVerdicts = BTreeMap<SlotId, bool>;

/// Stateless helper that mediates between the graph, the template, and the
/// classifier output for a single turn.
#[derive(Debug, Clone)]
pub struct SlotTracker {
    template: Arc<SlotTemplate>,
    graph: Arc<DialogueGraph>,
}

impl SlotTracker {
    pub fn new(template: Arc<SlotTemplate>, graph: Arc<DialogueGraph>) -> Self {
        Self { template, graph }
    }

    /// The slots to ask about while sitting in `state`.
    ///
    /// Returns the state's declared check list with each slot's linked
    /// validation slot following it directly, deduplicated, base order
    /// preserved.
    pub fn slots_to_check(&self, state: &StateId) -> Result<Vec<SlotId>, ConfigurationError> {
        let state_def = self.graph.state(state)?;

        let mut ordered = Vec::new();
        let mut seen = BTreeSet::new();
        for slot in state_def.slots_to_check() {
            let definition = self.template.get(slot.as_str()).ok_or_else(|| {
                ConfigurationError::unknown_slot(
                    format!("state `{state}` slots_to_check"),
                    slot.clone(),
                )
            })?;
            if seen.insert(slot.clone()) {
                ordered.push(slot.clone());
            }
            if let Some(validation) = definition.validation_slot() {
                if seen.insert(validation.clone()) {
                    ordered.push(validation.clone());
                }
            }
        }
        Ok(ordered)
    }

    /// Classifier-facing descriptors for the given slots, in the same order.
    pub fn describe(&self, slots: &[SlotId]) -> Result<Vec<SlotDescriptor>, ConfigurationError> {
        slots
            .iter()
            .map(|slot| {
                self.template
                    .get(slot.as_str())
                    .map(|definition| definition.descriptor())
                    .ok_or_else(|| {
                        ConfigurationError::unknown_slot("slot descriptors", slot.clone())
                    })
            })
            .collect()
    }

    /// Applies cross-slot validation, then keeps only the true verdicts.
    ///
    /// An explicitly false slot forces its validation slot false, and the
    /// forcing propagates through chains. Absent slots are unknown and force
    /// nothing.
    pub fn validate_and_filter(&self, mut verdicts: SlotVerdicts) -> SlotFacts {
        let mut queue: VecDeque<SlotId> = verdicts
            .iter()
            .filter(|(_, value)| !**value)
            .map(|(slot, _)| slot.clone())
            .collect();

        while let Some(slot) = queue.pop_front() {
            let Some(definition) = self.template.get(slot.as_str()) else {
                continue;
            };
            if let Some(validation) = definition.validation_slot() {
                if verdicts.get(validation) == Some(&true) {
                    verdicts.insert(validation.clone(), false);
                    queue.push_back(validation.clone());
                }
            }
        }

        verdicts
            .into_iter()
            .filter(|(_, value)| *value)
            .collect()
    }

    /// Pattern-based stand-in for the classifier when the provider is down.
    ///
    /// Every requested slot gets an explicit verdict: true when any of its
    /// patterns matches the raw user text, false otherwise. The result goes
    /// through the same validation as real classifier output.
    pub fn fallback_classify(&self, text: &str, slots: &[SlotId]) -> SlotFacts {
        let mut verdicts = SlotVerdicts::new();
        for slot in slots {
            let matched = self
                .template
                .get(slot.as_str())
                .is_some_and(|definition| definition.matches(text));
            verdicts.insert(slot.clone(), matched);
        }
        self.validate_and_filter(verdicts)
    }
}
