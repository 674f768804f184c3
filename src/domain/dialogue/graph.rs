//! Dialogue graph: states, edges, policies, and shared conditions.
//!
//! # Design
//!
//! The graph is loaded once at startup, validated against the slot template,
//! and then shared read-only across all conversations. Each state declares
//! which slots to check, which of those drive transitions, and a set of named
//! edges. An edge fires when the newly observed true slots exactly equal one
//! of its enumerated combinations. Every edge maps to a policy node: either a
//! direct jump or a reference into the shared condition arena.
//!
//! Validation is strict by intent. A mistyped slot, a policy-less edge, or a
//! condition cycle is a deployment defect and must fail at load, not at the
//! first conversation that happens to reach it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{ActionId, ConditionName, ConfigurationError, EdgeName, SlotId, StateId};
use crate::domain::slots::SlotTemplate;

/// Reserved next-state name meaning "stay in the current state".
///
/// Valid only inside policy nodes; it may not be declared as a state id or
/// used as a fallback target.
pub const CURRENT_STATE_SENTINEL: &str = "current_state";

/// Resolved outcome of an edge: jump somewhere, or consult a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PolicyNode {
    /// Jump straight to `next_state` and reply with `action`.
    Direct { next_state: StateId, action: ActionId },
    /// Defer to a named condition in the shared arena.
    Conditional { condition: ConditionName },
}

impl PolicyNode {
    /// A direct jump node.
    pub fn direct(next_state: impl Into<StateId>, action: impl Into<ActionId>) -> Self {
        Self::Direct {
            next_state: next_state.into(),
            action: action.into(),
        }
    }

    /// A reference to a named condition.
    pub fn conditional(condition: impl Into<ConditionName>) -> Self {
        Self::Conditional {
            condition: condition.into(),
        }
    }
}

/// One branching point: pick a policy by the truth of a single slot.
///
/// Branches are themselves policy nodes, so conditions can chain through the
/// arena by name. Cycles are rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionNode {
    conditional_slot: SlotId,
    if_true: PolicyNode,
    if_false: PolicyNode,
}

impl ConditionNode {
    pub fn new(conditional_slot: impl Into<SlotId>, if_true: PolicyNode, if_false: PolicyNode) -> Self {
        Self {
            conditional_slot: conditional_slot.into(),
            if_true,
            if_false,
        }
    }

    /// The slot whose accumulated truth picks the branch.
    pub fn conditional_slot(&self) -> &SlotId {
        &self.conditional_slot
    }

    pub fn if_true(&self) -> &PolicyNode {
        &self.if_true
    }

    pub fn if_false(&self) -> &PolicyNode {
        &self.if_false
    }
}

/// One dialogue state and everything the engine needs while sitting in it.
#[derive(Debug, Clone)]
pub struct StateDef {
    id: StateId,
    slots_to_check: Vec<SlotId>,
    slots_for_transition: BTreeSet<SlotId>,
    edges: BTreeMap<EdgeName, Vec<BTreeSet<SlotId>>>,
    policies: BTreeMap<EdgeName, PolicyNode>,
    fallback_edge: EdgeName,
    fallback_state: StateId,
    fallback_action: ActionId,
}

impl StateDef {
    /// Creates an empty state. Fallback routing starts unset and is
    /// rejected by [`DialogueGraph::validate`] until provided.
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            slots_to_check: Vec::new(),
            slots_for_transition: BTreeSet::new(),
            edges: BTreeMap::new(),
            policies: BTreeMap::new(),
            fallback_edge: EdgeName::new(""),
            fallback_state: StateId::new(""),
            fallback_action: ActionId::new(""),
        }
    }

    /// Slots the classifier is asked about in this state, in prompt order.
    pub fn with_slots_to_check<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SlotId>,
    {
        self.slots_to_check = slots.into_iter().map(Into::into).collect();
        self
    }

    /// Subset of checked slots that can drive a transition.
    pub fn with_transition_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SlotId>,
    {
        self.slots_for_transition = slots.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an edge with its enumerated slot combinations.
    ///
    /// The empty combination is legal and matches a turn that surfaced no
    /// new transition slots.
    pub fn with_edge<N, C, S>(mut self, name: N, combinations: C) -> Self
    where
        N: Into<EdgeName>,
        C: IntoIterator,
        C::Item: IntoIterator<Item = S>,
        S: Into<SlotId>,
    {
        let combinations = combinations
            .into_iter()
            .map(|combination| combination.into_iter().map(Into::into).collect())
            .collect();
        self.edges.insert(name.into(), combinations);
        self
    }

    /// Attaches the policy consulted when the named edge fires.
    pub fn with_policy(mut self, edge: impl Into<EdgeName>, policy: PolicyNode) -> Self {
        self.policies.insert(edge.into(), policy);
        self
    }

    /// Sets the fallback route used when no combination matches and the
    /// static route used when resolution itself fails.
    pub fn with_fallback(
        mut self,
        edge: impl Into<EdgeName>,
        state: impl Into<StateId>,
        action: impl Into<ActionId>,
    ) -> Self {
        self.fallback_edge = edge.into();
        self.fallback_state = state.into();
        self.fallback_action = action.into();
        self
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn slots_to_check(&self) -> &[SlotId] {
        &self.slots_to_check
    }

    pub fn slots_for_transition(&self) -> &BTreeSet<SlotId> {
        &self.slots_for_transition
    }

    /// Edges with their combinations. Order is irrelevant to matching
    /// because combinations are disjoint across all edges of a state.
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeName, &[BTreeSet<SlotId>])> {
        self.edges.iter().map(|(name, combos)| (name, combos.as_slice()))
    }

    /// Looks up the policy attached to an edge.
    pub fn policy(&self, edge: &str) -> Option<&PolicyNode> {
        self.policies.get(edge)
    }

    pub fn fallback_edge(&self) -> &EdgeName {
        &self.fallback_edge
    }

    pub fn fallback_state(&self) -> &StateId {
        &self.fallback_state
    }

    pub fn fallback_action(&self) -> &ActionId {
        &self.fallback_action
    }
}

/// The complete dialogue control graph.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    states: BTreeMap<StateId, StateDef>,
    conditions: BTreeMap<ConditionName, ConditionNode>,
    final_state: StateId,
}

impl DialogueGraph {
    /// Collects states and conditions, rejecting duplicates and reserved ids.
    ///
    /// Referential checks against the slot template happen in [`validate`],
    /// which callers must run before using the graph.
    ///
    /// [`validate`]: DialogueGraph::validate
    pub fn new(
        states: impl IntoIterator<Item = StateDef>,
        conditions: impl IntoIterator<Item = (ConditionName, ConditionNode)>,
        final_state: impl Into<StateId>,
    ) -> Result<Self, ConfigurationError> {
        let mut state_map = BTreeMap::new();
        for state in states {
            if state.id.as_str().is_empty() {
                return Err(ConfigurationError::invalid("graph declares an empty state id"));
            }
            if state.id.as_str() == CURRENT_STATE_SENTINEL {
                return Err(ConfigurationError::invalid(format!(
                    "state id `{CURRENT_STATE_SENTINEL}` is reserved"
                )));
            }
            let id = state.id.clone();
            if state_map.insert(id.clone(), state).is_some() {
                return Err(ConfigurationError::invalid(format!(
                    "state `{id}` is declared more than once"
                )));
            }
        }

        let mut condition_map = BTreeMap::new();
        for (name, node) in conditions {
            if name.as_str().is_empty() {
                return Err(ConfigurationError::invalid("graph declares an empty condition name"));
            }
            if condition_map.insert(name.clone(), node).is_some() {
                return Err(ConfigurationError::invalid(format!(
                    "condition `{name}` is declared more than once"
                )));
            }
        }

        Ok(Self {
            states: state_map,
            conditions: condition_map,
            final_state: final_state.into(),
        })
    }

    /// Cross-checks every reference in the graph against the slot template
    /// and the condition arena.
    pub fn validate(&self, template: &SlotTemplate) -> Result<(), ConfigurationError> {
        if !self.states.contains_key(&self.final_state) {
            return Err(ConfigurationError::UnknownState(self.final_state.clone()));
        }

        for state in self.states.values() {
            self.validate_state(state, template)?;
        }

        for (name, node) in &self.conditions {
            if !template.contains(node.conditional_slot.as_str()) {
                return Err(ConfigurationError::unknown_slot(
                    format!("condition `{name}` conditional_slot"),
                    node.conditional_slot.clone(),
                ));
            }
            self.validate_policy(&format!("condition `{name}`"), node.if_true())?;
            self.validate_policy(&format!("condition `{name}`"), node.if_false())?;
        }

        self.check_condition_cycles()
    }

    fn validate_state(&self, state: &StateDef, template: &SlotTemplate) -> Result<(), ConfigurationError> {
        let id = &state.id;

        for slot in &state.slots_to_check {
            if !template.contains(slot.as_str()) {
                return Err(ConfigurationError::unknown_slot(
                    format!("state `{id}` slots_to_check"),
                    slot.clone(),
                ));
            }
        }
        for slot in &state.slots_for_transition {
            if !template.contains(slot.as_str()) {
                return Err(ConfigurationError::unknown_slot(
                    format!("state `{id}` slots_for_transition"),
                    slot.clone(),
                ));
            }
        }

        let mut seen_combinations: BTreeSet<&BTreeSet<SlotId>> = BTreeSet::new();
        for (edge, combinations) in &state.edges {
            if state.policy(edge.as_str()).is_none() {
                return Err(ConfigurationError::MissingEdgePolicy {
                    state: id.clone(),
                    edge: edge.clone(),
                });
            }
            for combination in combinations {
                for slot in combination {
                    if !state.slots_for_transition.contains(slot) {
                        return Err(ConfigurationError::invalid(format!(
                            "state `{id}` edge `{edge}` lists slot `{slot}` outside slots_for_transition"
                        )));
                    }
                }
                if !seen_combinations.insert(combination) {
                    return Err(ConfigurationError::DuplicateCombination {
                        state: id.clone(),
                        combination: format_combination(combination),
                    });
                }
            }
        }

        for policy in state.policies.values() {
            self.validate_policy(&format!("state `{id}`"), policy)?;
        }

        if state.fallback_edge.as_str().is_empty() {
            return Err(ConfigurationError::invalid(format!(
                "state `{id}` declares no fallback edge"
            )));
        }
        if state.policy(state.fallback_edge.as_str()).is_none() {
            return Err(ConfigurationError::MissingEdgePolicy {
                state: id.clone(),
                edge: state.fallback_edge.clone(),
            });
        }
        // The static fallback must land on a literal declared state; the
        // stay-put sentinel is only meaningful inside policy nodes.
        if !self.states.contains_key(&state.fallback_state) {
            return Err(ConfigurationError::UnknownState(state.fallback_state.clone()));
        }
        if state.fallback_action.as_str().is_empty() {
            return Err(ConfigurationError::invalid(format!(
                "state `{id}` declares no fallback action"
            )));
        }

        Ok(())
    }

    fn validate_policy(&self, context: &str, policy: &PolicyNode) -> Result<(), ConfigurationError> {
        match policy {
            PolicyNode::Direct { next_state, action } => {
                if next_state.as_str() != CURRENT_STATE_SENTINEL
                    && !self.states.contains_key(next_state)
                {
                    return Err(ConfigurationError::UnknownState(next_state.clone()));
                }
                if action.as_str().is_empty() {
                    return Err(ConfigurationError::invalid(format!(
                        "{context} declares a policy with an empty action"
                    )));
                }
                Ok(())
            }
            PolicyNode::Conditional { condition } => {
                if !self.conditions.contains_key(condition) {
                    return Err(ConfigurationError::unknown_condition(context, condition.clone()));
                }
                Ok(())
            }
        }
    }

    fn check_condition_cycles(&self) -> Result<(), ConfigurationError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit<'a>(
            graph: &'a DialogueGraph,
            name: &'a ConditionName,
            marks: &mut BTreeMap<&'a ConditionName, Mark>,
        ) -> Result<(), ConfigurationError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(ConfigurationError::ConditionCycle(name.clone()));
                }
                None => {}
            }
            marks.insert(name, Mark::InProgress);
            if let Some(node) = graph.conditions.get(name) {
                for branch in [node.if_true(), node.if_false()] {
                    if let PolicyNode::Conditional { condition } = branch {
                        visit(graph, condition, marks)?;
                    }
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        for name in self.conditions.keys() {
            visit(self, name, &mut marks)?;
        }
        Ok(())
    }

    /// Looks up a state, failing with the unknown id.
    pub fn state(&self, id: &StateId) -> Result<&StateDef, ConfigurationError> {
        self.states
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownState(id.clone()))
    }

    /// Looks up a condition in the shared arena.
    pub fn condition(&self, name: &ConditionName) -> Option<&ConditionNode> {
        self.conditions.get(name)
    }

    pub fn final_state(&self) -> &StateId {
        &self.final_state
    }

    pub fn is_final(&self, state: &StateId) -> bool {
        &self.final_state == state
    }

    /// Iterates over states in id order.
    pub fn states(&self) -> impl Iterator<Item = &StateDef> {
        self.states.values()
    }

    /// Every action id any route through the graph can emit.
    ///
    /// Used at load time to prove reply coverage before the first turn.
    pub fn referenced_actions(&self) -> BTreeSet<ActionId> {
        let mut actions = BTreeSet::new();
        let collect = |actions: &mut BTreeSet<ActionId>, policy: &PolicyNode| {
            if let PolicyNode::Direct { action, .. } = policy {
                actions.insert(action.clone());
            }
        };
        for state in self.states.values() {
            for policy in state.policies.values() {
                collect(&mut actions, policy);
            }
            actions.insert(state.fallback_action.clone());
        }
        for node in self.conditions.values() {
            collect(&mut actions, node.if_true());
            collect(&mut actions, node.if_false());
        }
        actions
    }
}

fn format_combination(combination: &BTreeSet<SlotId>) -> String {
    let slots: Vec<&str> = combination.iter().map(|slot| slot.as_str()).collect();
    format!("{{{}}}", slots.join(", "))
}
