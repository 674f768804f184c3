//! Transition resolution over a validated dialogue graph.
//!
//! # Design
//!
//! One turn produces two fact views and the engine keeps them apart on
//! purpose. Edge selection looks only at the slots that became true *this*
//! turn, so a customer repeating themselves does not re-fire an old edge.
//! Condition branches look at the *accumulated* facts of the whole
//! conversation, so a preference stated three turns ago still routes
//! correctly today.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dialogue_engine::domain::dialogue::{DialogueEngine, DialogueGraph, PolicyNode, StateDef};
//! use dialogue_engine::domain::foundation::StateId;
//! use dialogue_engine::domain::slots::{SlotDefinition, SlotFacts, SlotTemplate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = SlotTemplate::new([
//!     SlotDefinition::new("confirmed", "customer confirmed we are done"),
//! ])?;
//! let graph = DialogueGraph::new(
//!     [
//!         StateDef::new("open")
//!             .with_slots_to_check(["confirmed"])
//!             .with_transition_slots(["confirmed"])
//!             .with_edge("confirm", [["confirmed"]])
//!             .with_policy("confirm", PolicyNode::direct("closed", "say_goodbye"))
//!             .with_policy("stay", PolicyNode::direct("open", "ask_again"))
//!             .with_fallback("stay", "open", "ask_again"),
//!         StateDef::new("closed")
//!             .with_policy("noop", PolicyNode::direct("closed", "conversation_over"))
//!             .with_fallback("noop", "closed", "conversation_over"),
//!     ],
//!     [],
//!     "closed",
//! )?;
//! graph.validate(&template)?;
//!
//! let engine = DialogueEngine::new(Arc::new(graph));
//! let open = StateId::new("open");
//! let facts: SlotFacts = [("confirmed", true)].into_iter().collect();
//!
//! let transition = engine.resolve_turn(&open, &facts, &facts)?;
//! assert_eq!(transition.next_state.as_str(), "closed");
//! assert!(transition.is_final);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::dialogue::errors::{DialogueResolutionError, EngineError};
use crate::domain::dialogue::graph::{
    DialogueGraph, PolicyNode, StateDef, CURRENT_STATE_SENTINEL,
};
use crate::domain::foundation::{ActionId, ConfigurationError, EdgeName, SlotId, StateId};
use crate::domain::slots::SlotFacts;

/// Upper bound on condition-chain depth during resolution.
///
/// Validated graphs are acyclic, so hitting this means the graph skipped
/// validation or the arena is malformed. Treated as a configuration defect.
pub const MAX_CONDITION_DEPTH: usize = 32;

/// The resolved outcome of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Literal next state, with the stay-put sentinel already resolved.
    pub next_state: StateId,
    /// Reply action the generator should render.
    pub action: ActionId,
    /// Whether `next_state` is the graph's final state.
    pub is_final: bool,
}

/// Stateless transition resolver, shared across conversations.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    graph: Arc<DialogueGraph>,
}

impl DialogueEngine {
    pub fn new(graph: Arc<DialogueGraph>) -> Self {
        Self { graph }
    }

    /// Resolves the transition for one turn.
    ///
    /// `newly_observed` drives edge selection; `accumulated` drives condition
    /// branches. Unknown current states are configuration errors and stay
    /// fatal; resolution misses are recoverable via [`fallback_transition`].
    ///
    /// [`fallback_transition`]: DialogueEngine::fallback_transition
    pub fn resolve_turn(
        &self,
        current: &StateId,
        accumulated: &SlotFacts,
        newly_observed: &SlotFacts,
    ) -> Result<Transition, EngineError> {
        let state = self.graph.state(current)?;
        let edge = self.select_edge(state, newly_observed);
        let policy = state.policy(edge.as_str()).ok_or_else(|| {
            DialogueResolutionError::missing_policy(current.clone(), edge.clone())
        })?;
        let (next_state, action) = self.resolve_policy(policy, accumulated)?;
        let next_state = normalize(current, next_state);
        Ok(self.transition(next_state, action))
    }

    /// Static per-state fallback route, used when resolution fails.
    ///
    /// Never consults facts and never uses the sentinel, so on a validated
    /// graph this only fails for an unknown current state.
    pub fn fallback_transition(&self, current: &StateId) -> Result<Transition, ConfigurationError> {
        let state = self.graph.state(current)?;
        Ok(self.transition(state.fallback_state().clone(), state.fallback_action().clone()))
    }

    /// Whether the given state terminates the conversation.
    pub fn is_final(&self, state: &StateId) -> bool {
        self.graph.is_final(state)
    }

    /// Picks the edge whose combination exactly equals the newly-true
    /// transition slots. No match selects the state's fallback edge.
    fn select_edge(&self, state: &StateDef, newly_observed: &SlotFacts) -> EdgeName {
        let observed: BTreeSet<SlotId> = newly_observed
            .true_slots()
            .filter(|slot| state.slots_for_transition().contains(*slot))
            .cloned()
            .collect();

        for (edge, combinations) in state.edges() {
            if combinations.iter().any(|combination| *combination == observed) {
                return edge.clone();
            }
        }
        state.fallback_edge().clone()
    }

    /// Walks a policy node to a direct leaf, branching on accumulated facts.
    fn resolve_policy(
        &self,
        policy: &PolicyNode,
        accumulated: &SlotFacts,
    ) -> Result<(StateId, ActionId), EngineError> {
        let mut node = policy;
        let mut depth = 0usize;
        loop {
            match node {
                PolicyNode::Direct { next_state, action } => {
                    return Ok((next_state.clone(), action.clone()));
                }
                PolicyNode::Conditional { condition } => {
                    depth += 1;
                    if depth > MAX_CONDITION_DEPTH {
                        return Err(ConfigurationError::ConditionDepthExceeded {
                            limit: MAX_CONDITION_DEPTH,
                        }
                        .into());
                    }
                    let node_def = self.graph.condition(condition).ok_or_else(|| {
                        DialogueResolutionError::UnknownCondition(condition.clone())
                    })?;
                    node = if accumulated.is_true(node_def.conditional_slot().as_str()) {
                        node_def.if_true()
                    } else {
                        node_def.if_false()
                    };
                }
            }
        }
    }

    fn transition(&self, next_state: StateId, action: ActionId) -> Transition {
        let is_final = self.graph.is_final(&next_state);
        Transition {
            next_state,
            action,
            is_final,
        }
    }
}

fn normalize(current: &StateId, next: StateId) -> StateId {
    if next.as_str() == CURRENT_STATE_SENTINEL {
        current.clone()
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::graph::{ConditionNode, DialogueGraph, StateDef};
    use crate::domain::foundation::ConditionName;
    use crate::domain::slots::{SlotDefinition, SlotTemplate};

    fn support_template() -> SlotTemplate {
        SlotTemplate::new([
            SlotDefinition::new("issue_missing_item", "an ordered item did not arrive"),
            SlotDefinition::new("issue_wrong_item", "a different item arrived than ordered"),
            SlotDefinition::new("order_number", "customer supplied an order number")
                .with_validation_slot("order_number_valid"),
            SlotDefinition::new("order_number_valid", "the order number looks well-formed"),
            SlotDefinition::new("refund_requested", "customer wants their money back"),
            SlotDefinition::new("replacement_requested", "customer wants a replacement item"),
            SlotDefinition::new("confirm_done", "customer confirmed there is nothing else"),
        ])
        .unwrap()
    }

    fn support_graph() -> DialogueGraph {
        let intake = StateDef::new("intake")
            .with_slots_to_check(["issue_missing_item", "issue_wrong_item"])
            .with_transition_slots(["issue_missing_item", "issue_wrong_item"])
            .with_edge(
                "issue_reported",
                [
                    vec!["issue_missing_item"],
                    vec!["issue_wrong_item"],
                    vec!["issue_missing_item", "issue_wrong_item"],
                ],
            )
            .with_policy(
                "issue_reported",
                PolicyNode::direct("need_order_number", "ask_order_number"),
            )
            .with_edge("nothing", [Vec::<&str>::new()])
            .with_policy(
                "nothing",
                PolicyNode::direct(CURRENT_STATE_SENTINEL, "intake_repeat"),
            )
            .with_fallback("nothing", "intake", "intake_repeat");

        let need_order_number = StateDef::new("need_order_number")
            .with_slots_to_check(["order_number", "order_number_valid"])
            .with_transition_slots(["order_number"])
            .with_edge("order_given", [["order_number"]])
            .with_policy("order_given", PolicyNode::conditional("order_number_gate"))
            .with_policy(
                "stay",
                PolicyNode::direct(CURRENT_STATE_SENTINEL, "ask_order_number"),
            )
            .with_fallback("stay", "need_order_number", "ask_order_number");

        let resolution_choice = StateDef::new("resolution_choice")
            .with_slots_to_check(["refund_requested", "replacement_requested"])
            .with_transition_slots(["refund_requested", "replacement_requested"])
            .with_edge(
                "refund",
                [
                    vec!["refund_requested"],
                    vec!["refund_requested", "replacement_requested"],
                ],
            )
            .with_policy("refund", PolicyNode::direct("wrap_up", "confirm_refund"))
            .with_edge("replacement", [["replacement_requested"]])
            .with_policy(
                "replacement",
                PolicyNode::direct("wrap_up", "confirm_replacement"),
            )
            .with_edge("undecided", [Vec::<&str>::new()])
            .with_policy("undecided", PolicyNode::conditional("resolution_preference"))
            .with_fallback("undecided", "resolution_choice", "ask_resolution_again");

        let wrap_up = StateDef::new("wrap_up")
            .with_slots_to_check(["confirm_done"])
            .with_transition_slots(["confirm_done"])
            .with_edge("confirmed", [["confirm_done"]])
            .with_policy("confirmed", PolicyNode::direct("closed", "say_goodbye"))
            .with_policy(
                "stay",
                PolicyNode::direct(CURRENT_STATE_SENTINEL, "ask_if_done"),
            )
            .with_fallback("stay", "wrap_up", "ask_if_done");

        let closed = StateDef::new("closed")
            .with_edge("noop", [Vec::<&str>::new()])
            .with_policy("noop", PolicyNode::direct("closed", "conversation_over"))
            .with_fallback("noop", "closed", "conversation_over");

        let conditions = [
            (
                ConditionName::new("order_number_gate"),
                ConditionNode::new(
                    "order_number_valid",
                    PolicyNode::direct("resolution_choice", "offer_resolution"),
                    PolicyNode::direct(CURRENT_STATE_SENTINEL, "order_number_invalid"),
                ),
            ),
            (
                ConditionName::new("resolution_preference"),
                ConditionNode::new(
                    "refund_requested",
                    PolicyNode::direct("wrap_up", "confirm_refund"),
                    PolicyNode::conditional("replacement_gate"),
                ),
            ),
            (
                ConditionName::new("replacement_gate"),
                ConditionNode::new(
                    "replacement_requested",
                    PolicyNode::direct("wrap_up", "confirm_replacement"),
                    PolicyNode::direct(CURRENT_STATE_SENTINEL, "ask_resolution_again"),
                ),
            ),
        ];

        let graph = DialogueGraph::new(
            [intake, need_order_number, resolution_choice, wrap_up, closed],
            conditions,
            "closed",
        )
        .unwrap();
        graph.validate(&support_template()).unwrap();
        graph
    }

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Arc::new(support_graph()))
    }

    fn facts(pairs: &[(&str, bool)]) -> SlotFacts {
        pairs.iter().copied().collect()
    }

    mod edge_selection {
        use super::*;

        #[test]
        fn exact_combination_fires_the_edge() {
            let engine = engine();
            let observed = facts(&[("issue_missing_item", true)]);

            let transition = engine
                .resolve_turn(&StateId::new("intake"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "need_order_number");
            assert_eq!(transition.action.as_str(), "ask_order_number");
            assert!(!transition.is_final);
        }

        #[test]
        fn multi_slot_combination_requires_the_whole_set() {
            let engine = engine();
            let observed = facts(&[("issue_missing_item", true), ("issue_wrong_item", true)]);

            let transition = engine
                .resolve_turn(&StateId::new("intake"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "need_order_number");
        }

        #[test]
        fn empty_combination_matches_a_quiet_turn() {
            let engine = engine();
            let observed = SlotFacts::new();

            let transition = engine
                .resolve_turn(&StateId::new("intake"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "intake");
            assert_eq!(transition.action.as_str(), "intake_repeat");
        }

        #[test]
        fn non_transition_slots_are_ignored_when_matching() {
            let engine = engine();
            // order_number_valid is checked but not a transition slot.
            let observed = facts(&[("order_number", true), ("order_number_valid", true)]);
            let accumulated = observed.clone();

            let transition = engine
                .resolve_turn(&StateId::new("need_order_number"), &accumulated, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "resolution_choice");
            assert_eq!(transition.action.as_str(), "offer_resolution");
        }

        #[test]
        fn irrelevant_true_slots_fall_into_the_empty_combination() {
            let engine = engine();
            // confirm_done is not a transition slot of intake, so the
            // intersection is empty.
            let observed = facts(&[("confirm_done", true)]);

            let transition = engine
                .resolve_turn(&StateId::new("intake"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "intake");
            assert_eq!(transition.action.as_str(), "intake_repeat");
        }

        #[test]
        fn explicit_false_does_not_fire_an_edge() {
            let engine = engine();
            let observed = facts(&[("refund_requested", false)]);

            let transition = engine
                .resolve_turn(&StateId::new("resolution_choice"), &observed, &observed)
                .unwrap();
            // Falls into the empty combination, then the condition chain.
            assert_eq!(transition.next_state.as_str(), "resolution_choice");
            assert_eq!(transition.action.as_str(), "ask_resolution_again");
        }

        #[test]
        fn unmatched_set_takes_the_fallback_edge() {
            let engine = engine();
            // wrap_up has no empty combination, so a quiet turn misses every
            // edge and routes through the fallback edge's policy.
            let observed = SlotFacts::new();

            let transition = engine
                .resolve_turn(&StateId::new("wrap_up"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "wrap_up");
            assert_eq!(transition.action.as_str(), "ask_if_done");
        }
    }

    mod policy_resolution {
        use super::*;

        #[test]
        fn sentinel_target_stays_in_the_current_state() {
            let engine = engine();
            let observed = facts(&[("order_number", true)]);

            // order_number_valid is absent, so the gate takes if_false,
            // whose target is the sentinel.
            let transition = engine
                .resolve_turn(&StateId::new("need_order_number"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "need_order_number");
            assert_eq!(transition.action.as_str(), "order_number_invalid");
        }

        #[test]
        fn condition_reads_accumulated_facts_not_just_this_turn() {
            let engine = engine();
            let accumulated = facts(&[("refund_requested", true)]);
            let observed = SlotFacts::new();

            let transition = engine
                .resolve_turn(&StateId::new("resolution_choice"), &accumulated, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "wrap_up");
            assert_eq!(transition.action.as_str(), "confirm_refund");
        }

        #[test]
        fn condition_chain_walks_to_the_second_gate() {
            let engine = engine();
            let accumulated = facts(&[("replacement_requested", true)]);
            let observed = SlotFacts::new();

            let transition = engine
                .resolve_turn(&StateId::new("resolution_choice"), &accumulated, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "wrap_up");
            assert_eq!(transition.action.as_str(), "confirm_replacement");
        }

        #[test]
        fn reaching_the_final_state_is_flagged() {
            let engine = engine();
            let observed = facts(&[("confirm_done", true)]);

            let transition = engine
                .resolve_turn(&StateId::new("wrap_up"), &observed, &observed)
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "closed");
            assert!(transition.is_final);
        }

        #[test]
        fn unknown_current_state_is_a_configuration_error() {
            let engine = engine();
            let err = engine
                .resolve_turn(&StateId::new("nowhere"), &SlotFacts::new(), &SlotFacts::new())
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Configuration(ConfigurationError::UnknownState(_))
            ));
        }

        #[test]
        fn unknown_condition_is_a_resolution_error() {
            // Unvalidated on purpose: the policy points at a condition the
            // arena never defines.
            let state = StateDef::new("broken")
                .with_edge("go", [Vec::<&str>::new()])
                .with_policy("go", PolicyNode::conditional("ghost"))
                .with_fallback("go", "broken", "ask_again");
            let graph = DialogueGraph::new([state], [], "broken").unwrap();
            let engine = DialogueEngine::new(Arc::new(graph));

            let err = engine
                .resolve_turn(&StateId::new("broken"), &SlotFacts::new(), &SlotFacts::new())
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Resolution(DialogueResolutionError::UnknownCondition(name))
                    if name.as_str() == "ghost"
            ));
        }

        #[test]
        fn missing_policy_is_a_resolution_error() {
            let state = StateDef::new("broken").with_fallback("ghost", "broken", "ask_again");
            let graph = DialogueGraph::new([state], [], "broken").unwrap();
            let engine = DialogueEngine::new(Arc::new(graph));

            let err = engine
                .resolve_turn(&StateId::new("broken"), &SlotFacts::new(), &SlotFacts::new())
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Resolution(DialogueResolutionError::MissingPolicy { edge, .. })
                    if edge.as_str() == "ghost"
            ));
        }

        #[test]
        fn condition_depth_guard_stops_a_cyclic_arena() {
            let state = StateDef::new("spin")
                .with_edge("go", [Vec::<&str>::new()])
                .with_policy("go", PolicyNode::conditional("loop"))
                .with_fallback("go", "spin", "ask_again");
            let conditions = [(
                ConditionName::new("loop"),
                ConditionNode::new(
                    "confirm_done",
                    PolicyNode::conditional("loop"),
                    PolicyNode::conditional("loop"),
                ),
            )];
            let graph = DialogueGraph::new([state], conditions, "spin").unwrap();
            let engine = DialogueEngine::new(Arc::new(graph));

            let err = engine
                .resolve_turn(&StateId::new("spin"), &SlotFacts::new(), &SlotFacts::new())
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Configuration(ConfigurationError::ConditionDepthExceeded { limit })
                    if limit == MAX_CONDITION_DEPTH
            ));
        }
    }

    mod fallback {
        use super::*;

        #[test]
        fn fallback_returns_the_static_route() {
            let engine = engine();
            let transition = engine
                .fallback_transition(&StateId::new("resolution_choice"))
                .unwrap();
            assert_eq!(transition.next_state.as_str(), "resolution_choice");
            assert_eq!(transition.action.as_str(), "ask_resolution_again");
        }

        #[test]
        fn fallback_on_unknown_state_is_fatal() {
            let engine = engine();
            let err = engine.fallback_transition(&StateId::new("nowhere")).unwrap_err();
            assert!(matches!(err, ConfigurationError::UnknownState(_)));
        }

        #[test]
        fn every_declared_state_has_a_working_fallback() {
            let graph = support_graph();
            let engine = DialogueEngine::new(Arc::new(graph.clone()));

            for state in graph.states() {
                let transition = engine.fallback_transition(state.id()).unwrap();
                assert!(graph.state(&transition.next_state).is_ok());
            }
        }
    }

    mod graph_walk {
        use super::*;

        /// Drives every state through every subset of its transition slots
        /// and checks each resolved target is a declared state.
        #[test]
        fn all_states_resolve_for_every_transition_subset() {
            let graph = support_graph();
            let engine = DialogueEngine::new(Arc::new(graph.clone()));

            for state in graph.states() {
                let slots: Vec<SlotId> = state.slots_for_transition().iter().cloned().collect();
                for mask in 0u32..(1 << slots.len()) {
                    let observed: SlotFacts = slots
                        .iter()
                        .enumerate()
                        .filter(|(index, _)| mask & (1 << index) != 0)
                        .map(|(_, slot)| (slot.clone(), true))
                        .collect();

                    let transition = engine
                        .resolve_turn(state.id(), &observed, &observed)
                        .unwrap_or_else(|err| {
                            panic!("state `{}` mask {mask:#b} failed: {err}", state.id())
                        });
                    assert!(
                        graph.state(&transition.next_state).is_ok(),
                        "state `{}` mask {mask:#b} landed on undeclared `{}`",
                        state.id(),
                        transition.next_state
                    );
                }
            }
        }
    }
}
