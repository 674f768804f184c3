//! Raw serde shapes for the catalog documents.
//!
//! These mirror the on-disk JSON exactly and carry no invariants of their
//! own; everything is cross-checked when the documents are assembled into a
//! [`DialogueCatalog`](super::DialogueCatalog).

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::dialogue::{ConditionNode, PolicyNode};

/// `slot_template.json`
#[derive(Debug, Clone, Deserialize)]
pub struct SlotTemplateDoc {
    pub slots: BTreeMap<String, SlotEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotEntry {
    pub prompt_description: String,
    #[serde(default)]
    pub validation_slot: Option<String>,
    #[serde(default)]
    pub counterpart_slot: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// `states.json`
#[derive(Debug, Clone, Deserialize)]
pub struct StatesDoc {
    pub final_state: String,
    pub states: BTreeMap<String, StateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateEntry {
    #[serde(default)]
    pub slots_to_check: Vec<String>,
    #[serde(default)]
    pub slots_for_transition: Vec<String>,
    #[serde(default)]
    pub edges: BTreeMap<String, Vec<Vec<String>>>,
    #[serde(default)]
    pub edge_policy: BTreeMap<String, PolicyNode>,
    pub fallback_next_edge: String,
    pub fallback_next_state: String,
    pub fallback_action: String,
}

/// `edge_conditions.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionsDoc {
    #[serde(default)]
    pub edge_conditions: BTreeMap<String, ConditionNode>,
}

/// `replies.json`
#[derive(Debug, Clone, Deserialize)]
pub struct RepliesDoc {
    pub replies: BTreeMap<String, ReplyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyEntry {
    pub guidance: String,
    pub canned: CannedPair,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CannedPair {
    pub neutral: String,
    pub empathetic: String,
}

/// `dialogue_start.json`
#[derive(Debug, Clone, Deserialize)]
pub struct StartDoc {
    pub initial_state: String,
    pub welcome_message: String,
}
