//! Assembly and cross-validation of the five catalog documents.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::domain::catalog::documents::{
    ConditionsDoc, RepliesDoc, SlotTemplateDoc, StartDoc, StatesDoc,
};
use crate::domain::catalog::replies::ReplyCatalog;
use crate::domain::dialogue::{DialogueGraph, StateDef};
use crate::domain::foundation::{ConditionName, ConfigurationError, StateId};
use crate::domain::slots::{SlotDefinition, SlotTemplate};

const SLOT_TEMPLATE_FILE: &str = "slot_template.json";
const STATES_FILE: &str = "states.json";
const CONDITIONS_FILE: &str = "edge_conditions.json";
const REPLIES_FILE: &str = "replies.json";
const START_FILE: &str = "dialogue_start.json";

/// The fully validated dialogue configuration.
///
/// Assembling a catalog proves every cross-document reference up front: the
/// graph against the template, reply coverage against every action the graph
/// can emit, and the start document against the declared states. A catalog
/// that loads will not produce configuration faults for any turn input.
#[derive(Debug, Clone)]
pub struct DialogueCatalog {
    template: Arc<SlotTemplate>,
    graph: Arc<DialogueGraph>,
    replies: Arc<ReplyCatalog>,
    initial_state: StateId,
    welcome_message: String,
}

impl DialogueCatalog {
    /// Assembles and cross-validates parsed documents.
    pub fn from_documents(
        template_doc: SlotTemplateDoc,
        states_doc: StatesDoc,
        conditions_doc: ConditionsDoc,
        replies_doc: RepliesDoc,
        start_doc: StartDoc,
    ) -> Result<Self, ConfigurationError> {
        let template = template_from_doc(template_doc)?;
        let graph = graph_from_docs(states_doc, conditions_doc)?;
        graph.validate(&template)?;

        let replies = ReplyCatalog::from_doc(replies_doc);
        replies.ensure_covers(&graph.referenced_actions())?;

        let initial_state = StateId::new(start_doc.initial_state);
        graph.state(&initial_state)?;
        if start_doc.welcome_message.trim().is_empty() {
            return Err(ConfigurationError::invalid("welcome message is empty"));
        }

        Ok(Self {
            template: Arc::new(template),
            graph: Arc::new(graph),
            replies: Arc::new(replies),
            initial_state,
            welcome_message: start_doc.welcome_message,
        })
    }

    /// Loads the five documents from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigurationError> {
        Self::from_documents(
            read_doc(dir, SLOT_TEMPLATE_FILE)?,
            read_doc(dir, STATES_FILE)?,
            read_doc(dir, CONDITIONS_FILE)?,
            read_doc(dir, REPLIES_FILE)?,
            read_doc(dir, START_FILE)?,
        )
    }

    /// The catalog compiled into the binary, used when no data directory is
    /// configured.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_documents(
            parse_doc(include_str!("../../../data/slot_template.json"), SLOT_TEMPLATE_FILE)?,
            parse_doc(include_str!("../../../data/states.json"), STATES_FILE)?,
            parse_doc(include_str!("../../../data/edge_conditions.json"), CONDITIONS_FILE)?,
            parse_doc(include_str!("../../../data/replies.json"), REPLIES_FILE)?,
            parse_doc(include_str!("../../../data/dialogue_start.json"), START_FILE)?,
        )
    }

    pub fn template(&self) -> &Arc<SlotTemplate> {
        &self.template
    }

    pub fn graph(&self) -> &Arc<DialogueGraph> {
        &self.graph
    }

    pub fn replies(&self) -> &Arc<ReplyCatalog> {
        &self.replies
    }

    /// The state every new conversation starts in.
    pub fn initial_state(&self) -> &StateId {
        &self.initial_state
    }

    /// The line the bot opens every conversation with.
    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }
}

fn template_from_doc(doc: SlotTemplateDoc) -> Result<SlotTemplate, ConfigurationError> {
    let mut definitions = Vec::new();
    for (id, entry) in doc.slots {
        let mut definition = SlotDefinition::new(id, entry.prompt_description);
        if let Some(validation) = entry.validation_slot {
            definition = definition.with_validation_slot(validation);
        }
        if let Some(counterpart) = entry.counterpart_slot {
            definition = definition.with_counterpart_slot(counterpart);
        }
        definitions.push(definition.with_patterns(&entry.patterns)?);
    }
    SlotTemplate::new(definitions)
}

fn graph_from_docs(
    states_doc: StatesDoc,
    conditions_doc: ConditionsDoc,
) -> Result<DialogueGraph, ConfigurationError> {
    let mut states = Vec::new();
    for (id, entry) in states_doc.states {
        let mut state = StateDef::new(id)
            .with_slots_to_check(entry.slots_to_check)
            .with_transition_slots(entry.slots_for_transition);
        for (edge, combinations) in entry.edges {
            state = state.with_edge(edge, combinations);
        }
        for (edge, policy) in entry.edge_policy {
            state = state.with_policy(edge, policy);
        }
        states.push(state.with_fallback(
            entry.fallback_next_edge,
            entry.fallback_next_state,
            entry.fallback_action,
        ));
    }
    let conditions = conditions_doc
        .edge_conditions
        .into_iter()
        .map(|(name, node)| (ConditionName::new(name), node));
    DialogueGraph::new(states, conditions, states_doc.final_state)
}

fn read_doc<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ConfigurationError> {
    let path = dir.join(file);
    let raw = fs::read_to_string(&path)
        .map_err(|source| ConfigurationError::io(path.display().to_string(), source))?;
    parse_doc(&raw, file)
}

fn parse_doc<T: DeserializeOwned>(raw: &str, file: &str) -> Result<T, ConfigurationError> {
    serde_json::from_str(raw).map_err(|source| ConfigurationError::parse(file, source))
}
