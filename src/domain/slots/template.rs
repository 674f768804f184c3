//! Slot template: the declared set of case facts and how to recognize them.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ConfigurationError, SlotId};

/// One declared slot: its classifier-facing description, its optional
/// dependency links, and the compiled fallback patterns.
#[derive(Debug, Clone)]
pub struct SlotDefinition {
    id: SlotId,
    prompt_description: String,
    validation_slot: Option<SlotId>,
    counterpart_slot: Option<SlotId>,
    patterns: Vec<Regex>,
}

impl SlotDefinition {
    /// Creates a definition with no links and no patterns.
    pub fn new(id: impl Into<SlotId>, prompt_description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt_description: prompt_description.into(),
            validation_slot: None,
            counterpart_slot: None,
            patterns: Vec::new(),
        }
    }

    /// Declares a dependent slot that must be false whenever this slot is false.
    pub fn with_validation_slot(mut self, slot: impl Into<SlotId>) -> Self {
        self.validation_slot = Some(slot.into());
        self
    }

    /// Declares a mutually-relevant slot used when illustrating expected output.
    pub fn with_counterpart_slot(mut self, slot: impl Into<SlotId>) -> Self {
        self.counterpart_slot = Some(slot.into());
        self
    }

    /// Compiles and attaches fallback patterns, in declared order.
    ///
    /// Patterns are matched case-insensitively against raw user text.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let regex = RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigurationError::InvalidPattern {
                    slot: self.id.clone(),
                    source,
                })?;
            compiled.push(regex);
        }
        self.patterns = compiled;
        Ok(self)
    }

    /// The slot id.
    pub fn id(&self) -> &SlotId {
        &self.id
    }

    /// The description handed to the classifier.
    pub fn prompt_description(&self) -> &str {
        &self.prompt_description
    }

    /// The dependent validation slot, if declared.
    pub fn validation_slot(&self) -> Option<&SlotId> {
        self.validation_slot.as_ref()
    }

    /// The counterpart slot, if declared.
    pub fn counterpart_slot(&self) -> Option<&SlotId> {
        self.counterpart_slot.as_ref()
    }

    /// Whether any fallback pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Builds the classifier-facing view of this slot.
    pub fn descriptor(&self) -> SlotDescriptor {
        SlotDescriptor {
            id: self.id.clone(),
            description: self.prompt_description.clone(),
            validation_slot: self.validation_slot.clone(),
        }
    }
}

/// Classifier-facing view of one slot to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// Slot id the classifier must answer for.
    pub id: SlotId,
    /// Natural-language description of what the slot means.
    pub description: String,
    /// Dependent slot that must be false whenever this one is false.
    pub validation_slot: Option<SlotId>,
}

/// The full, immutable set of declared slots.
///
/// Built once at startup and shared read-only across all conversations.
#[derive(Debug, Clone, Default)]
pub struct SlotTemplate {
    slots: BTreeMap<SlotId, SlotDefinition>,
}

impl SlotTemplate {
    /// Builds a template, rejecting duplicate ids and dangling links.
    pub fn new(
        definitions: impl IntoIterator<Item = SlotDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut slots = BTreeMap::new();
        for definition in definitions {
            if definition.id.as_str().is_empty() {
                return Err(ConfigurationError::invalid(
                    "slot template declares an empty slot id",
                ));
            }
            let id = definition.id.clone();
            if slots.insert(id.clone(), definition).is_some() {
                return Err(ConfigurationError::invalid(format!(
                    "slot `{id}` is declared more than once"
                )));
            }
        }

        let template = Self { slots };
        for definition in template.slots.values() {
            if let Some(validation) = definition.validation_slot() {
                if validation == definition.id() {
                    return Err(ConfigurationError::invalid(format!(
                        "slot `{}` cannot be its own validation slot",
                        definition.id()
                    )));
                }
                if !template.contains(validation.as_str()) {
                    return Err(ConfigurationError::unknown_slot(
                        format!("slot `{}` validation_slot", definition.id()),
                        validation.clone(),
                    ));
                }
            }
            if let Some(counterpart) = definition.counterpart_slot() {
                if !template.contains(counterpart.as_str()) {
                    return Err(ConfigurationError::unknown_slot(
                        format!("slot `{}` counterpart_slot", definition.id()),
                        counterpart.clone(),
                    ));
                }
            }
        }
        Ok(template)
    }

    /// Looks up one slot definition.
    pub fn get(&self, slot: &str) -> Option<&SlotDefinition> {
        self.slots.get(slot)
    }

    /// Whether the slot is declared.
    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Iterates over definitions in slot-id order.
    pub fn iter(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.slots.values()
    }

    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the template declares no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_slots() -> SlotTemplate {
        SlotTemplate::new([
            SlotDefinition::new("order_number", "customer supplied an order number")
                .with_validation_slot("order_number_valid")
                .with_patterns([r"order\s+(number|no\.?|#)", r"\b\d{6,10}\b"])
                .unwrap(),
            SlotDefinition::new("order_number_valid", "the order number looks well-formed")
                .with_patterns([r"\b\d{6,10}\b"])
                .unwrap(),
            SlotDefinition::new("issue_missing_item", "an ordered item did not arrive")
                .with_counterpart_slot("issue_wrong_item")
                .with_patterns(["missing", r"didn'?t\s+arrive"])
                .unwrap(),
            SlotDefinition::new("issue_wrong_item", "a different item arrived than ordered")
                .with_counterpart_slot("issue_missing_item")
                .with_patterns([r"wrong\s+(item|article|size)"])
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn template_exposes_declared_slots() {
        let template = order_slots();
        assert_eq!(template.len(), 4);
        assert!(template.contains("order_number"));
        assert!(!template.contains("ghost"));

        let def = template.get("order_number").unwrap();
        assert_eq!(def.validation_slot().unwrap().as_str(), "order_number_valid");
    }

    #[test]
    fn patterns_match_case_insensitively() {
        let template = order_slots();
        let def = template.get("issue_missing_item").unwrap();

        assert!(def.matches("The parcel is MISSING an item"));
        assert!(def.matches("it didn't arrive"));
        assert!(!def.matches("everything arrived fine"));
    }

    #[test]
    fn empty_text_matches_nothing() {
        let template = order_slots();
        for def in template.iter() {
            assert!(!def.matches(""), "slot `{}` matched empty text", def.id());
        }
    }

    #[test]
    fn invalid_pattern_is_rejected_at_build() {
        let result = SlotDefinition::new("broken", "bad pattern").with_patterns(["(unclosed"]);
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidPattern { slot, .. }) if slot.as_str() == "broken"
        ));
    }

    #[test]
    fn duplicate_slot_id_is_rejected() {
        let result = SlotTemplate::new([
            SlotDefinition::new("a", "first"),
            SlotDefinition::new("a", "second"),
        ]);
        assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
    }

    #[test]
    fn dangling_validation_slot_is_rejected() {
        let result = SlotTemplate::new([
            SlotDefinition::new("a", "slot").with_validation_slot("missing")
        ]);
        assert!(matches!(
            result,
            Err(ConfigurationError::UnknownSlot { slot, .. }) if slot.as_str() == "missing"
        ));
    }

    #[test]
    fn self_validation_is_rejected() {
        let result =
            SlotTemplate::new([SlotDefinition::new("a", "slot").with_validation_slot("a")]);
        assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
    }

    #[test]
    fn descriptor_carries_the_validation_link() {
        let template = order_slots();
        let descriptor = template.get("order_number").unwrap().descriptor();

        assert_eq!(descriptor.id.as_str(), "order_number");
        assert_eq!(descriptor.description, "customer supplied an order number");
        assert_eq!(
            descriptor.validation_slot.as_ref().map(|s| s.as_str()),
            Some("order_number_valid")
        );
    }
}
