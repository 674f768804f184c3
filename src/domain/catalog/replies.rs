//! Reply catalog: per-action generation guidance and canned fallback lines.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::catalog::documents::RepliesDoc;
use crate::domain::foundation::{ActionId, ConfigurationError, Treatment};

/// Content attached to one reply action.
#[derive(Debug, Clone)]
pub struct ReplySpec {
    guidance: String,
    neutral: String,
    empathetic: String,
}

impl ReplySpec {
    pub fn new(
        guidance: impl Into<String>,
        neutral: impl Into<String>,
        empathetic: impl Into<String>,
    ) -> Self {
        Self {
            guidance: guidance.into(),
            neutral: neutral.into(),
            empathetic: empathetic.into(),
        }
    }

    /// The prompt guidance handed to the generator for this action.
    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    /// The canned line for the given treatment arm.
    pub fn canned(&self, treatment: Treatment) -> &str {
        match treatment {
            Treatment::Neutral => &self.neutral,
            Treatment::Empathetic => &self.empathetic,
        }
    }
}

/// All reply content, indexed by action.
#[derive(Debug, Clone, Default)]
pub struct ReplyCatalog {
    replies: BTreeMap<ActionId, ReplySpec>,
}

impl ReplyCatalog {
    pub fn new(replies: impl IntoIterator<Item = (ActionId, ReplySpec)>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
        }
    }

    pub fn from_doc(doc: RepliesDoc) -> Self {
        Self::new(doc.replies.into_iter().map(|(action, entry)| {
            (
                ActionId::new(action),
                ReplySpec::new(entry.guidance, entry.canned.neutral, entry.canned.empathetic),
            )
        }))
    }

    /// Looks up the content for one action.
    pub fn get(&self, action: &ActionId) -> Option<&ReplySpec> {
        self.replies.get(action)
    }

    /// The canned line for an action and treatment, if declared.
    pub fn canned(&self, action: &ActionId, treatment: Treatment) -> Option<&str> {
        self.get(action).map(|spec| spec.canned(treatment))
    }

    /// Proves that every action the graph can emit has usable content:
    /// non-empty guidance and a non-empty canned line per treatment arm.
    pub fn ensure_covers(&self, actions: &BTreeSet<ActionId>) -> Result<(), ConfigurationError> {
        for action in actions {
            let spec = self.get(action).ok_or_else(|| {
                ConfigurationError::invalid(format!("no reply entry for action `{action}`"))
            })?;
            if spec.guidance.trim().is_empty() {
                return Err(ConfigurationError::invalid(format!(
                    "action `{action}` has empty generation guidance"
                )));
            }
            for treatment in [Treatment::Neutral, Treatment::Empathetic] {
                if spec.canned(treatment).trim().is_empty() {
                    return Err(ConfigurationError::MissingReply {
                        action: action.clone(),
                        treatment,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReplyCatalog {
        ReplyCatalog::new([
            (
                ActionId::new("say_goodbye"),
                ReplySpec::new(
                    "Wish the customer well and close the conversation.",
                    "Thanks for contacting us. Goodbye!",
                    "It was a pleasure helping you today. Take care!",
                ),
            ),
            (
                ActionId::new("ask_order_number"),
                ReplySpec::new(
                    "Ask for the order number.",
                    "Please share your order number.",
                    "Happy to help! Could you share your order number?",
                ),
            ),
        ])
    }

    #[test]
    fn canned_line_is_picked_per_treatment() {
        let catalog = catalog();
        let action = ActionId::new("say_goodbye");

        assert_eq!(
            catalog.canned(&action, Treatment::Neutral),
            Some("Thanks for contacting us. Goodbye!")
        );
        assert_eq!(
            catalog.canned(&action, Treatment::Empathetic),
            Some("It was a pleasure helping you today. Take care!")
        );
    }

    #[test]
    fn unknown_action_has_no_content() {
        assert!(catalog().canned(&ActionId::new("ghost"), Treatment::Neutral).is_none());
    }

    #[test]
    fn coverage_check_accepts_a_covered_set() {
        let actions: BTreeSet<ActionId> =
            [ActionId::new("say_goodbye"), ActionId::new("ask_order_number")]
                .into_iter()
                .collect();
        catalog().ensure_covers(&actions).unwrap();
    }

    #[test]
    fn coverage_check_rejects_a_missing_action() {
        let actions: BTreeSet<ActionId> = [ActionId::new("ghost")].into_iter().collect();
        assert!(matches!(
            catalog().ensure_covers(&actions),
            Err(ConfigurationError::Invalid(_))
        ));
    }

    #[test]
    fn coverage_check_rejects_an_empty_treatment_arm() {
        let catalog = ReplyCatalog::new([(
            ActionId::new("say_goodbye"),
            ReplySpec::new("Close politely.", "Goodbye!", "   "),
        )]);
        let actions: BTreeSet<ActionId> = [ActionId::new("say_goodbye")].into_iter().collect();

        assert!(matches!(
            catalog.ensure_covers(&actions),
            Err(ConfigurationError::MissingReply { treatment: Treatment::Empathetic, .. })
        ));
    }
}
