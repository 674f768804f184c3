//! Catalog module - loading and validating the dialogue configuration.
//!
//! This module defines:
//! - The raw serde shapes of the five catalog documents
//! - The ReplyCatalog of per-action guidance and canned lines
//! - The DialogueCatalog that assembles and cross-validates everything

mod catalog;
mod documents;
mod replies;

pub use catalog::DialogueCatalog;
pub use documents::{
    CannedPair, ConditionsDoc, RepliesDoc, ReplyEntry, SlotEntry, SlotTemplateDoc, StartDoc,
    StateEntry, StatesDoc,
};
pub use replies::{ReplyCatalog, ReplySpec};
