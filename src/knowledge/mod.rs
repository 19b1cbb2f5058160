//! Knowledge base for grounding answers.
//!
//! The FAQ file is read once at startup and flattened into a single
//! [`KnowledgeContext`] that every session shares read-only.

mod faq;

pub use faq::*;
