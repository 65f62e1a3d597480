//! Domain logic for Content Catapult.
//!
//! Everything here is pure: template merging, prompt construction, the
//! submission record model, section parsing and export naming. Storage and
//! network access live in `catapult-store` and `catapult-llm`.

pub mod builtin;
pub mod error;
pub mod export;
pub mod feature;
pub mod prompt;
pub mod sections;
pub mod slug;
pub mod submission;
pub mod template;
pub mod types;
