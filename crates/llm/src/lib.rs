//! Text generation for Content Catapult.
//!
//! [`client::TextGenerator`] is the seam to the external model; the
//! OpenAI-compatible implementation lives in [`openai`]. Higher-level
//! operations (per-template generation, combined generation, template
//! prompt drafting) are built on top of it and never talk HTTP directly.

pub mod client;
pub mod drafting;
pub mod error;
pub mod generation;
pub mod openai;

pub use client::{CompletionRequest, ModelTier, TextGenerator};
pub use error::GenerationError;
