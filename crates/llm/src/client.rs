use async_trait::async_trait;

use crate::error::GenerationError;

/// Which configured model a request should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTier {
    /// Content generation.
    #[default]
    Standard,
    /// Short helper tasks such as drafting template prompts.
    Light,
}

/// One chat-style completion request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub tier: ModelTier,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }
}

/// External text-generation model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion and return the model's text (possibly empty).
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}
