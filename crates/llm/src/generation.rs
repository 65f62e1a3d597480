//! Content generation: one model call per selected template.
//!
//! Calls run concurrently and are all awaited before the result is
//! composed. A failed call never fails the whole run; its slot gets a
//! placeholder and its id is reported in `failed`. Only when every call
//! fails is the run an error.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;

use catapult_core::error::CoreError;
use catapult_core::feature::FeatureDetails;
use catapult_core::prompt::{build_combined_prompt, build_template_prompt};
use catapult_core::template::Template;
use catapult_core::types::TemplateId;

use crate::client::{CompletionRequest, TextGenerator};
use crate::error::GenerationError;

/// Text substituted for a template whose call failed.
pub fn failure_placeholder(template_name: &str) -> String {
    format!("Content generation failed for {template_name}. Please try again.")
}

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub feature: FeatureDetails,
    /// Selected templates, in display order.
    pub templates: Vec<Template>,
    pub context: Option<String>,
}

impl GenerationRequest {
    fn validate(&self) -> Result<(), CoreError> {
        self.feature.validate()?;
        if self.templates.is_empty() {
            return Err(CoreError::Validation(
                "At least one template must be selected".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outputs keyed by template id, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub outputs: IndexMap<TemplateId, String>,
    /// Ids whose output is a failure placeholder.
    pub failed: Vec<TemplateId>,
}

/// Runs generation against a [`TextGenerator`].
#[derive(Clone)]
pub struct ContentGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ContentGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate one output per template.
    ///
    /// A template id selected more than once is generated once, at the
    /// position of its first selection.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        request.validate()?;

        let mut seen = HashSet::new();
        let templates: Vec<&Template> = request
            .templates
            .iter()
            .filter(|t| seen.insert(t.id.as_str()))
            .collect();

        let calls = templates.iter().map(|template| {
            let prompt = build_template_prompt(
                &request.feature,
                template,
                request.context.as_deref(),
            );
            self.generator.complete(CompletionRequest::new(prompt))
        });
        let results = join_all(calls).await;

        let mut outputs = IndexMap::with_capacity(templates.len());
        let mut failed = Vec::new();
        for (template, result) in templates.iter().zip(results) {
            let text = match result {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    tracing::warn!(template_id = %template.id, error = %e, "Template generation failed");
                    failed.push(template.id.clone());
                    failure_placeholder(&template.name)
                }
            };
            outputs.insert(template.id.clone(), text);
        }

        if failed.len() == templates.len() {
            return Err(GenerationError::AllFailed {
                attempted: templates.len(),
            });
        }
        tracing::info!(
            generated = templates.len() - failed.len(),
            failed = failed.len(),
            "Content generation finished",
        );
        Ok(GenerationResult { outputs, failed })
    }

    /// Generate all templates in a single call.
    ///
    /// The model is asked to head each part with `# <template name>`, so the
    /// text can be split with the section parser.
    pub async fn generate_combined(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        request.validate()?;
        let prompt = build_combined_prompt(
            &request.feature,
            &request.templates,
            request.context.as_deref(),
        );
        let text = self.generator.complete(CompletionRequest::new(prompt)).await?;
        Ok(text.trim().to_string())
    }
}
