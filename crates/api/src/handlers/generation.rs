//! Handler for content generation.
//!
//! Resolves the selected template ids, runs generation and returns the
//! outputs in the same `selectedTemplates` shape the submissions endpoint
//! accepts, so a client can store a run without reshaping it. Nothing is
//! persisted here.

use std::collections::HashSet;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use catapult_core::feature::FeatureDetails;
use catapult_core::submission::{SubmissionOutputs, TemplateOutput, TemplateRef};
use catapult_core::template::Template;
use catapult_core::types::TemplateId;
use catapult_llm::generation::{failure_placeholder, GenerationRequest};
use catapult_store::repositories::TemplateRepo;
use catapult_store::{BlobStore, StoreError};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// How the model is asked for content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// One call per template.
    #[default]
    PerTemplate,
    /// One call for all templates, split by heading afterwards.
    Combined,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub feature: FeatureDetails,
    #[serde(default)]
    pub template_ids: Vec<TemplateId>,
    #[serde(default)]
    pub context_prompt: Option<String>,
    #[serde(default)]
    pub mode: GenerationMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub mode: GenerationMode,
    /// Output text keyed by template id, in selection order.
    pub outputs: IndexMap<TemplateId, String>,
    /// Ids whose output is a failure placeholder.
    pub failed: Vec<TemplateId>,
    /// The same outputs, ready to post to `/submissions`.
    pub selected_templates: Vec<TemplateOutput>,
    /// Raw model text (combined mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_output: Option<String>,
}

/// Resolve every selected id, failing on the first unknown one.
async fn resolve_selected(
    store: &dyn BlobStore,
    ids: &[TemplateId],
) -> Result<Vec<Template>, StoreError> {
    let mut templates = Vec::with_capacity(ids.len());
    for id in ids {
        templates.push(TemplateRepo::resolve(store, id).await?);
    }
    Ok(templates)
}

// ---------------------------------------------------------------------------
// POST /generate
// ---------------------------------------------------------------------------

/// Generate content for the selected templates.
///
/// Unknown template ids answer 404 before any model call is made.
pub async fn generate_content(
    State(state): State<AppState>,
    Json(input): Json<GenerateContentRequest>,
) -> AppResult<impl IntoResponse> {
    input.feature.validate()?;
    let templates = resolve_selected(state.store(), &input.template_ids).await?;

    let request = GenerationRequest {
        feature: input.feature,
        templates,
        context: input.context_prompt,
    };

    let response = match input.mode {
        GenerationMode::PerTemplate => {
            let result = state.content.generate(&request).await?;
            // Duplicate selections collapse to one output.
            let mut seen = HashSet::new();
            let selected_templates = request
                .templates
                .iter()
                .filter(|t| seen.insert(t.id.as_str()))
                .filter_map(|t| {
                    let text = result.outputs.get(&t.id)?;
                    Some(TemplateOutput {
                        id: t.id.clone(),
                        name: t.name.clone(),
                        generated_output: Some(text.clone()),
                    })
                })
                .collect();
            GenerateContentResponse {
                mode: input.mode,
                outputs: result.outputs,
                failed: result.failed,
                selected_templates,
                generated_output: None,
            }
        }
        GenerationMode::Combined => {
            let text = state.content.generate_combined(&request).await?;
            let selected_templates = SubmissionOutputs::Combined {
                templates: request
                    .templates
                    .iter()
                    .map(|t| TemplateRef {
                        id: t.id.clone(),
                        name: t.name.clone(),
                    })
                    .collect(),
                generated_output: text.clone(),
            }
            .into_per_template();
            // Selected templates without a matching section are reported as
            // failed; their stored entry keeps no output.
            let mut outputs = IndexMap::new();
            let mut failed = Vec::new();
            for output in &selected_templates {
                match &output.generated_output {
                    Some(text) => {
                        outputs.entry(output.id.clone()).or_insert_with(|| text.clone());
                    }
                    None => {
                        tracing::warn!(template_id = %output.id, "No section matched template");
                        failed.push(output.id.clone());
                        outputs.insert(output.id.clone(), failure_placeholder(&output.name));
                    }
                }
            }
            GenerateContentResponse {
                mode: input.mode,
                outputs,
                failed,
                selected_templates,
                generated_output: Some(text),
            }
        }
    };

    Ok(Json(DataResponse { data: response }))
}
