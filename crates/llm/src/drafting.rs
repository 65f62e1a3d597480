//! Drafting a reusable prompt for a new template.

use catapult_core::error::CoreError;
use catapult_core::prompt::{build_draft_system_prompt, TemplateDraftRequest, DRAFT_USER_MESSAGE};

use crate::client::{CompletionRequest, ModelTier, TextGenerator};
use crate::error::GenerationError;

/// Ask the model for a prompt string suited to the described template.
pub async fn draft_template_prompt(
    generator: &dyn TextGenerator,
    request: &TemplateDraftRequest,
) -> Result<String, GenerationError> {
    if request.name.trim().is_empty() || request.description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Template name and description are required".to_string(),
        )
        .into());
    }

    let completion = CompletionRequest::new(DRAFT_USER_MESSAGE)
        .with_system(build_draft_system_prompt(request))
        .with_tier(ModelTier::Light);
    let prompt = generator.complete(completion).await?;
    tracing::debug!(template_name = %request.name, len = prompt.len(), "Drafted template prompt");
    Ok(prompt.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request);
            Ok("\nWrite an upbeat invite.\n".to_string())
        }
    }

    #[tokio::test]
    async fn sends_system_prompt_on_light_tier() {
        let recorder = Recorder::default();
        let req = TemplateDraftRequest {
            name: "Webinar Invite".into(),
            description: "Invite customers".into(),
            ..Default::default()
        };
        let prompt = draft_template_prompt(&recorder, &req).await.unwrap();
        assert_eq!(prompt, "Write an upbeat invite.");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].tier, ModelTier::Light);
        assert_eq!(seen[0].prompt, DRAFT_USER_MESSAGE);
        assert!(seen[0].system.as_deref().unwrap().contains("Template type: Webinar Invite"));
    }

    #[tokio::test]
    async fn requires_name_and_description() {
        let recorder = Recorder::default();
        let req = TemplateDraftRequest {
            name: "Webinar".into(),
            ..Default::default()
        };
        assert_matches!(
            draft_template_prompt(&recorder, &req).await,
            Err(GenerationError::Invalid(CoreError::Validation(_)))
        );
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
