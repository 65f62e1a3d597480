//! Repository for content feedback (`feedback/<uuid>.json`).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use catapult_core::error::CoreError;
use catapult_core::types::Timestamp;

use crate::blob::BlobStore;
use crate::error::StoreError;
use crate::repositories::write_json;

pub const FEEDBACK_PREFIX: &str = "feedback/";

/// A thumbs-up / thumbs-down vote on one piece of generated content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedback {
    pub content_id: Option<String>,
    pub feature_name: Option<String>,
    pub is_positive: Option<bool>,
}

/// A stored feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub content_id: String,
    pub feature_name: String,
    /// 1 for positive, 0 for negative.
    pub score: u8,
    pub timestamp: Timestamp,
}

fn required(value: Option<String>, field: &str) -> Result<String, CoreError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("Missing required field: {field}")))
}

/// Provides append-only storage for feedback.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Validate and store one feedback record.
    pub async fn create(
        store: &dyn BlobStore,
        input: CreateFeedback,
    ) -> Result<Feedback, StoreError> {
        let content_id = required(input.content_id, "contentId")?;
        let feature_name = required(input.feature_name, "featureName")?;
        let is_positive = input.is_positive.ok_or_else(|| {
            CoreError::Validation("Missing required field: isPositive".to_string())
        })?;

        let feedback = Feedback {
            id: uuid::Uuid::now_v7().to_string(),
            content_id,
            feature_name,
            score: u8::from(is_positive),
            timestamp: Utc::now(),
        };
        let key = format!("{FEEDBACK_PREFIX}{}.json", feedback.id);
        write_json(store, &key, &feedback).await?;
        tracing::info!(
            feedback_id = %feedback.id,
            content_id = %feedback.content_id,
            score = feedback.score,
            "Feedback recorded",
        );
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::memory::MemoryBlobStore;
    use crate::repositories::read_json;

    #[tokio::test]
    async fn stores_score_and_timestamp() {
        let store = MemoryBlobStore::new();
        let fb = FeedbackRepo::create(
            &store,
            CreateFeedback {
                content_id: Some("blog".into()),
                feature_name: Some("Smart Rollback".into()),
                is_positive: Some(false),
            },
        )
        .await
        .unwrap();
        assert_eq!(fb.score, 0);

        let keys = store.list(FEEDBACK_PREFIX).await.unwrap();
        assert_eq!(keys, vec![format!("feedback/{}.json", fb.id)]);
        let stored: Feedback = read_json(&store, &keys[0]).await.unwrap().unwrap();
        assert_eq!(stored, fb);
    }

    #[tokio::test]
    async fn all_fields_required() {
        let store = MemoryBlobStore::new();
        let cases = [
            (None, Some("F"), Some(true)),
            (Some("c"), Some("  "), Some(true)),
            (Some("c"), Some("F"), None),
        ];
        for (content_id, feature_name, is_positive) in cases {
            let input = CreateFeedback {
                content_id: content_id.map(str::to_string),
                feature_name: feature_name.map(str::to_string),
                is_positive,
            };
            assert_matches!(
                FeedbackRepo::create(&store, input).await,
                Err(StoreError::Core(CoreError::Validation(_)))
            );
        }
        assert!(store.is_empty().await);
    }
}
