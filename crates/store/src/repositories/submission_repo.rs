//! Repository for stored submissions (`teams/<id>/submission.json`).

use chrono::Utc;
use futures::future::join_all;

use catapult_core::error::CoreError;
use catapult_core::slug::slug;
use catapult_core::submission::{NewSubmission, Submission};

use crate::blob::BlobStore;
use crate::error::StoreError;
use crate::repositories::{read_json, read_json_lenient, write_json};

pub const SUBMISSION_PREFIX: &str = "teams/";
const RECORD_FILE: &str = "submission.json";

fn submission_key(id: &str) -> String {
    format!("{SUBMISSION_PREFIX}{id}/{RECORD_FILE}")
}

/// Extract the submission id from a record key, if it is one.
fn id_from_key(key: &str) -> Option<&str> {
    let id = key
        .strip_prefix(SUBMISSION_PREFIX)?
        .strip_suffix(RECORD_FILE)?
        .strip_suffix('/')?;
    (!id.is_empty() && !id.contains('/')).then_some(id)
}

/// Reject ids that would address anything outside their own record.
pub fn validate_submission_id(id: &str) -> Result<(), CoreError> {
    let is_dot_segment = id == "." || id == "..";
    if id.trim().is_empty() || id.contains('/') || id.contains('\\') || is_dot_segment {
        return Err(CoreError::Validation(format!("Invalid submission id '{id}'")));
    }
    Ok(())
}

/// New id: `<slug(feature name)>-<uuid v7>`.
///
/// The slug keeps ids readable; the time-ordered UUID makes them unique.
pub fn new_submission_id(feature_name: &str) -> String {
    let stem = slug(feature_name);
    let uuid = uuid::Uuid::now_v7();
    if stem.is_empty() {
        format!("submission-{uuid}")
    } else {
        format!("{stem}-{uuid}")
    }
}

/// Provides create/list/find/delete for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Validate, assign an id and store the record in one put.
    pub async fn create(
        store: &dyn BlobStore,
        input: NewSubmission,
    ) -> Result<Submission, StoreError> {
        input.validate()?;
        let id = new_submission_id(&input.feature.name);
        let submission = input.into_submission(id, Utc::now());
        write_json(store, &submission_key(&submission.id), &submission).await?;
        tracing::info!(submission_id = %submission.id, "Submission stored");
        Ok(submission)
    }

    /// Find one submission. Unparseable records read as absent.
    pub async fn find_by_id(
        store: &dyn BlobStore,
        id: &str,
    ) -> Result<Option<Submission>, StoreError> {
        validate_submission_id(id)?;
        let record = read_json_lenient::<Submission>(store, &submission_key(id)).await?;
        Ok(record.map(|s| with_id(s, id)))
    }

    /// Every readable submission, newest first.
    ///
    /// Records that cannot be read or parsed are logged and skipped; only a
    /// failure to list the store fails the call.
    pub async fn list_all(store: &dyn BlobStore) -> Result<Vec<Submission>, StoreError> {
        let keys = store.list(SUBMISSION_PREFIX).await?;
        let reads = keys
            .iter()
            .filter_map(|key| Some((key.as_str(), id_from_key(key)?)))
            .map(|(key, id)| async move {
                match read_json::<Submission>(store, key).await {
                    Ok(record) => record.map(|s| with_id(s, id)),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Skipping unreadable submission");
                        None
                    }
                }
            });

        let mut submissions: Vec<Submission> =
            join_all(reads).await.into_iter().flatten().collect();
        submissions.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(submissions)
    }

    /// Delete a submission. Deleting a missing id succeeds.
    pub async fn delete_by_id(store: &dyn BlobStore, id: &str) -> Result<(), StoreError> {
        validate_submission_id(id)?;
        store.delete(&submission_key(id)).await?;
        tracing::info!(submission_id = %id, "Submission deleted");
        Ok(())
    }
}

/// The storage key is authoritative for the id; legacy records lack one.
fn with_id(mut submission: Submission, id: &str) -> Submission {
    submission.id = id.to_string();
    submission
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use catapult_core::feature::FeatureDetails;
    use catapult_core::submission::{SubmissionOutputs, TemplateOutput};
    use chrono::{Duration, TimeZone};

    use crate::memory::MemoryBlobStore;

    fn new_submission(name: &str, ts: Option<chrono::DateTime<Utc>>) -> NewSubmission {
        NewSubmission {
            team: None,
            feature: FeatureDetails {
                name: name.into(),
                description: "desc".into(),
                key_benefits: "Faster".into(),
                ..Default::default()
            },
            context_prompt: Some("For SREs".into()),
            selected_templates: vec![
                TemplateOutput {
                    id: "blog".into(),
                    name: "Blog Post".into(),
                    generated_output: Some("Blog text".into()),
                },
                TemplateOutput {
                    id: "release_notes".into(),
                    name: "Release Notes".into(),
                    generated_output: Some("RN text".into()),
                },
            ],
            generated_output: None,
            timestamp: ts,
        }
    }

    #[test]
    fn id_format() {
        let id = new_submission_id("Smart Rollback");
        assert!(id.starts_with("smart-rollback-"));
        assert!(uuid::Uuid::parse_str(&id["smart-rollback-".len()..]).is_ok());
        assert!(new_submission_id("???").starts_with("submission-"));
        assert_ne!(new_submission_id("x"), new_submission_id("x"));
    }

    #[test]
    fn id_validation() {
        assert!(validate_submission_id("smart-rollback-0190").is_ok());
        assert!(validate_submission_id("Smart Rollback0.123").is_ok());
        assert!(validate_submission_id("a/b").is_err());
        assert!(validate_submission_id("Release v2..0.42").is_ok());
        assert!(validate_submission_id("..").is_err());
        assert!(validate_submission_id(".").is_err());
        assert!(validate_submission_id("../x").is_err());
        assert!(validate_submission_id("..\\x").is_err());
        assert!(validate_submission_id("").is_err());
    }

    #[test]
    fn id_from_record_key() {
        assert_eq!(id_from_key("teams/x-1/submission.json"), Some("x-1"));
        assert_eq!(id_from_key("teams/x-1/other.json"), None);
        assert_eq!(id_from_key("teams/a/b/submission.json"), None);
        assert_eq!(id_from_key("teams/submission.json"), None);
    }

    #[tokio::test]
    async fn create_then_list_roundtrips() {
        let store = MemoryBlobStore::new();
        let input = new_submission("Smart Rollback", None);
        let created = SubmissionRepo::create(&store, input.clone())
            .await
            .unwrap();

        let all = SubmissionRepo::list_all(&store).await.unwrap();
        assert_eq!(all.len(), 1);
        let listed = &all[0];
        assert_eq!(listed, &created);
        assert_eq!(listed.feature, input.feature);
        assert_eq!(listed.context_prompt.as_deref(), Some("For SREs"));
        assert_eq!(
            listed.outputs,
            SubmissionOutputs::PerTemplate(input.selected_templates)
        );
    }

    #[tokio::test]
    async fn combined_payload_missing_a_heading_keeps_every_template() {
        let store = MemoryBlobStore::new();
        let mut input = new_submission("Smart Rollback", None);
        for t in &mut input.selected_templates {
            t.generated_output = None;
        }
        input.generated_output = Some("# Blog Post\nOnly the blog came back".into());

        let created = SubmissionRepo::create(&store, input).await.unwrap();
        let found = SubmissionRepo::find_by_id(&store, &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            found.outputs,
            SubmissionOutputs::PerTemplate(vec![
                TemplateOutput {
                    id: "blog".into(),
                    name: "Blog Post".into(),
                    generated_output: Some("# Blog Post\n\nOnly the blog came back".into()),
                },
                TemplateOutput {
                    id: "release_notes".into(),
                    name: "Release Notes".into(),
                    generated_output: None,
                },
            ])
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let store = MemoryBlobStore::new();
        let mut input = new_submission("X", None);
        input.selected_templates.clear();
        assert_matches!(
            SubmissionRepo::create(&store, input).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_newest_first_and_delete() {
        let store = MemoryBlobStore::new();
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let t2 = t1 + Duration::hours(1);
        let first = SubmissionRepo::create(&store, new_submission("One", Some(t1)))
            .await
            .unwrap();
        let second = SubmissionRepo::create(&store, new_submission("Two", Some(t2)))
            .await
            .unwrap();

        let ids: Vec<_> = SubmissionRepo::list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        SubmissionRepo::delete_by_id(&store, &second.id).await.unwrap();
        let ids: Vec<_> = SubmissionRepo::list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![first.id.clone()]);

        // Idempotent.
        SubmissionRepo::delete_by_id(&store, &second.id).await.unwrap();
    }

    #[tokio::test]
    async fn equal_timestamps_order_by_id() {
        let store = MemoryBlobStore::new();
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        for name in ["b", "a", "c"] {
            SubmissionRepo::create(&store, new_submission(name, Some(ts)))
                .await
                .unwrap();
        }
        let names: Vec<_> = SubmissionRepo::list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.feature.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn corrupt_records_are_skipped() {
        let store = MemoryBlobStore::new();
        SubmissionRepo::create(&store, new_submission("Good", None))
            .await
            .unwrap();
        store
            .put("teams/broken/submission.json", b"{oops".to_vec())
            .await
            .unwrap();
        store.put("teams/readme.txt", b"x".to_vec()).await.unwrap();

        let all = SubmissionRepo::list_all(&store).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].feature.name, "Good");
        assert_eq!(SubmissionRepo::find_by_id(&store, "broken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn legacy_record_gets_id_from_key() {
        let store = MemoryBlobStore::new();
        let legacy = r##"{
            "feature": {"name": "Smart Rollback", "description": "d"},
            "selectedTemplates": [{"id": "blog", "name": "Blog Post"}],
            "generatedOutput": "# Blog Post\nHello",
            "timestamp": "2024-05-01T00:00:00.000Z"
        }"##;
        store
            .put("teams/Smart Rollback0.42/submission.json", legacy.as_bytes().to_vec())
            .await
            .unwrap();

        let found = SubmissionRepo::find_by_id(&store, "Smart Rollback0.42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "Smart Rollback0.42");
        assert!(found.is_combined());
    }

    #[tokio::test]
    async fn find_and_delete_reject_traversal() {
        let store = MemoryBlobStore::new();
        assert_matches!(
            SubmissionRepo::find_by_id(&store, "../default").await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            SubmissionRepo::delete_by_id(&store, "a/b").await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
    }
}
