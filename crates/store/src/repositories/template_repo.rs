//! Repository for templates: shipped defaults, user overrides and the
//! precomputed list snapshot.
//!
//! Layout:
//!
//! * `default/<id>.json` holds shipped defaults (`{name, description, prompt}`).
//! * `updated/<id>.json` holds user edits and custom templates.
//! * `latest-templates.json` caches the merged list for fast listing.
//!
//! The snapshot is derived data. Writes to `updated/` are the source of
//! truth and are never undone because a snapshot rebuild failed; instead the
//! snapshot is deleted so readers fall back to recomputation.

use futures::future::join_all;
use serde::Serialize;

use catapult_core::error::CoreError;
use catapult_core::slug::slug;
use catapult_core::template::{
    merge_templates, validate_template_id, SnapshotEntry, Template, TemplateContent,
    TemplateInput, TemplateOrigin,
};
use catapult_core::types::TemplateId;

use crate::blob::BlobStore;
use crate::error::StoreError;
use crate::repositories::{read_json_lenient, write_json};

pub const DEFAULT_PREFIX: &str = "default/";
pub const OVERRIDE_PREFIX: &str = "updated/";
pub const SNAPSHOT_KEY: &str = "latest-templates.json";

const RECORD_SUFFIX: &str = ".json";

fn default_key(id: &str) -> String {
    format!("{DEFAULT_PREFIX}{id}{RECORD_SUFFIX}")
}

fn override_key(id: &str) -> String {
    format!("{OVERRIDE_PREFIX}{id}{RECORD_SUFFIX}")
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to the list snapshot after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Rebuilt and written.
    Refreshed,
    /// Rebuild failed; the old snapshot was removed so listings recompute.
    Invalidated,
    /// Rebuild failed and the old snapshot could not be removed.
    Stale,
}

/// Result of [`TemplateRepo::save`] and [`TemplateRepo::create`].
#[derive(Debug, Clone, Serialize)]
pub struct SavedTemplate {
    pub template: Template,
    pub snapshot: SnapshotStatus,
}

/// Result of [`TemplateRepo::revert`].
#[derive(Debug, Clone, Serialize)]
pub struct RevertOutcome {
    /// The default now in effect, if the id has one.
    pub template: Option<Template>,
    pub snapshot: SnapshotStatus,
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Provides resolve/list/save/revert/delete for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Resolve one id: the override if present, else the default.
    pub async fn resolve(store: &dyn BlobStore, id: &str) -> Result<Template, StoreError> {
        validate_template_id(id)?;
        let (override_key, default_key) = (override_key(id), default_key(id));
        let (edited, default) = tokio::try_join!(
            read_json_lenient::<TemplateContent>(store, &override_key),
            read_json_lenient::<TemplateContent>(store, &default_key),
        )?;

        match (edited, default) {
            (Some(edited), Some(_)) => Ok(Template::from_content(id, edited, TemplateOrigin::Override)),
            (Some(edited), None) => Ok(Template::from_content(id, edited, TemplateOrigin::Custom)),
            (None, Some(default)) => Ok(Template::from_content(id, default, TemplateOrigin::Default)),
            (None, None) => Err(CoreError::not_found("Template", id).into()),
        }
    }

    /// The effective template list, from the snapshot when it is usable.
    pub async fn resolve_all(store: &dyn BlobStore) -> Result<Vec<Template>, StoreError> {
        if let Some(entries) = read_json_lenient::<Vec<SnapshotEntry>>(store, SNAPSHOT_KEY).await? {
            tracing::debug!(count = entries.len(), "Serving templates from snapshot");
            return Ok(entries.into_iter().map(Template::from).collect());
        }
        Self::compute_all(store).await
    }

    /// Recompute the effective list from `default/` and `updated/`.
    ///
    /// Defaults come first in listing order, custom ids follow sorted.
    /// Malformed records are skipped.
    pub async fn compute_all(store: &dyn BlobStore) -> Result<Vec<Template>, StoreError> {
        let (defaults, overrides) = tokio::try_join!(
            load_prefix(store, DEFAULT_PREFIX),
            load_prefix(store, OVERRIDE_PREFIX),
        )?;
        Ok(merge_templates(defaults, overrides))
    }

    /// Create a custom template whose id is the slug of its name.
    pub async fn create(
        store: &dyn BlobStore,
        input: TemplateInput,
    ) -> Result<SavedTemplate, StoreError> {
        let id = slug(&input.name);
        if id.is_empty() {
            return Err(CoreError::Validation(
                "Template name must contain at least one letter or digit".to_string(),
            )
            .into());
        }
        match Self::resolve(store, &id).await {
            Ok(_) => {
                return Err(CoreError::Conflict(format!("Template '{id}' already exists")).into());
            }
            Err(StoreError::Core(CoreError::NotFound { .. })) => {}
            Err(e) => return Err(e),
        }
        Self::save(store, &id, input).await
    }

    /// Upsert the override for `id`, then rebuild the snapshot.
    ///
    /// The override write is the commit point; the snapshot step is best
    /// effort and only reported. A failed default lookup aborts before
    /// anything is written.
    pub async fn save(
        store: &dyn BlobStore,
        id: &str,
        input: TemplateInput,
    ) -> Result<SavedTemplate, StoreError> {
        validate_template_id(id)?;
        let content = input.into_content()?;
        let has_default = read_json_lenient::<TemplateContent>(store, &default_key(id))
            .await?
            .is_some();
        write_json(store, &override_key(id), &content).await?;

        let origin = if has_default {
            TemplateOrigin::Override
        } else {
            TemplateOrigin::Custom
        };
        tracing::info!(template_id = %id, ?origin, "Template saved");

        let snapshot = Self::rebuild_snapshot(store).await;
        Ok(SavedTemplate {
            template: Template::from_content(id, content, origin),
            snapshot,
        })
    }

    /// Drop the override for `id` so its default (if any) is visible again.
    ///
    /// Reverting an id without an override is not an error.
    pub async fn revert(store: &dyn BlobStore, id: &str) -> Result<RevertOutcome, StoreError> {
        validate_template_id(id)?;
        store.delete(&override_key(id)).await?;
        tracing::info!(template_id = %id, "Template override removed");

        let snapshot = Self::rebuild_snapshot(store).await;
        let template = read_json_lenient::<TemplateContent>(store, &default_key(id))
            .await?
            .map(|content| Template::from_content(id, content, TemplateOrigin::Default));
        Ok(RevertOutcome { template, snapshot })
    }

    /// Delete a custom template.
    ///
    /// Ids backed by a default cannot be deleted (revert them instead).
    /// Returns `false` when there was nothing to delete.
    pub async fn delete(store: &dyn BlobStore, id: &str) -> Result<bool, StoreError> {
        validate_template_id(id)?;
        if store.get(&default_key(id)).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Template '{id}' is a default template and cannot be deleted; revert it instead"
            ))
            .into());
        }
        let key = override_key(id);
        if store.get(&key).await?.is_none() {
            return Ok(false);
        }
        store.delete(&key).await?;
        tracing::info!(template_id = %id, "Custom template deleted");
        Self::rebuild_snapshot(store).await;
        Ok(true)
    }

    /// Recompute the merged list and write it as the snapshot.
    ///
    /// Returns the number of templates written.
    pub async fn refresh_snapshot(store: &dyn BlobStore) -> Result<usize, StoreError> {
        let templates = Self::compute_all(store).await?;
        let entries: Vec<SnapshotEntry> = templates.iter().map(SnapshotEntry::from).collect();
        write_json(store, SNAPSHOT_KEY, &entries).await?;
        Ok(entries.len())
    }

    /// Write `default/<id>.json` for every id that has no default yet.
    ///
    /// Existing defaults are left alone. Returns the ids written.
    pub async fn seed_defaults(
        store: &dyn BlobStore,
        defaults: Vec<(TemplateId, TemplateContent)>,
    ) -> Result<Vec<TemplateId>, StoreError> {
        let mut written = Vec::new();
        for (id, content) in defaults {
            validate_template_id(&id)?;
            let key = default_key(&id);
            if store.get(&key).await?.is_some() {
                continue;
            }
            write_json(store, &key, &content).await?;
            written.push(id);
        }
        if !written.is_empty() {
            tracing::info!(count = written.len(), "Seeded default templates");
            Self::rebuild_snapshot(store).await;
        }
        Ok(written)
    }

    /// Best-effort snapshot rebuild after a write.
    async fn rebuild_snapshot(store: &dyn BlobStore) -> SnapshotStatus {
        let err = match Self::refresh_snapshot(store).await {
            Ok(count) => {
                tracing::debug!(count, "Template snapshot refreshed");
                return SnapshotStatus::Refreshed;
            }
            Err(e) => e,
        };
        tracing::warn!(error = %err, "Template snapshot rebuild failed, invalidating");
        match store.delete(SNAPSHOT_KEY).await {
            Ok(()) => SnapshotStatus::Invalidated,
            Err(e) => {
                tracing::error!(error = %e, "Failed to remove stale template snapshot");
                SnapshotStatus::Stale
            }
        }
    }
}

/// Load every `<prefix><id>.json` record, in key order. Unreadable,
/// malformed and non-template keys are skipped.
async fn load_prefix(
    store: &dyn BlobStore,
    prefix: &str,
) -> Result<Vec<(TemplateId, TemplateContent)>, StoreError> {
    let ids: Vec<TemplateId> = store
        .list(prefix)
        .await?
        .into_iter()
        .filter_map(|key| {
            let id = key.strip_prefix(prefix)?.strip_suffix(RECORD_SUFFIX)?;
            validate_template_id(id).ok()?;
            Some(id.to_string())
        })
        .collect();

    let reads = ids.iter().map(|id| async move {
        let key = format!("{prefix}{id}{RECORD_SUFFIX}");
        match read_json_lenient::<TemplateContent>(store, &key).await {
            Ok(content) => content.map(|c| (id.clone(), c)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping unreadable template");
                None
            }
        }
    });
    Ok(join_all(reads).await.into_iter().flatten().collect())
}
