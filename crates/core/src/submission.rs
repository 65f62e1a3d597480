//! Submission records: one persisted content-generation run.
//!
//! Two storage shapes exist. Current records carry one output per template
//! (`selectedTemplates[].generatedOutput`). Legacy records carry a single
//! combined `generatedOutput` string split by markdown headings. Both are read
//! into [`Submission`], with [`SubmissionOutputs`] telling them apart. New
//! records are always written per template.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::feature::{FeatureDetails, TeamDetails};
use crate::sections::associate_sections;
use crate::template::validate_template_id;
use crate::types::{TemplateId, Timestamp};

// ---------------------------------------------------------------------------
// Template references and outputs
// ---------------------------------------------------------------------------

/// A template as referenced from a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
}

/// Generated output for one selected template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOutput {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_output: Option<String>,
}

/// The outputs of a submission in either storage shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutputs {
    /// One output per template.
    PerTemplate(Vec<TemplateOutput>),
    /// Legacy: every template's text in one heading-delimited string.
    Combined {
        templates: Vec<TemplateRef>,
        generated_output: String,
    },
}

impl SubmissionOutputs {
    /// Templates referenced by this submission, in selection order.
    pub fn templates(&self) -> Vec<TemplateRef> {
        match self {
            Self::PerTemplate(outputs) => outputs
                .iter()
                .map(|o| TemplateRef {
                    id: o.id.clone(),
                    name: o.name.clone(),
                })
                .collect(),
            Self::Combined { templates, .. } => templates.clone(),
        }
    }

    /// Convert to the per-template shape, splitting combined output by
    /// section heading.
    ///
    /// Selected templates that no section matched are appended in selection
    /// order with no output.
    pub fn into_per_template(self) -> Vec<TemplateOutput> {
        match self {
            Self::PerTemplate(outputs) => outputs,
            Self::Combined {
                templates,
                generated_output,
            } => {
                let mut outputs: Vec<TemplateOutput> =
                    associate_sections(&generated_output, &templates)
                        .into_iter()
                        .map(|section| TemplateOutput {
                            generated_output: Some(section.content()),
                            id: section.template_id,
                            name: section.title,
                        })
                        .collect();
                for template in templates {
                    if outputs.iter().any(|o| o.id == template.id) {
                        continue;
                    }
                    outputs.push(TemplateOutput {
                        id: template.id,
                        name: template.name,
                        generated_output: None,
                    });
                }
                outputs
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A stored content-generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubmissionRecord", into = "SubmissionRecord")]
pub struct Submission {
    /// Storage-assigned identifier. Empty until the record has been stored.
    pub id: String,
    pub team: Option<TeamDetails>,
    pub feature: FeatureDetails,
    pub context_prompt: Option<String>,
    pub outputs: SubmissionOutputs,
    pub timestamp: Timestamp,
}

impl Submission {
    /// `true` for records stored in the legacy combined shape.
    pub fn is_combined(&self) -> bool {
        matches!(self.outputs, SubmissionOutputs::Combined { .. })
    }

    /// Return this submission with its outputs in the per-template shape.
    pub fn normalized(self) -> Self {
        if !self.is_combined() {
            return self;
        }
        Self {
            outputs: SubmissionOutputs::PerTemplate(self.outputs.into_per_template()),
            ..self
        }
    }
}

/// Wire shape shared by both storage generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    team: Option<TeamDetails>,
    feature: FeatureDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context_prompt: Option<String>,
    #[serde(default)]
    selected_templates: Vec<TemplateOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_output: Option<String>,
    timestamp: Timestamp,
}

impl From<SubmissionRecord> for Submission {
    fn from(r: SubmissionRecord) -> Self {
        let has_per_template = r.selected_templates.iter().any(|t| t.generated_output.is_some());
        let outputs = match r.generated_output {
            Some(combined) if !has_per_template => SubmissionOutputs::Combined {
                templates: r
                    .selected_templates
                    .into_iter()
                    .map(|t| TemplateRef {
                        id: t.id,
                        name: t.name,
                    })
                    .collect(),
                generated_output: combined,
            },
            _ => SubmissionOutputs::PerTemplate(r.selected_templates),
        };
        Self {
            id: r.id,
            team: r.team,
            feature: r.feature,
            context_prompt: r.context_prompt,
            outputs,
            timestamp: r.timestamp,
        }
    }
}

impl From<Submission> for SubmissionRecord {
    fn from(s: Submission) -> Self {
        let (selected_templates, generated_output) = match s.outputs {
            SubmissionOutputs::PerTemplate(outputs) => (outputs, None),
            SubmissionOutputs::Combined {
                templates,
                generated_output,
            } => (
                templates
                    .into_iter()
                    .map(|t| TemplateOutput {
                        id: t.id,
                        name: t.name,
                        generated_output: None,
                    })
                    .collect(),
                Some(generated_output),
            ),
        };
        Self {
            id: s.id,
            team: s.team,
            feature: s.feature,
            context_prompt: s.context_prompt,
            selected_templates,
            generated_output,
            timestamp: s.timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for storing a new submission.
///
/// Either per-template outputs or a legacy combined `generatedOutput` may be
/// supplied; combined text is split into per-template outputs before the
/// record is built, so it is never stored in the combined shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    #[serde(default)]
    pub team: Option<TeamDetails>,
    pub feature: FeatureDetails,
    #[serde(default)]
    pub context_prompt: Option<String>,
    #[serde(default)]
    pub selected_templates: Vec<TemplateOutput>,
    #[serde(default)]
    pub generated_output: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl NewSubmission {
    /// Validate required feature fields and template selection.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.feature.validate()?;
        if self.selected_templates.is_empty() {
            return Err(CoreError::Validation(
                "At least one template must be selected".to_string(),
            ));
        }
        for t in &self.selected_templates {
            if t.id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Selected templates must have an id".to_string(),
                ));
            }
            validate_template_id(&t.id)?;
        }
        Ok(())
    }

    /// Build the record to store under `id`, stamped `now` unless the caller
    /// supplied a timestamp.
    pub fn into_submission(self, id: String, now: Timestamp) -> Submission {
        let has_per_template = self
            .selected_templates
            .iter()
            .any(|t| t.generated_output.is_some());
        let outputs = match self.generated_output {
            Some(combined) if !has_per_template => SubmissionOutputs::Combined {
                templates: self
                    .selected_templates
                    .into_iter()
                    .map(|t| TemplateRef {
                        id: t.id,
                        name: t.name,
                    })
                    .collect(),
                generated_output: combined,
            }
            .into_per_template(),
            _ => self.selected_templates,
        };
        Submission {
            id,
            team: self.team,
            feature: self.feature,
            context_prompt: self.context_prompt.filter(|c| !c.trim().is_empty()),
            outputs: SubmissionOutputs::PerTemplate(outputs),
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
