/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Template identifiers are slugs derived from the template name.
pub type TemplateId = String;
