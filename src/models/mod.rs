pub mod category;
pub mod post;
pub mod user;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

pub use category::Category;
pub use post::Post;
pub use user::User;

/// Rejection of a record whose fields break its schema.
/// The message is returned to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// A persisted record type with a fixed required-field shape.
///
/// `Fields` is the full set of client-supplied fields, used both for create
/// and for full-replacement update.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Display name used in client messages, e.g. "Post not found".
    const NAME: &'static str;
    /// Collection in the document store, also the route prefix.
    const COLLECTION: &'static str;

    type Fields: DeserializeOwned + Send + 'static;

    fn id(&self) -> Uuid;

    fn from_fields(id: Uuid, fields: Self::Fields) -> Result<Self, ValidationError>;

    /// Overwrite every mutable field. Generated fields (id, timestamps) are kept.
    fn replace_fields(&mut self, fields: Self::Fields) -> Result<(), ValidationError>;
}

/// Presence check in declaration order. A field counts as missing when it is
/// absent, null or an empty string.
pub(crate) fn check_required(
    entity: &str,
    fields: &[(&str, &Option<String>)],
) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(path, _)| format!("{path}: Path `{path}` is required."))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(format!(
            "{entity} validation failed: {}",
            missing.join(", ")
        )))
    }
}

/// Parses an optional reference to another record's id. Only the format is
/// checked; the referenced record may not exist.
pub(crate) fn parse_reference(
    entity: &str,
    path: &str,
    raw: Option<String>,
) -> Result<Option<Uuid>, ValidationError> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value).map(Some).map_err(|_| {
            ValidationError(format!(
                "{entity} validation failed: {path}: Cast to identifier failed for value \"{value}\""
            ))
        }),
    }
}
