use serde::Deserialize;

/// Full field set for creating or replacing a post. Every field is optional
/// here so that a missing field becomes a validation message instead of a
/// parse error.
#[derive(Debug, Default, Deserialize)]
pub struct PostDTO {
    pub username: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>, // id of a category, not checked for existence
}
