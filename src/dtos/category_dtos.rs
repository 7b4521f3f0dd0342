use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryDTO {
    pub name: Option<String>,
    pub description: Option<String>,
}
