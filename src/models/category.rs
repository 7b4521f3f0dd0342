use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::category_dtos::CategoryDTO;
use crate::models::{check_required, Entity, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Category {
    const NAME: &'static str = "Category";
    const COLLECTION: &'static str = "categories";

    type Fields = CategoryDTO;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_fields(id: Uuid, fields: CategoryDTO) -> Result<Self, ValidationError> {
        check_required(Self::NAME, &[("name", &fields.name)])?;
        Ok(Category {
            id,
            name: fields.name.unwrap_or_default(),
            description: fields.description,
        })
    }

    fn replace_fields(&mut self, fields: CategoryDTO) -> Result<(), ValidationError> {
        *self = Category::from_fields(self.id, fields)?;
        Ok(())
    }
}
