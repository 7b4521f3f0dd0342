use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::user_dtos::UserDTO;
use crate::models::{check_required, Entity, ValidationError};

/// A registered user. The password is kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Entity for User {
    const NAME: &'static str = "User";
    const COLLECTION: &'static str = "users";

    type Fields = UserDTO;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_fields(id: Uuid, fields: UserDTO) -> Result<Self, ValidationError> {
        check_required(
            Self::NAME,
            &[
                ("username", &fields.username),
                ("email", &fields.email),
                ("password", &fields.password),
            ],
        )?;

        Ok(User {
            id,
            username: fields.username.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            password: fields.password.unwrap_or_default(),
        })
    }

    fn replace_fields(&mut self, fields: UserDTO) -> Result<(), ValidationError> {
        *self = User::from_fields(self.id, fields)?;
        Ok(())
    }
}
