use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UserDTO {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
