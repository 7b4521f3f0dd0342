pub mod category_dtos;
pub mod post_dtos;
pub mod user_dtos;

use serde::{Deserialize, Serialize};

/// Body of every non-record response: errors and delete confirmations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageOut {
    pub message: String,
}

impl MessageOut {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
