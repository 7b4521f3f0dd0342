use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::post_dtos::PostDTO;
use crate::models::{parse_reference, Entity, ValidationError};

const REQUIRED_MESSAGE: &str = "Title, content, and username are required";

/// A blog post. `username` and `category` are informal references; neither is
/// checked against the users or categories collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    // Set once at creation, updates leave it alone.
    pub updated_at: DateTime<Utc>,
}

struct PostBody {
    username: String,
    title: String,
    content: String,
    category: Option<Uuid>,
}

fn validate(fields: PostDTO) -> Result<PostBody, ValidationError> {
    let (Some(title), Some(content), Some(username)) = (fields.title, fields.content, fields.username) else {
        return Err(ValidationError(REQUIRED_MESSAGE.to_string()));
    };
    if title.is_empty() || content.is_empty() || username.is_empty() {
        return Err(ValidationError(REQUIRED_MESSAGE.to_string()));
    }

    let category = parse_reference(Post::NAME, "category", fields.category)?;
    Ok(PostBody {
        username,
        title,
        content,
        category,
    })
}

impl Entity for Post {
    const NAME: &'static str = "Post";
    const COLLECTION: &'static str = "posts";

    type Fields = PostDTO;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_fields(id: Uuid, fields: PostDTO) -> Result<Self, ValidationError> {
        let body = validate(fields)?;
        let now = Utc::now();
        Ok(Post {
            id,
            username: body.username,
            title: body.title,
            content: body.content,
            category: body.category,
            created_at: now,
            updated_at: now,
        })
    }

    fn replace_fields(&mut self, fields: PostDTO) -> Result<(), ValidationError> {
        let body = validate(fields)?;
        self.username = body.username;
        self.title = body.title;
        self.content = body.content;
        self.category = body.category;
        Ok(())
    }
}
