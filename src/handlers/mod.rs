pub mod resource_handlers;

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::dtos::MessageOut;
use crate::models::{Category, Entity, Post, User};
use crate::repositories::RepoError;
use resource_handlers::resource_scope;

/// What a handler answers with when it cannot return a record.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn from_repo<E: Entity>(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ApiError::NotFound(format!("{} not found", E::NAME)),
            RepoError::Validation(e) => ApiError::BadRequest(e.to_string()),
            other => {
                error!("{} store failure: {}", E::NAME, other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageOut::new(self.to_string()))
    }
}

/// Unparseable or wrongly typed JSON bodies become 400 `{message}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageOut::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello, world!")
}

/// Every route of the service. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(index)
        .service(resource_scope::<User>())
        .service(resource_scope::<Post>())
        .service(resource_scope::<Category>());
}
