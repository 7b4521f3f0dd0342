// src/handlers/resource_handlers.rs - generic CRUD endpoints, mounted once per entity

use actix_web::{web, HttpResponse, Scope};
use log::info;

use crate::dtos::MessageOut;
use crate::handlers::ApiError;
use crate::models::Entity;
use crate::repositories::{RepoError, ResourceRepository};
use crate::store::StoreError;
use crate::AppState;

fn repository<E: Entity>(app_state: &AppState) -> ResourceRepository<E> {
    ResourceRepository::new(app_state.store.clone())
}

/// POST /{collection}
pub async fn create_resource<E: Entity>(
    app_state: web::Data<AppState>,
    body: web::Json<E::Fields>,
) -> Result<HttpResponse, ApiError> {
    let record = repository::<E>(&app_state)
        .create(body.into_inner())
        .await
        .map_err(ApiError::from_repo::<E>)?;

    info!("{} created: {}", E::NAME, record.id());
    Ok(HttpResponse::Created().json(record))
}

/// GET /{collection}
pub async fn list_resources<E: Entity>(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = repository::<E>(&app_state)
        .list()
        .await
        .map_err(ApiError::from_repo::<E>)?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /{collection}/{id}
pub async fn get_resource<E: Entity>(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let record = repository::<E>(&app_state)
        .get_by_id(&path)
        .await
        .map_err(ApiError::from_repo::<E>)?;
    Ok(HttpResponse::Ok().json(record))
}

/// PUT /{collection}/{id}
/// Full replacement: fields left out of the body are cleared.
pub async fn update_resource<E: Entity>(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<E::Fields>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let record = repository::<E>(&app_state)
        .update_by_id(&id, body.into_inner())
        .await
        .map_err(|e| match e {
            // an unreadable id is bad replacement input here, not a store fault
            RepoError::Store(err @ StoreError::MalformedId(_)) => ApiError::BadRequest(err.to_string()),
            other => ApiError::from_repo::<E>(other),
        })?;

    info!("{} updated: {}", E::NAME, id);
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /{collection}/{id}
pub async fn delete_resource<E: Entity>(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    repository::<E>(&app_state)
        .delete_by_id(&id)
        .await
        .map_err(ApiError::from_repo::<E>)?;

    info!("{} deleted: {}", E::NAME, id);
    Ok(HttpResponse::Ok().json(MessageOut::new(format!("{} deleted", E::NAME))))
}

pub fn resource_scope<E: Entity>() -> Scope {
    web::scope(&format!("/{}", E::COLLECTION))
        .route("", web::post().to(create_resource::<E>))
        .route("", web::get().to(list_resources::<E>))
        .route("/{id}", web::get().to(get_resource::<E>))
        .route("/{id}", web::put().to(update_resource::<E>))
        .route("/{id}", web::delete().to(delete_resource::<E>))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use futures::future::BoxFuture;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::handlers::configure;
    use crate::store::{DocumentStore, MemoryStore};
    use crate::AppState;

    use super::*;

    fn memory_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(MemoryStore::new())))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(configure)).await
        };
    }

    /// Store whose every call fails as if the database were down.
    struct UnreachableStore;

    impl DocumentStore for UnreachableStore {
        fn insert<'a>(&'a self, _: &'a str, _: Uuid, _: Value) -> BoxFuture<'a, Result<(), StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) })
        }

        fn find_all<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<Vec<Value>, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) })
        }

        fn find_by_id<'a>(&'a self, _: &'a str, _: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) })
        }

        fn replace_by_id<'a>(
            &'a self,
            _: &'a str,
            _: &'a str,
            _: Value,
        ) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) })
        }

        fn delete_by_id<'a>(&'a self, _: &'a str, _: &'a str) -> BoxFuture<'a, Result<bool, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".into())) })
        }
    }

    #[actix_web::test]
    async fn create_post_returns_201_with_generated_fields() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "T", "content": "C", "username": "alice" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["_id", "content", "createdAt", "title", "updatedAt", "username"]);
        assert_eq!(body["title"], "T");
        assert_eq!(body["content"], "C");
        assert_eq!(body["username"], "alice");
    }

    #[actix_web::test]
    async fn create_post_without_title_is_400() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "content": "C", "username": "alice" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Title, content, and username are required");
    }

    #[actix_web::test]
    async fn create_user_names_the_missing_path() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "username": "alice", "email": "a@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "User validation failed: password: Path `password` is required."
        );
    }

    #[actix_web::test]
    async fn wrongly_typed_body_is_400_with_message() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/categories")
            .set_json(json!({ "name": 42 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn empty_listing_is_200_with_empty_array() {
        let app = app!(memory_state());
        for uri in ["/users", "/posts", "/categories"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!([]));
        }
    }

    #[actix_web::test]
    async fn category_lifecycle() {
        let app = app!(memory_state());

        let req = test::TestRequest::post()
            .uri("/categories")
            .set_json(json!({ "name": "rust", "description": "systems" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["_id"].as_str().unwrap().to_string();

        let fetched: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri(&format!("/categories/{id}")).to_request())
                .await;
        assert_eq!(fetched, created);

        let req = test::TestRequest::put()
            .uri(&format!("/categories/{id}"))
            .set_json(json!({ "name": "go" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(resp).await;
        assert_eq!(updated["name"], "go");
        assert!(updated.get("description").is_none());

        let listed: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/categories").to_request()).await;
        assert_eq!(listed, json!([updated]));

        let resp = test::call_service(
            &app,
            test::TestRequest::delete().uri(&format!("/categories/{id}")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Category deleted");

        let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/categories/{id}")).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Category not found");
    }

    #[actix_web::test]
    async fn absent_ids_are_404_for_get_update_and_delete() {
        let app = app!(memory_state());
        let uri = format!("/users/{}", Uuid::new_v4());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "username": "a", "email": "b", "password": "c" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User not found");

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_id_is_500_on_read_and_400_on_update() {
        let app = app!(memory_state());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/xyz").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = test::call_service(&app, test::TestRequest::delete().uri("/posts/xyz").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = test::TestRequest::put()
            .uri("/posts/xyz")
            .set_json(json!({ "title": "T", "content": "C", "username": "alice" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Cast to identifier failed for value \"xyz\" at path \"_id\""
        );
    }

    #[actix_web::test]
    async fn post_update_with_missing_field_is_400() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "T", "content": "C", "username": "alice" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/posts/{}", created["_id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "T2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let unchanged: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(unchanged, created);
    }

    #[actix_web::test]
    async fn store_outage_is_500_with_message() {
        let app = app!(web::Data::new(AppState::new(Arc::new(UnreachableStore))));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "store unavailable: connection refused");

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "username": "a", "email": "b", "password": "c" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let uri = format!("/users/{}", Uuid::new_v4());
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "username": "a", "email": "b", "password": "c" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "store unavailable: connection refused");

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "store unavailable: connection refused");
    }

    #[actix_web::test]
    async fn post_with_malformed_category_is_400() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "title": "T", "content": "C", "username": "alice", "category": "rust" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Post validation failed: category: Cast to identifier failed for value \"rust\""
        );
        let listed: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/posts").to_request()).await;
        assert_eq!(listed, json!([]));
    }

    #[actix_web::test]
    async fn id_is_only_reachable_by_its_canonical_spelling() {
        let app = app!(memory_state());
        let req = test::TestRequest::post()
            .uri("/categories")
            .set_json(json!({ "name": "rust" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id: Uuid = created["_id"].as_str().unwrap().parse().unwrap();

        let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/categories/{id}")).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for alias in [id.simple().to_string(), id.to_string().to_uppercase()] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(&format!("/categories/{alias}")).to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{alias}");
        }
    }

    #[actix_web::test]
    async fn root_says_hello() {
        let app = app!(memory_state());
        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body, web::Bytes::from_static(b"Hello, world!"));
    }
}
