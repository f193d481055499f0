//! Profile feed handlers. All routes require a token.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cookbook_core::domain::ProfileFeedItem;
use cookbook_shared::dto::{FeedItemRequest, FeedItemResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn feed_response(item: ProfileFeedItem) -> FeedItemResponse {
    FeedItemResponse {
        id: item.id,
        owner: item.user_id,
        status_text: item.status_text,
        created_on: item.created_on,
    }
}

/// GET /api/feed
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let items = state.feed.list(identity.user_id).await?;
    let body: Vec<FeedItemResponse> = items.into_iter().map(feed_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/feed
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<FeedItemRequest>,
) -> AppResult<HttpResponse> {
    let status_text = body
        .into_inner()
        .status_text
        .ok_or_else(|| AppError::required("status_text"))?;

    let item = state.feed.create(identity.user_id, status_text).await?;
    Ok(HttpResponse::Created().json(feed_response(item)))
}

/// GET /api/feed/{id}
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let item = state.feed.get(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(feed_response(item)))
}

/// PUT /api/feed/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<FeedItemRequest>,
) -> AppResult<HttpResponse> {
    let status_text = body
        .into_inner()
        .status_text
        .ok_or_else(|| AppError::required("status_text"))?;

    let item = state
        .feed
        .update(identity.user_id, path.into_inner(), Some(status_text))
        .await?;
    Ok(HttpResponse::Ok().json(feed_response(item)))
}

/// PATCH /api/feed/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<FeedItemRequest>,
) -> AppResult<HttpResponse> {
    let item = state
        .feed
        .update(identity.user_id, path.into_inner(), body.into_inner().status_text)
        .await?;
    Ok(HttpResponse::Ok().json(feed_response(item)))
}

/// DELETE /api/feed/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.feed.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
