//! Tag and ingredient handlers, shared through [`AttributeResource`].

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cookbook_core::domain::{Ingredient, RecipeAttribute, Tag};
use cookbook_core::filter::AttributeFilter;
use cookbook_core::services::AttributeService;
use cookbook_shared::dto::{AttributeQuery, AttributeRequest, AttributeResponse};

use super::recipes::attribute_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// An attribute type exposed over HTTP.
pub trait AttributeResource: RecipeAttribute {
    fn service(state: &AppState) -> &AttributeService<Self>;
}

impl AttributeResource for Tag {
    fn service(state: &AppState) -> &AttributeService<Self> {
        &state.tags
    }
}

impl AttributeResource for Ingredient {
    fn service(state: &AppState) -> &AttributeService<Self> {
        &state.ingredients
    }
}

/// Collection and detail routes for one attribute type under `base`.
pub fn routes<A: AttributeResource>(base: &'static str) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::resource(base)
                .route(web::get().to(list::<A>))
                .route(web::post().to(create::<A>)),
        )
        .service(
            web::resource(format!("{base}/{{id}}"))
                .route(web::get().to(retrieve::<A>))
                .route(web::put().to(update::<A>))
                .route(web::patch().to(partial_update::<A>))
                .route(web::delete().to(delete::<A>)),
        );
    }
}

fn required_name(body: AttributeRequest) -> AppResult<String> {
    body.name.ok_or_else(|| AppError::required("name"))
}

/// GET {base}?assigned_only=
async fn list<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<AttributeQuery>,
) -> AppResult<HttpResponse> {
    let filter = AttributeFilter::from_query(query.assigned_only.as_deref())?;

    let records = A::service(&state).list(identity.user_id, filter).await?;
    let body: Vec<AttributeResponse> = records.iter().map(attribute_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST {base}
async fn create<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AttributeRequest>,
) -> AppResult<HttpResponse> {
    let name = required_name(body.into_inner())?;

    let record = A::service(&state).create(identity.user_id, &name).await?;
    Ok(HttpResponse::Created().json(attribute_response(&record)))
}

/// GET {base}/{id}
async fn retrieve<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let record = A::service(&state)
        .get(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(attribute_response(&record)))
}

/// PUT {base}/{id}
async fn update<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<AttributeRequest>,
) -> AppResult<HttpResponse> {
    let name = required_name(body.into_inner())?;

    let record = A::service(&state)
        .rename(identity.user_id, path.into_inner(), &name)
        .await?;
    Ok(HttpResponse::Ok().json(attribute_response(&record)))
}

/// PATCH {base}/{id}. Without `name` the record is returned unchanged.
async fn partial_update<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<AttributeRequest>,
) -> AppResult<HttpResponse> {
    let service = A::service(&state);
    let id = path.into_inner();

    let record = match body.into_inner().name {
        Some(name) => service.rename(identity.user_id, id, &name).await?,
        None => service.get(identity.user_id, id).await?,
    };
    Ok(HttpResponse::Ok().json(attribute_response(&record)))
}

/// DELETE {base}/{id}
async fn delete<A: AttributeResource>(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    A::service(&state)
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
