//! Recipe handlers. Every route is scoped to the token's user.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cookbook_core::access::Owned;
use cookbook_core::domain::{Price, Recipe, RecipeAttribute, RecipeChanges};
use cookbook_shared::dto::{
    AttributeResponse, NamedRef, RecipeDetailResponse, RecipeRequest, RecipeResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(super) fn attribute_response<A: RecipeAttribute>(record: &A) -> AttributeResponse {
    AttributeResponse {
        id: record.id(),
        name: record.name().to_string(),
    }
}

fn recipe_response(recipe: &Recipe) -> RecipeResponse {
    RecipeResponse {
        id: recipe.id,
        title: recipe.title.clone(),
        time_minutes: recipe.time_minutes,
        price: recipe.price.to_string(),
        link: recipe.link.clone(),
        tags: recipe.tags.iter().map(attribute_response).collect(),
        ingredients: recipe.ingredients.iter().map(attribute_response).collect(),
    }
}

fn detail_response(recipe: Recipe) -> RecipeDetailResponse {
    RecipeDetailResponse {
        recipe: recipe_response(&recipe),
        description: recipe.description,
    }
}

fn names(refs: Option<Vec<NamedRef>>) -> Option<Vec<String>> {
    refs.map(|refs| refs.into_iter().map(|r| r.name).collect())
}

fn changes(body: RecipeRequest) -> AppResult<RecipeChanges> {
    let price = body
        .price
        .map(|raw| raw.parse::<Price>())
        .transpose()
        .map_err(|e| AppError::invalid("price", e.to_string()))?;

    Ok(RecipeChanges {
        title: body.title,
        description: body.description,
        time_minutes: body.time_minutes,
        price,
        link: body.link,
        tags: names(body.tags),
        ingredients: names(body.ingredients),
    })
}

/// GET /api/recipes
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let recipes = state.recipes.list(identity.user_id).await?;
    let body: Vec<RecipeResponse> = recipes.iter().map(recipe_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/recipes
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<RecipeRequest>,
) -> AppResult<HttpResponse> {
    let recipe = state
        .recipes
        .create(identity.user_id, changes(body.into_inner())?)
        .await?;
    Ok(HttpResponse::Created().json(detail_response(recipe)))
}

/// GET /api/recipes/{id}
pub async fn retrieve(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let recipe = state.recipes.get(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail_response(recipe)))
}

/// PUT /api/recipes/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<RecipeRequest>,
) -> AppResult<HttpResponse> {
    let recipe = state
        .recipes
        .update(identity.user_id, path.into_inner(), changes(body.into_inner())?, false)
        .await?;
    Ok(HttpResponse::Ok().json(detail_response(recipe)))
}

/// PATCH /api/recipes/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<RecipeRequest>,
) -> AppResult<HttpResponse> {
    let recipe = state
        .recipes
        .update(identity.user_id, path.into_inner(), changes(body.into_inner())?, true)
        .await?;
    Ok(HttpResponse::Ok().json(detail_response(recipe)))
}

/// DELETE /api/recipes/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.recipes.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
