//! User profile handlers. Reads and registration are public.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cookbook_core::domain::{NewUser, ProfileChanges, User};
use cookbook_core::filter::ProfileFilter;
use cookbook_shared::dto::{
    CreateProfileRequest, ProfileQuery, ProfileResponse, UpdateProfileRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn profile_response(user: User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        email: user.email,
        name: user.name,
    }
}

fn changes(body: UpdateProfileRequest) -> ProfileChanges {
    ProfileChanges {
        email: body.email,
        name: body.name,
        password: body.password,
    }
}

/// GET /api/profile?search=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ProfileQuery>,
) -> AppResult<HttpResponse> {
    let filter = query
        .into_inner()
        .search
        .map(ProfileFilter::search)
        .unwrap_or_default();

    let users = state.users.list(&filter).await?;
    let body: Vec<ProfileResponse> = users.into_iter().map(profile_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/profile
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .create_user(NewUser {
            email: req.email,
            name: req.name,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(profile_response(user)))
}

/// GET /api/profile/{id}
pub async fn retrieve(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile_response(user)))
}

/// PUT /api/profile/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .update(identity.user_id, path.into_inner(), changes(body.into_inner()), false)
        .await?;
    Ok(HttpResponse::Ok().json(profile_response(user)))
}

/// PATCH /api/profile/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .update(identity.user_id, path.into_inner(), changes(body.into_inner()), true)
        .await?;
    Ok(HttpResponse::Ok().json(profile_response(user)))
}

/// DELETE /api/profile/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.users.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
