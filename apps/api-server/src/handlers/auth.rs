//! Login handler.

use actix_web::{HttpResponse, web};

use cookbook_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::auth::roles_for;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.users.authenticate(&req.email, &req.password).await?;

    let token = state
        .tokens
        .generate_token(user.id, &user.email, roles_for(&user))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}
