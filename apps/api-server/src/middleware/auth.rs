//! Token authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use cookbook_core::domain::User;
use cookbook_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Accepts `Authorization: Token <t>` or `Authorization: Bearer <t>`. The
/// token must be valid and its user must still exist and be active.
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

/// Roles carried in a user's token.
pub fn roles_for(user: &User) -> Vec<String> {
    let mut roles = vec!["user".to_string()];
    if user.is_staff {
        roles.push("staff".to_string());
    }
    if user.is_superuser {
        roles.push("superuser".to_string());
    }
    roles
}

fn auth_error(err: AuthError) -> AppError {
    let detail = match err {
        AuthError::MissingAuth => "Authentication credentials were not provided.",
        AuthError::TokenExpired => "Token has expired.",
        _ => "Invalid token.",
    };
    AppError::Unauthorized(detail.to_string())
}

/// Pull the token out of an `Authorization` header value.
fn token_from_header(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidToken("malformed authorization header".into()))?;

    if !(scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer")) {
        return Err(AuthError::InvalidToken(format!("unsupported scheme {scheme}")));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken("empty token".into()));
    }
    Ok(token)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().map(str::to_owned));

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("server configuration error".into()));
            };

            let header = match header {
                None => return Err(auth_error(AuthError::MissingAuth)),
                Some(Err(_)) => {
                    return Err(auth_error(AuthError::InvalidToken("non-ascii header".into())));
                }
                Some(Ok(value)) => value,
            };

            let token = token_from_header(&header).map_err(auth_error)?;
            let claims = state.tokens.validate_token(token).map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                auth_error(e)
            })?;

            // The account may have been removed or deactivated since issue
            let user = state.users.active_user(claims.user_id).await?;

            Ok(Identity {
                user_id: user.id,
                email: user.email.clone(),
                roles: roles_for(&user),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_header_schemes() {
        assert_eq!(token_from_header("Token abc").unwrap(), "abc");
        assert_eq!(token_from_header("Bearer abc").unwrap(), "abc");
        assert_eq!(token_from_header("bearer  abc ").unwrap(), "abc");
        assert!(token_from_header("Basic abc").is_err());
        assert!(token_from_header("abc").is_err());
        assert!(token_from_header("Token ").is_err());
    }

    #[test]
    fn test_roles_for_superuser() {
        let mut user = User::new("a@b.com".into(), "A".into(), "hash".into());
        assert_eq!(roles_for(&user), vec!["user"]);

        user.elevate();
        let roles = roles_for(&user);
        assert!(roles.contains(&"staff".to_string()));
        assert!(roles.contains(&"superuser".to_string()));
    }
}
