use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::{jwt::JwtKeys, repo::UserRepo, repo_types::User};
use crate::{error::AppError, state::AppState};

const CREDENTIALS: &str = "Could not validate credentials";

/// The active user behind the request's bearer token.
///
/// Any token problem, or a token whose user no longer exists, rejects with
/// 401; an inactive account rejects with 400.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized(CREDENTIALS.into())
        })?;

        let user = load_user(state.users.as_ref(), claims.sub).await?;
        if !user.is_active {
            warn!(user_id = %user.id, "inactive user rejected");
            return Err(AppError::InactiveUser);
        }
        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn load_user(users: &dyn UserRepo, id: Uuid) -> Result<User, AppError> {
    users.find_by_id(id).await?.ok_or_else(|| {
        warn!(user_id = %id, "token subject no longer exists");
        AppError::Unauthorized(CREDENTIALS.into())
    })
}
