//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::AccountRole;
use crate::errors::AppError;

/// Authenticated account, as currently stored
#[derive(Clone, Copy, Debug)]
pub struct CurrentAccount {
    pub id: i32,
    pub role: AccountRole,
}

impl CurrentAccount {
    /// Check if the account may administer other accounts.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// reloads the account it names, then injects the CurrentAccount into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    // The stored account decides the role; a deleted account loses access
    let account = match state.auth_service.me(claims.sub).await {
        Ok(account) => account,
        Err(AppError::NotFound) => {
            tracing::debug!(account_id = claims.sub, "Token for a missing account");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e),
    };

    request.extensions_mut().insert(CurrentAccount {
        id: account.id,
        role: account.role,
    });

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(account: &CurrentAccount) -> Result<(), AppError> {
    if account.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Reject requests whose authenticated account is not an admin.
///
/// Must run inside [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let account = request
        .extensions()
        .get::<CurrentAccount>()
        .ok_or(AppError::Unauthorized)?;
    require_admin(account)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let admin = CurrentAccount {
            id: 1,
            role: AccountRole::Superadmin,
        };
        let user = CurrentAccount {
            id: 2,
            role: AccountRole::Developer,
        };

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden)));
    }
}
