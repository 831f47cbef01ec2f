use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use storage::{
    error::StorageError,
    models::Account,
    repository::account::{AccountRepository, AccountStore},
};

use crate::auth::TokenType;
use crate::error::WebError;
use crate::state::AppState;

/// The verified account behind the request's access token
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers()).ok_or(WebError::Unauthorized)?;

    let claims = state
        .tokens
        .decode(token, TokenType::Access)
        .map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            WebError::Unauthorized
        })?;

    let account_id = claims.account_id().map_err(|_| WebError::Unauthorized)?;

    let account = match AccountRepository::new(state.db.pool())
        .find_by_id(account_id)
        .await
    {
        Ok(account) => account,
        Err(StorageError::NotFound) => {
            tracing::warn!("Token references missing account {}", account_id);
            return Err(WebError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    if !account.is_verified {
        tracing::warn!("Unverified account {} used a token", account_id);
        return Err(WebError::Unauthorized);
    }

    req.extensions_mut().insert(AuthenticatedAccount(account));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
