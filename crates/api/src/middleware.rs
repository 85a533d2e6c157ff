use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use backoffice_auth::{JwtService, TokenError};

use crate::app::errors::ApiError;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

/// Require a valid bearer token and attach the caller as [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token).map_err(|e| match e {
        TokenError::Expired => ApiError::unauthorized("Token has expired."),
        _ => ApiError::unauthorized("Invalid token."),
    })?;
    let user = CurrentUser::from_claims(claims)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Layered inside [`auth_middleware`]; lets only admins through.
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = req
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(CurrentUser::is_admin);
    if !is_admin {
        return Err(ApiError::forbidden("Admin access required."));
    }
    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::unauthorized("Unauthorized request.");

    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    let header = header.to_str().map_err(|_| missing())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(missing)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(missing());
    }

    Ok(token)
}
