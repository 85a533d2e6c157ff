//! Account endpoints. The password-reset flow is public; the rest is not.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};

use crate::app::dto::{EmailRequest, LoginRequest, ResetPasswordRequest, VerifyOtpRequest};
use crate::app::errors::{self, ApiResult, Envelope};
use crate::app::extract::{RecordPath, TrimmedJson};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::middleware::admin_middleware;

pub fn public_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", patch(verify_otp))
        .route("/reset-password", patch(reset_password))
}

pub fn protected_router() -> Router {
    let admin = Router::new()
        .route("/", get(list_users))
        .route("/manage-block/:id", patch(manage_block))
        .route_layer(middleware::from_fn(admin_middleware));

    Router::new().route("/:id", get(get_user)).merge(admin)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(body): TrimmedJson<LoginRequest>,
) -> ApiResult {
    let (token, user) = services.auth.login(&body.email, &body.password).await?;
    Ok(Envelope::new(StatusCode::OK, "login successfull.", Some(user))
        .with_token(token)
        .into_response())
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(body): TrimmedJson<EmailRequest>,
) -> ApiResult {
    services.auth.forgot_password(&body.email).await?;
    Ok(errors::message(StatusCode::CREATED, "OTP has been sent to your email."))
}

pub async fn verify_otp(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(body): TrimmedJson<VerifyOtpRequest>,
) -> ApiResult {
    services.auth.verify_otp(&body.email, &body.otp).await?;
    Ok(errors::message(StatusCode::OK, "OTP has been verified successfully."))
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    TrimmedJson(body): TrimmedJson<ResetPasswordRequest>,
) -> ApiResult {
    services
        .auth
        .reset_password(&body.email, &body.new_password)
        .await?;
    Ok(errors::message(StatusCode::OK, "Password reset successfully."))
}

pub async fn list_users(Extension(services): Extension<Arc<AppServices>>) -> ApiResult {
    let users = services.auth.list_users().await?;
    if users.is_empty() {
        return Ok(errors::message(StatusCode::OK, "There is no any user register."));
    }
    Ok(errors::ok("Users fetched successfully.", users))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    let user = services.auth.get_user(id).await?;
    Ok(errors::ok("User fetched successfully.", user))
}

pub async fn manage_block(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CurrentUser>,
    RecordPath(id): RecordPath,
) -> ApiResult {
    let blocked = services.auth.toggle_block(id).await?;
    tracing::debug!(
        user = %id,
        blocked,
        by = %caller.id(),
        by_email = caller.email().unwrap_or_default(),
        "manage-block handled"
    );
    let message = if blocked {
        "User blocked successfully."
    } else {
        "User unblocked successfully."
    };
    Ok(errors::message(StatusCode::OK, message))
}
