use crate::domain::user::{CreateUser, LoginRequest, UserProfile};
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Registration request received");

    let (user, token) = state.auth.register(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to register user");
        ApiError::from(e)
    })?;

    let response = AuthResponse {
        token,
        user: UserProfile::from(&user),
    };

    info!(user_id = %response.user.id, email = %response.user.email, "User registered");
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Login request received");

    let (user, token) = state.auth.login(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to login");
        ApiError::from(e)
    })?;

    let response = AuthResponse {
        token,
        user: UserProfile::from(&user),
    };

    info!(user_id = %response.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(response))
}
