use crate::application::auth_service::AuthService;
use crate::application::catalog_service::CatalogService;
use crate::data::movie_repository::InMemoryMovieRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::movie::{CreateMovie, Movie, SortField, SortOrder, UpdateMovie};
use crate::domain::user::Role;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub catalog: CatalogService<InMemoryMovieRepository>,
    pub auth: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::DuplicateAccount(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => actix_web::http::StatusCode::FORBIDDEN,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        let details = match self {
            ApiError::Validation(msg) => serde_json::json!({ "message": msg }),
            ApiError::NotFound(msg) => serde_json::json!({ "message": msg }),
            ApiError::InvalidCredentials => {
                serde_json::json!({ "message": "Invalid email or password" })
            }
            ApiError::DuplicateAccount(email) => serde_json::json!({ "email": email }),
            ApiError::Unauthorized(msg) => serde_json::json!({ "message": msg }),
            ApiError::Forbidden(msg) => serde_json::json!({ "message": msg }),
            ApiError::Internal(msg) => serde_json::json!({ "message": msg }),
        };

        // Log error based on severity
        match self {
            ApiError::Internal(_) => {
                error!(error = %error_msg, status = %status, "Internal error")
            }
            _ => warn!(error = %error_msg, status = %status, "Request rejected"),
        }

        let error_response = ErrorResponse {
            error: error_msg,
            details,
        };

        HttpResponse::build(status).json(error_response)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCredentials => ApiError::InvalidCredentials,
            DomainError::DuplicateAccount(email) => ApiError::DuplicateAccount(email),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain_err) => domain_err.into(),
            Err(other) => ApiError::Internal(other.to_string()),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
        })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

const DEFAULT_PAGE_LIMIT: usize = 10;

/// Without query parameters the full catalog is returned as a plain array;
/// any pagination parameter switches to the paged envelope.
#[instrument(skip(state))]
pub async fn list_movies(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    if query.page.is_none() && query.limit.is_none() {
        let movies = state.catalog.list_movies().await?;
        info!(count = movies.len(), "Movie listing returned");
        return Ok(HttpResponse::Ok().json(movies));
    }

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let page = state.catalog.list_page(page, limit).await?;
    info!(
        page = page.page,
        total = page.total,
        "Paged movie listing returned"
    );
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(state), fields(movie_id = %*path))]
pub async fn get_movie(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let movie = state.catalog.get_movie(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(movie))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[instrument(skip(state))]
pub async fn search_movies(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let q = query
        .q
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Search query is required".to_string()))?;

    let movies = state.catalog.search_movies(q).await?;
    info!(query = q, matches = movies.len(), "Search completed");
    Ok(HttpResponse::Ok().json(movies))
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub by: Option<String>,
    pub order: Option<String>,
}

#[instrument(skip(state))]
pub async fn sorted_movies(
    state: web::Data<AppState>,
    query: web::Query<SortQuery>,
) -> Result<HttpResponse, ApiError> {
    let by = query
        .by
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Sort field is required".to_string()))?;
    let field: SortField = by.parse().map_err(ApiError::from)?;
    let order = SortOrder::from_query(query.order.as_deref());

    let movies = state.catalog.sorted_movies(field, order).await?;
    Ok(HttpResponse::Ok().json(movies))
}

#[instrument(skip(state, req, user), fields(user_id = %user.id))]
pub async fn create_movie(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateMovie>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Admin)?;

    let movie = state.catalog.create_movie(req.into_inner()).await?;
    info!(movie_id = %movie.id, title = %movie.title, "Movie created via API");
    Ok(HttpResponse::Created().json(movie))
}

#[instrument(skip(state, req, user), fields(user_id = %user.id, movie_id = %*path))]
pub async fn update_movie(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateMovie>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Admin)?;

    let movie = state
        .catalog
        .update_movie(&path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(movie))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
    movie: Movie,
}

#[instrument(skip(state, user), fields(user_id = %user.id, movie_id = %*path))]
pub async fn delete_movie(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Role::Admin)?;

    let movie = state.catalog.delete_movie(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Movie deleted successfully".to_string(),
        movie,
    }))
}
