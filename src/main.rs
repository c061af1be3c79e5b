use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use movie_catalog_api::application::auth_service::AuthService;
use movie_catalog_api::application::catalog_service::CatalogService;
use movie_catalog_api::data::movie_repository::InMemoryMovieRepository;
use movie_catalog_api::data::seed::seed_catalog;
use movie_catalog_api::data::user_repository::InMemoryUserRepository;
use movie_catalog_api::domain::user::CreateUser;
use movie_catalog_api::infrastructure::config::AppConfig;
use movie_catalog_api::infrastructure::logging::init_logging;
use movie_catalog_api::presentation::auth::{login, register};
use movie_catalog_api::presentation::handlers::{
    AppState, create_movie, delete_movie, get_movie, health_check, list_movies, search_movies,
    sorted_movies, update_movie,
};
use movie_catalog_api::presentation::middleware::{JwtAuthMiddleware, RequestTraceMiddleware};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env();
    info!(bind_addr = %config.bind_addr, "Configuration loaded");

    let movie_repository = Arc::new(InMemoryMovieRepository::new());
    if config.seed_movies {
        // Seeding failures are logged but never stop the server
        match seed_catalog(movie_repository.as_ref()).await {
            Ok(count) => info!(count = count, "Catalog seeded"),
            Err(e) => error!(error = %e, "Failed to seed catalog"),
        }
    }

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let auth = Arc::new(AuthService::new(
        user_repository,
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    ));

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let bootstrap = CreateUser {
            name: "Administrator".to_string(),
            email: email.clone(),
            password: password.clone(),
        };
        match auth.register_admin(bootstrap).await {
            Ok((user, _)) => info!(user_id = %user.id, email = %user.email, "Admin account ready"),
            Err(e) => error!(error = %e, "Failed to bootstrap admin account"),
        }
    }

    let state = web::Data::new(AppState {
        catalog: CatalogService::new(movie_repository),
        auth,
    });

    let jwt_secret = config.jwt_secret.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(RequestTraceMiddleware)
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login)),
            )
            .service(
                // /search and /sorted are registered before /{id} so they are
                // not swallowed by the id route
                web::scope("/movies")
                    .route("", web::get().to(list_movies))
                    .route("", web::post().to(create_movie))
                    .route("/search", web::get().to(search_movies))
                    .route("/sorted", web::get().to(sorted_movies))
                    .route("/{id}", web::get().to(get_movie))
                    .route("/{id}", web::put().to(update_movie))
                    .route("/{id}", web::delete().to(delete_movie)),
            )
    });

    info!(address = %config.bind_addr, "Starting HTTP server");
    let server = server.bind(config.bind_addr.as_str())?;
    server.run().await
}
