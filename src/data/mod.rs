pub mod movie_repository;
pub mod seed;
pub mod user_repository;
