pub mod error;
pub mod movie;
pub mod repository;
pub mod user;
