use crate::domain::movie::Movie;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn save(&self, movie: Movie) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>>;
    async fn find_all(&self) -> Result<Vec<Movie>>;
    async fn update(&self, movie: Movie) -> Result<()>;
    /// Returns the removed movie, or `None` if the id was unknown.
    async fn delete(&self, id: &str) -> Result<Option<Movie>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
