use crate::domain::movie::Movie;
use crate::domain::repository::MovieRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryMovieRepository {
    storage: Arc<RwLock<HashMap<String, Movie>>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryMovieRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id, title = %movie.title))]
    async fn save(&self, movie: Movie) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(movie.id.clone(), movie.clone());
        debug!(movie_id = %movie.id, title = %movie.title, "Movie saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = id))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>> {
        let storage = self.storage.read().await;
        let movie = storage.get(id).cloned();
        match &movie {
            Some(m) => debug!(movie_id = %m.id, title = %m.title, "Movie found in storage"),
            None => trace!(movie_id = id, "Movie not found in storage"),
        }
        Ok(movie)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Movie>> {
        let storage = self.storage.read().await;
        let movies: Vec<Movie> = storage.values().cloned().collect();
        trace!(count = movies.len(), "Fetched all movies from storage");
        Ok(movies)
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id))]
    async fn update(&self, movie: Movie) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(movie.id.clone(), movie.clone());
        debug!(movie_id = %movie.id, title = %movie.title, "Movie updated in memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = id))]
    async fn delete(&self, id: &str) -> Result<Option<Movie>> {
        let mut storage = self.storage.write().await;
        let removed = storage.remove(id);
        match &removed {
            Some(m) => debug!(movie_id = %m.id, title = %m.title, "Movie removed from storage"),
            None => trace!(movie_id = id, "Delete of unknown movie id"),
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movie(id: &str, title: &str) -> Movie {
        let now = Utc::now();
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            rating: None,
            release_date: None,
            duration: None,
            poster: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryMovieRepository::new();
        repo.save(movie("m-1", "Heat")).await.unwrap();

        let found = repo.find_by_id("m-1").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().title, "Heat");
    }

    #[tokio::test]
    async fn test_find_by_id_returns_none_for_unknown_id() {
        let repo = InMemoryMovieRepository::new();
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_returns_every_movie() {
        let repo = InMemoryMovieRepository::new();
        for i in 0..5 {
            repo.save(movie(&format!("m-{}", i), &format!("Movie {}", i)))
                .await
                .unwrap();
        }

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_update_replaces_existing_movie() {
        let repo = InMemoryMovieRepository::new();
        repo.save(movie("m-1", "Heat")).await.unwrap();

        let mut updated = movie("m-1", "Heat (Director's Cut)");
        updated.duration = Some(188);
        repo.update(updated).await.unwrap();

        let found = repo.find_by_id("m-1").await.unwrap().unwrap();
        assert_eq!(found.title, "Heat (Director's Cut)");
        assert_eq!(found.duration, Some(188));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_movie() {
        let repo = InMemoryMovieRepository::new();
        repo.save(movie("m-1", "Heat")).await.unwrap();

        let removed = repo.delete("m-1").await.unwrap();
        assert!(removed.is_some());
        assert_eq!(removed.unwrap().title, "Heat");

        // Second delete of the same id finds nothing
        let removed = repo.delete("m-1").await.unwrap();
        assert!(removed.is_none());
        assert!(repo.find_by_id("m-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_writes() {
        let repo = InMemoryMovieRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                tokio::spawn(async move {
                    repo_clone
                        .save(movie(&format!("m-{}", i), &format!("Movie {}", i)))
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(repo.find_all().await.unwrap().len(), 10);
    }
}
