use crate::domain::error::DomainError;
use crate::domain::movie::{CreateMovie, Movie, MoviePage, SortField, SortOrder, UpdateMovie};
use crate::domain::repository::MovieRepository;
use anyhow::Result;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub struct CatalogService<R: MovieRepository> {
    repository: Arc<R>,
}

impl<R: MovieRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req), fields(title = %req.title))]
    pub async fn create_movie(&self, req: CreateMovie) -> Result<Movie> {
        req.validate()?;

        let now = Utc::now();
        let movie = Movie {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            rating: req.rating,
            release_date: req.release_date,
            duration: req.duration,
            poster: req.poster,
            created_at: now,
            updated_at: now,
        };

        self.repository.save(movie.clone()).await?;
        info!(movie_id = %movie.id, title = %movie.title, "Movie created");
        Ok(movie)
    }

    #[instrument(skip(self), fields(movie_id = id))]
    pub async fn get_movie(&self, id: &str) -> Result<Movie> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Movie not found".to_string()).into())
    }

    /// Full listing in a deterministic order (insertion time, then id).
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let mut movies = self.repository.find_all().await?;
        movies.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(movies)
    }

    #[instrument(skip(self))]
    pub async fn list_page(&self, page: usize, limit: usize) -> Result<MoviePage> {
        if page < 1 {
            return Err(DomainError::Validation("Page must be at least 1".to_string()).into());
        }
        if limit < 1 {
            return Err(DomainError::Validation("Limit must be at least 1".to_string()).into());
        }

        // Guards against overflow on attacker-supplied page numbers
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| DomainError::Validation("Page is out of range".to_string()))?;

        let all = self.list_movies().await?;
        let total = all.len();
        let total_pages = total.div_ceil(limit);
        let movies: Vec<Movie> = all.into_iter().skip(offset).take(limit).collect();

        debug!(page = page, limit = limit, total = total, "Paged movie listing");
        Ok(MoviePage {
            movies,
            total,
            page,
            total_pages,
        })
    }

    /// Case-insensitive substring match over title and description.
    #[instrument(skip(self))]
    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(DomainError::Validation("Search query is required".to_string()).into());
        }

        let needle = query.to_lowercase();
        let movies: Vec<Movie> = self
            .list_movies()
            .await?
            .into_iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect();

        debug!(query = query, matches = movies.len(), "Movie search completed");
        Ok(movies)
    }

    /// Stable sort by an allow-listed field. Records missing the field order
    /// first ascending.
    #[instrument(skip(self))]
    pub async fn sorted_movies(&self, field: SortField, order: SortOrder) -> Result<Vec<Movie>> {
        let mut movies = self.list_movies().await?;
        movies.sort_by(|a, b| {
            let ord = compare_by_field(a, b, field);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Ok(movies)
    }

    #[instrument(skip(self, req), fields(movie_id = id))]
    pub async fn update_movie(&self, id: &str, req: UpdateMovie) -> Result<Movie> {
        req.validate()?;

        let mut movie = self.get_movie(id).await?;
        if let Some(title) = req.title {
            movie.title = title;
        }
        if let Some(description) = req.description {
            movie.description = Some(description);
        }
        if let Some(rating) = req.rating {
            movie.rating = Some(rating);
        }
        if let Some(release_date) = req.release_date {
            movie.release_date = Some(release_date);
        }
        if let Some(duration) = req.duration {
            movie.duration = Some(duration);
        }
        if let Some(poster) = req.poster {
            movie.poster = Some(poster);
        }
        movie.updated_at = Utc::now();

        self.repository.update(movie.clone()).await?;
        info!(movie_id = %movie.id, title = %movie.title, "Movie updated");
        Ok(movie)
    }

    #[instrument(skip(self), fields(movie_id = id))]
    pub async fn delete_movie(&self, id: &str) -> Result<Movie> {
        let removed = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Movie not found".to_string()))?;
        info!(movie_id = %removed.id, title = %removed.title, "Movie deleted");
        Ok(removed)
    }
}

fn compare_by_field(a: &Movie, b: &Movie, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Rating => compare_optional_f64(a.rating, b.rating),
        SortField::ReleaseDate => a.release_date.cmp(&b.release_date),
        SortField::Duration => a.duration.cmp(&b.duration),
    }
}

fn compare_optional_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}
