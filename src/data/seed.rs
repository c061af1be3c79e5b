use crate::domain::movie::Movie;
use crate::domain::repository::MovieRepository;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

struct SeedMovie {
    title: &'static str,
    description: &'static str,
    rating: f64,
    release_date: Option<NaiveDate>,
    duration: u32,
}

fn catalog() -> Vec<SeedMovie> {
    vec![
        SeedMovie {
            title: "The Shawshank Redemption",
            description: "Two imprisoned men bond over a number of years.",
            rating: 9.3,
            release_date: NaiveDate::from_ymd_opt(1994, 9, 23),
            duration: 142,
        },
        SeedMovie {
            title: "Inception",
            description: "A thief who steals corporate secrets through dream-sharing technology.",
            rating: 8.8,
            release_date: NaiveDate::from_ymd_opt(2010, 7, 16),
            duration: 148,
        },
        SeedMovie {
            title: "The Matrix",
            description: "A computer hacker learns about the true nature of reality.",
            rating: 8.7,
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
            duration: 136,
        },
        SeedMovie {
            title: "Spirited Away",
            description: "A young girl wanders into a world ruled by spirits.",
            rating: 8.6,
            release_date: NaiveDate::from_ymd_opt(2001, 7, 20),
            duration: 125,
        },
        SeedMovie {
            title: "Parasite",
            description: "Greed and class discrimination threaten a symbiotic relationship.",
            rating: 8.5,
            release_date: NaiveDate::from_ymd_opt(2019, 5, 30),
            duration: 132,
        },
        SeedMovie {
            title: "Heat",
            description: "A group of professional bank robbers are tracked by an obsessive detective.",
            rating: 8.3,
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15),
            duration: 170,
        },
        SeedMovie {
            title: "Mad Max: Fury Road",
            description: "A woman rebels against a tyrannical ruler in a post-apocalyptic wasteland.",
            rating: 8.1,
            release_date: NaiveDate::from_ymd_opt(2015, 5, 15),
            duration: 120,
        },
        SeedMovie {
            title: "Paddington 2",
            description: "Paddington picks up a series of odd jobs to buy the perfect present.",
            rating: 7.8,
            release_date: NaiveDate::from_ymd_opt(2017, 11, 10),
            duration: 103,
        },
    ]
}

/// Loads the sample catalog into an empty store at startup.
#[instrument(skip(repository))]
pub async fn seed_catalog<R: MovieRepository>(repository: &R) -> Result<usize> {
    let entries = catalog();
    let count = entries.len();
    let now = Utc::now();

    for entry in entries {
        let movie = Movie {
            id: Uuid::new_v4().to_string(),
            title: entry.title.to_string(),
            description: Some(entry.description.to_string()),
            rating: Some(entry.rating),
            release_date: entry.release_date,
            duration: Some(entry.duration),
            poster: None,
            created_at: now,
            updated_at: now,
        };
        repository.save(movie).await?;
    }

    info!(count = count, "Seeded sample movie catalog");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::movie_repository::InMemoryMovieRepository;

    #[tokio::test]
    async fn test_seed_catalog_populates_storage() {
        let repo = InMemoryMovieRepository::new();
        let count = seed_catalog(&repo).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), count);
        assert!(all.iter().any(|m| m.title == "The Matrix"));
    }

    #[test]
    fn test_seed_entries_respect_catalog_invariants() {
        for entry in catalog() {
            assert!(!entry.title.trim().is_empty());
            assert!((0.0..=10.0).contains(&entry.rating));
            assert!(entry.duration > 0);
            assert!(entry.release_date.is_some());
        }
    }
}
