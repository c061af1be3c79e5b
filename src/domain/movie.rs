use crate::domain::error::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_rating(rating: Option<f64>) -> Result<(), DomainError> {
    if let Some(r) = rating {
        if !r.is_finite() || !(0.0..=10.0).contains(&r) {
            return Err(DomainError::Validation(
                "Rating must be between 0 and 10".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_duration(duration: Option<u32>) -> Result<(), DomainError> {
    if duration == Some(0) {
        return Err(DomainError::Validation(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
}

impl CreateMovie {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        validate_rating(self.rating)?;
        validate_duration(self.duration)?;
        Ok(())
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
}

impl UpdateMovie {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Title cannot be empty".to_string()));
            }
        }
        validate_rating(self.rating)?;
        validate_duration(self.duration)?;
        Ok(())
    }
}

/// Allow-listed sort fields for the sorted listing. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Rating,
    ReleaseDate,
    Duration,
}

impl std::str::FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "rating" => Ok(SortField::Rating),
            "releaseDate" => Ok(SortField::ReleaseDate),
            "duration" => Ok(SortField::Duration),
            other => Err(DomainError::Validation(format!(
                "Invalid sort field: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than an explicit "desc" sorts ascending.
    pub fn from_query(order: Option<&str>) -> Self {
        match order {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}
