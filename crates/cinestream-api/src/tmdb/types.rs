//! TMDB API response types.
//!
//! Every field except the numeric ID is optional: responses are used
//! as-is without schema enforcement.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Catalog media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A movie.
    Movie,
    /// A TV series.
    Tv,
}

impl MediaType {
    /// Returns the TMDB path segment / wire name (`movie` or `tv`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => bail!("unknown media type: {other} (expected movie or tv)"),
        }
    }
}

// --- Catalog lists ---

/// A movie or TV series record from a list or search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// TMDB ID.
    pub id: u64,
    /// Localized title (movies).
    #[serde(default)]
    pub title: Option<String>,
    /// Localized name (TV series).
    #[serde(default)]
    pub name: Option<String>,
    /// Poster image path (relative).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path (relative).
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (movies, YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date (TV series, YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl CatalogItem {
    /// Returns the display title for the given media type.
    ///
    /// Movies use `title`, series use `name`; the other field is the fallback.
    #[must_use]
    pub fn display_title(&self, media_type: MediaType) -> &str {
        pick_title(self.title.as_deref(), self.name.as_deref(), media_type)
    }

    /// Returns the release (movie) or first air (series) date.
    #[must_use]
    pub fn date_for(&self, media_type: MediaType) -> Option<&str> {
        match media_type {
            MediaType::Movie => self.release_date.as_deref(),
            MediaType::Tv => self.first_air_date.as_deref(),
        }
    }
}

/// Response from `movie/popular`, `tv/popular` and `movie/upcoming`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Result items.
    #[serde(default)]
    pub results: Vec<CatalogItem>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Multi search ---

/// Result kind reported by `search/multi`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// A movie.
    Movie,
    /// A TV series.
    Tv,
    /// A person (cast/crew).
    Person,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

/// A single `search/multi` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Result kind.
    #[serde(default)]
    pub media_type: ResultKind,
    /// Item fields.
    #[serde(flatten)]
    pub item: CatalogItem,
}

impl SearchResult {
    /// Returns the catalog media type, or `None` for people and unknown kinds.
    #[must_use]
    pub const fn catalog_media_type(&self) -> Option<MediaType> {
        match self.media_type {
            ResultKind::Movie => Some(MediaType::Movie),
            ResultKind::Tv => Some(MediaType::Tv),
            ResultKind::Person | ResultKind::Other => None,
        }
    }
}

/// Response from `search/multi`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Search results (all kinds).
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `movie/{id}` and `tv/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaDetails {
    /// TMDB ID.
    #[serde(default)]
    pub id: u64,
    /// Localized title (movies).
    #[serde(default)]
    pub title: Option<String>,
    /// Localized name (TV series).
    #[serde(default)]
    pub name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date (movies).
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date (TV series).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Runtime in minutes (movies).
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Number of seasons (TV series).
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
}

impl MediaDetails {
    /// Returns the display title for the given media type.
    #[must_use]
    pub fn display_title(&self, media_type: MediaType) -> &str {
        pick_title(self.title.as_deref(), self.name.as_deref(), media_type)
    }

    /// Returns the release (movie) or first air (series) date.
    #[must_use]
    pub fn date_for(&self, media_type: MediaType) -> Option<&str> {
        match media_type {
            MediaType::Movie => self.release_date.as_deref(),
            MediaType::Tv => self.first_air_date.as_deref(),
        }
    }
}

fn pick_title<'a>(title: Option<&'a str>, name: Option<&'a str>, media_type: MediaType) -> &'a str {
    let (primary, fallback) = match media_type {
        MediaType::Movie => (title, name),
        MediaType::Tv => (name, title),
    };
    primary.or(fallback).unwrap_or_default()
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_media_type_from_str() {
        // Arrange & Act & Assert
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        // Arrange & Act
        let json = serde_json::to_string(&MediaType::Tv).unwrap();

        // Assert
        assert_eq!(json, r#""tv""#);
    }

    #[test]
    fn test_catalog_item_minimal_json() {
        // Arrange
        let json = r#"{"id": 42}"#;

        // Act
        let item: CatalogItem = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(item.id, 42);
        assert!(item.poster_path.is_none());
        assert_eq!(item.display_title(MediaType::Movie), "");
    }

    #[test]
    fn test_display_title_prefers_field_for_media_type() {
        // Arrange
        let item = CatalogItem {
            id: 1,
            title: Some(String::from("Movie Title")),
            name: Some(String::from("Series Name")),
            ..CatalogItem::default()
        };

        // Act & Assert
        assert_eq!(item.display_title(MediaType::Movie), "Movie Title");
        assert_eq!(item.display_title(MediaType::Tv), "Series Name");
    }

    #[test]
    fn test_search_result_kinds() {
        // Arrange
        let json = r#"{"results": [
            {"id": 1, "media_type": "movie", "title": "A"},
            {"id": 2, "media_type": "tv", "name": "B"},
            {"id": 3, "media_type": "person", "name": "C"},
            {"id": 4, "media_type": "collection"}
        ]}"#;

        // Act
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        let kinds: Vec<Option<MediaType>> = response
            .results
            .iter()
            .map(SearchResult::catalog_media_type)
            .collect();
        assert_eq!(
            kinds,
            vec![Some(MediaType::Movie), Some(MediaType::Tv), None, None]
        );
        assert_eq!(response.results[3].media_type, ResultKind::Other);
        assert_eq!(response.results[1].item.display_title(MediaType::Tv), "B");
    }

    #[test]
    fn test_list_response_without_results_is_empty() {
        // Arrange & Act
        let response: ListResponse = serde_json::from_str("{}").unwrap();

        // Assert
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_details_tolerates_missing_fields() {
        // Arrange & Act
        let details: MediaDetails = serde_json::from_str(r#"{"id": 7}"#).unwrap();

        // Assert
        assert_eq!(details.display_title(MediaType::Tv), "");
        assert!(details.date_for(MediaType::Tv).is_none());
        assert!(details.genres.is_empty());
    }
}
