//! View models built from catalog data: cards, hero banner, details popup.

use chrono::{Datelike, NaiveDate};
use cinestream_api::tmdb::{CatalogItem, MediaDetails, MediaType, backdrop_url, poster_url};
use cinestream_store::FavoriteEntry;
use rand::Rng;
use rand::seq::SliceRandom;

use super::text::Messages;

/// Shown when a year or rating is unknown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum hero description length in characters (before the ellipsis).
pub const HERO_DESCRIPTION_MAX_CHARS: usize = 200;

/// Extracts the year from a `YYYY-MM-DD` date.
#[must_use]
pub fn format_year(date: Option<&str>) -> String {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map_or_else(|| String::from(NOT_AVAILABLE), |d| d.year().to_string())
}

/// Formats a vote average with one decimal. Missing or zero reads as `N/A`.
#[must_use]
pub fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{v:.1}"),
        _ => String::from(NOT_AVAILABLE),
    }
}

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return String::from(text);
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// A rendered catalog card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// TMDB ID.
    pub id: u64,
    /// Media type.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Release year or `N/A`.
    pub year: String,
    /// Rating or `N/A`.
    pub rating: String,
    /// Relative poster path, kept for the favorites snapshot.
    pub poster_path: Option<String>,
    /// Full poster URL (placeholder when no path).
    pub poster_url: String,
    /// Heart state.
    pub is_favorite: bool,
}

impl Card {
    /// Builds a card for a catalog item; the heart is set when `stored`
    /// holds an entry for `(id, media_type)`.
    #[must_use]
    pub fn from_item(item: &CatalogItem, media_type: MediaType, stored: &[FavoriteEntry]) -> Self {
        Self {
            id: item.id,
            media_type,
            title: String::from(item.display_title(media_type)),
            year: format_year(item.date_for(media_type)),
            rating: format_rating(item.vote_average),
            poster_path: item.poster_path.clone(),
            poster_url: poster_url(item.poster_path.as_deref()),
            is_favorite: stored.iter().any(|e| e.matches(item.id, media_type)),
        }
    }

    /// Builds a card from a stored favorite (no date or rating is kept).
    #[must_use]
    pub fn from_favorite(entry: &FavoriteEntry) -> Self {
        Self {
            id: entry.id,
            media_type: entry.media_type,
            title: entry.title.clone(),
            year: String::from(NOT_AVAILABLE),
            rating: String::from(NOT_AVAILABLE),
            poster_path: entry.poster_path.clone(),
            poster_url: poster_url(entry.poster_path.as_deref()),
            is_favorite: true,
        }
    }

    /// Snapshot persisted when this card is added to favorites.
    #[must_use]
    pub fn to_favorite_entry(&self) -> FavoriteEntry {
        FavoriteEntry {
            id: self.id,
            media_type: self.media_type,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
        }
    }
}

/// The home page banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hero {
    /// TMDB ID used by the info trigger.
    pub id: u64,
    /// Media type used by the info trigger (always movie).
    pub media_type: MediaType,
    /// Title.
    pub title: String,
    /// Description, at most 200 characters plus ellipsis.
    pub description: String,
    /// Original-size backdrop URL.
    pub backdrop_url: Option<String>,
}

impl Hero {
    /// Builds the banner for a popular movie.
    #[must_use]
    pub fn from_movie(item: &CatalogItem, text: &Messages) -> Self {
        let description = item
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(text.hero_no_description);
        Self {
            id: item.id,
            media_type: MediaType::Movie,
            title: String::from(item.display_title(MediaType::Movie)),
            description: truncate_chars(description, HERO_DESCRIPTION_MAX_CHARS),
            backdrop_url: backdrop_url(item.backdrop_path.as_deref()),
        }
    }

    /// Picks one movie uniformly at random.
    pub fn choose<R: Rng + ?Sized>(
        movies: &[CatalogItem],
        rng: &mut R,
        text: &Messages,
    ) -> Option<Self> {
        movies.choose(rng).map(|item| Self::from_movie(item, text))
    }
}

/// Button focused inside the details popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalButton {
    /// Play (not implemented, shows an acknowledgement).
    Play,
    /// Close the popup.
    Close,
}

/// The details popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsModal {
    /// TMDB ID.
    pub id: u64,
    /// Media type.
    pub media_type: MediaType,
    /// `Title (Year)`.
    pub heading: String,
    /// `x.x/10` or `N/A/10`.
    pub rating: String,
    /// Overview or fallback.
    pub overview: String,
    /// Tagline, when present.
    pub tagline: Option<String>,
    /// Comma-separated genres, when present.
    pub genres: Option<String>,
    /// Runtime (movies) or season count (series), when present.
    pub extent: Option<String>,
    /// Original-size backdrop URL.
    pub backdrop_url: Option<String>,
    /// Focused button.
    pub focused: ModalButton,
}

impl DetailsModal {
    /// Builds the popup from a details response. Missing fields fall back.
    #[must_use]
    pub fn from_details(
        details: &MediaDetails,
        id: u64,
        media_type: MediaType,
        text: &Messages,
    ) -> Self {
        let title = details.display_title(media_type);
        let year = format_year(details.date_for(media_type));
        let overview = details
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(text.modal_no_overview);
        let genres = (!details.genres.is_empty()).then(|| {
            details
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });
        let extent = match media_type {
            MediaType::Movie => details.runtime.filter(|r| *r > 0).map(|r| format!("{r} min")),
            MediaType::Tv => details.number_of_seasons.map(|n| match n {
                1 => String::from("1 season"),
                n => format!("{n} seasons"),
            }),
        };

        Self {
            id,
            media_type,
            heading: format!("{title} ({year})"),
            rating: format!("{}/10", format_rating(details.vote_average)),
            overview: String::from(overview),
            tagline: details.tagline.clone().filter(|t| !t.is_empty()),
            genres,
            extent,
            backdrop_url: backdrop_url(details.backdrop_path.as_deref()),
            focused: ModalButton::Close,
        }
    }

    /// Moves focus to the other button.
    pub const fn toggle_focus(&mut self) {
        self.focused = match self.focused {
            ModalButton::Play => ModalButton::Close,
            ModalButton::Close => ModalButton::Play,
        };
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinestream_api::tmdb::{Genre, IMAGE_BASE_URL, PLACEHOLDER_IMAGE_URL};
    use cinestream_store::{FavoritesStore, MemoryKeyValueStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::tui::text::ENGLISH;

    fn store() -> FavoritesStore {
        FavoritesStore::new(Box::new(MemoryKeyValueStore::new()))
    }

    fn movie(id: u64, poster: Option<&str>) -> CatalogItem {
        CatalogItem {
            id,
            title: Some(format!("Movie {id}")),
            poster_path: poster.map(String::from),
            release_date: Some(String::from("1999-10-15")),
            vote_average: Some(8.433),
            ..CatalogItem::default()
        }
    }

    #[test]
    fn test_format_year() {
        // Arrange & Act & Assert
        assert_eq!(format_year(Some("2008-01-20")), "2008");
        assert_eq!(format_year(Some("")), "N/A");
        assert_eq!(format_year(None), "N/A");
    }

    #[test]
    fn test_format_rating() {
        // Arrange & Act & Assert
        assert_eq!(format_rating(Some(7.26)), "7.3");
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(Some(0.0)), "N/A");
        assert_eq!(format_rating(None), "N/A");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        // Arrange
        let text = "ñ".repeat(201);

        // Act
        let truncated = truncate_chars(&text, 200);

        // Assert
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_chars("short", 200), "short");
    }

    #[test]
    fn test_card_without_poster_uses_placeholder() {
        // Arrange
        let item = movie(1, None);

        // Act
        let card = Card::from_item(&item, MediaType::Movie, &[]);

        // Assert
        assert_eq!(card.poster_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_card_with_poster_uses_image_base_url() {
        // Arrange
        let item = movie(1, Some("/poster.jpg"));

        // Act
        let card = Card::from_item(&item, MediaType::Movie, &[]);

        // Assert
        assert_eq!(card.poster_url, format!("{IMAGE_BASE_URL}/poster.jpg"));
        assert_eq!(card.year, "1999");
        assert_eq!(card.rating, "8.4");
        assert!(!card.is_favorite);
    }

    #[test]
    fn test_card_heart_reflects_store() {
        // Arrange
        let mut favorites = store();
        let item = movie(7, None);
        favorites.add(Card::from_item(&item, MediaType::Movie, &[]).to_favorite_entry());
        let stored = favorites.list();

        // Act
        let card = Card::from_item(&item, MediaType::Movie, &stored);
        let as_series = Card::from_item(&item, MediaType::Tv, &stored);

        // Assert
        assert!(card.is_favorite);
        assert!(!as_series.is_favorite);
    }

    #[test]
    fn test_hero_truncates_long_overview() {
        // Arrange
        let item = CatalogItem {
            overview: Some("a".repeat(250)),
            backdrop_path: Some(String::from("/bd.jpg")),
            ..movie(3, None)
        };

        // Act
        let hero = Hero::from_movie(&item, &ENGLISH);

        // Assert
        assert_eq!(hero.description.chars().count(), 203);
        assert_eq!(
            hero.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/bd.jpg")
        );
        assert_eq!(hero.media_type, MediaType::Movie);
    }

    #[test]
    fn test_hero_empty_overview_falls_back() {
        // Arrange
        let item = CatalogItem {
            overview: Some(String::new()),
            ..movie(3, None)
        };

        // Act
        let hero = Hero::from_movie(&item, &ENGLISH);

        // Assert
        assert_eq!(hero.description, "Description not available");
    }

    #[test]
    fn test_hero_choose_picks_from_list() {
        // Arrange
        let movies: Vec<CatalogItem> = (1..=5).map(|id| movie(id, None)).collect();
        let mut rng = StdRng::seed_from_u64(7);

        // Act
        let hero = Hero::choose(&movies, &mut rng, &ENGLISH).unwrap();

        // Assert
        assert!((1..=5).contains(&hero.id));
        assert!(Hero::choose(&[], &mut rng, &ENGLISH).is_none());
    }

    #[test]
    fn test_modal_with_absent_fields_renders_fallbacks() {
        // Arrange
        let details = MediaDetails::default();

        // Act
        let modal = DetailsModal::from_details(&details, 550, MediaType::Movie, &ENGLISH);

        // Assert
        assert_eq!(modal.heading, " (N/A)");
        assert_eq!(modal.rating, "N/A/10");
        assert_eq!(modal.overview, "Description not available.");
        assert!(modal.genres.is_none());
        assert!(modal.extent.is_none());
    }

    #[test]
    fn test_modal_for_series() {
        // Arrange
        let details = MediaDetails {
            name: Some(String::from("Breaking Bad")),
            first_air_date: Some(String::from("2008-01-20")),
            vote_average: Some(8.9),
            number_of_seasons: Some(5),
            genres: vec![
                Genre {
                    id: 18,
                    name: String::from("Drama"),
                },
                Genre {
                    id: 80,
                    name: String::from("Crimen"),
                },
            ],
            ..MediaDetails::default()
        };

        // Act
        let modal = DetailsModal::from_details(&details, 1396, MediaType::Tv, &ENGLISH);

        // Assert
        assert_eq!(modal.heading, "Breaking Bad (2008)");
        assert_eq!(modal.rating, "8.9/10");
        assert_eq!(modal.genres.as_deref(), Some("Drama, Crimen"));
        assert_eq!(modal.extent.as_deref(), Some("5 seasons"));
    }

    #[test]
    fn test_modal_toggle_focus() {
        // Arrange
        let mut modal =
            DetailsModal::from_details(&MediaDetails::default(), 1, MediaType::Movie, &ENGLISH);

        // Act
        modal.toggle_focus();

        // Assert
        assert_eq!(modal.focused, ModalButton::Play);
    }
}
