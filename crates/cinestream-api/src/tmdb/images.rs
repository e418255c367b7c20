//! TMDB image URL helpers.

/// Base URL for standard-size (w500) images.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base URL for original-size images (used for backdrops).
pub const ORIGINAL_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Placeholder shown when an item has no poster.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/300x450/2c2c2c/ffffff?text=No+Image";

/// Builds the poster URL for a relative path, falling back to the placeholder.
#[must_use]
pub fn poster_url(path: Option<&str>) -> String {
    path.filter(|p| !p.is_empty()).map_or_else(
        || String::from(PLACEHOLDER_IMAGE_URL),
        |p| format!("{IMAGE_BASE_URL}{p}"),
    )
}

/// Builds the original-size backdrop URL for a relative path.
#[must_use]
pub fn backdrop_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{ORIGINAL_IMAGE_BASE_URL}{p}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_with_path() {
        // Arrange & Act
        let url = poster_url(Some("/abc.jpg"));

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc.jpg");
    }

    #[test]
    fn test_poster_url_without_path_uses_placeholder() {
        // Arrange & Act & Assert
        assert_eq!(poster_url(None), PLACEHOLDER_IMAGE_URL);
        assert_eq!(poster_url(Some("")), PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_backdrop_url() {
        // Arrange & Act & Assert
        assert_eq!(
            backdrop_url(Some("/bd.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/original/bd.jpg")
        );
        assert!(backdrop_url(None).is_none());
    }
}
