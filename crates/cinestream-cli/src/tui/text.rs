//! Placeholder and acknowledgement text, picked by response language.

/// User-facing messages for one display language.
#[derive(Debug, PartialEq, Eq)]
pub struct Messages {
    /// Placeholder while a section loads.
    pub loading: &'static str,
    /// Home sections after any list query failed.
    pub home_error: &'static str,
    /// Home section with an empty list.
    pub empty_section: &'static str,
    /// Search query below the minimum length.
    pub search_prompt: &'static str,
    /// Search request in flight.
    pub searching: &'static str,
    /// Search returned nothing at all.
    pub no_results: &'static str,
    /// Search returned only people or other kinds.
    pub no_media_results: &'static str,
    /// Search request failed.
    pub search_error: &'static str,
    /// Favorites page with nothing stored.
    pub no_favorites: &'static str,
    /// Acknowledgement for the play control.
    pub playback: &'static str,
    /// Acknowledgement for a failed details fetch.
    pub details_error: &'static str,
    /// Hero banner without an overview.
    pub hero_no_description: &'static str,
    /// Details popup without an overview.
    pub modal_no_overview: &'static str,
}

/// English text, used for every language without its own table.
pub const ENGLISH: Messages = Messages {
    loading: "Loading...",
    home_error: "Error loading data",
    empty_section: "No content available",
    search_prompt: "Enter at least 3 characters to search",
    searching: "Searching...",
    no_results: "No results found",
    no_media_results: "No movies or series found",
    search_error: "Search error",
    no_favorites: "You have no favorites yet",
    playback: "Playback not implemented yet.",
    details_error: "Error loading details",
    hero_no_description: "Description not available",
    modal_no_overview: "Description not available.",
};

/// Spanish text.
pub const SPANISH: Messages = Messages {
    loading: "Cargando...",
    home_error: "Error al cargar los datos",
    empty_section: "No hay contenido disponible",
    search_prompt: "Ingresa al menos 3 caracteres para buscar",
    searching: "Buscando...",
    no_results: "No se encontraron resultados",
    no_media_results: "No se encontraron películas o series",
    search_error: "Error en la búsqueda",
    no_favorites: "No tienes favoritos aún",
    playback: "Reproducción no implementada aún.",
    details_error: "Error al cargar los detalles",
    hero_no_description: "Descripción no disponible",
    modal_no_overview: "Descripción no disponible.",
};

/// Returns the messages for a TMDB language tag such as `es-ES`.
///
/// Only the primary subtag is considered.
#[must_use]
pub fn for_language(language: &str) -> &'static Messages {
    let primary = language.split(['-', '_']).next().unwrap_or_default();
    if primary.eq_ignore_ascii_case("es") {
        &SPANISH
    } else {
        &ENGLISH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_language_uses_primary_subtag() {
        // Arrange & Act & Assert
        assert_eq!(for_language("es-ES"), &SPANISH);
        assert_eq!(for_language("es-MX"), &SPANISH);
        assert_eq!(for_language("ES"), &SPANISH);
        assert_eq!(for_language("en-US"), &ENGLISH);
        assert_eq!(for_language("fr-FR"), &ENGLISH);
        assert_eq!(for_language(""), &ENGLISH);
    }
}
