//! Page state: sections, cursor, popups and scroll.

use cinestream_api::tmdb::MediaType;
use ratatui::layout::Rect;

use super::card::{Card, DetailsModal, Hero};
use super::search::SearchState;
use super::text::Messages;

/// Rows the content must be scrolled past before the navbar switches style.
pub const NAVBAR_SCROLL_THRESHOLD: u16 = 3;

/// Maximum cards shown per home section.
pub const HOME_SECTION_LIMIT: usize = 12;


/// Top-level page. Identity is fixed for the lifetime of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Hero plus three catalog sections.
    Home,
    /// Search box plus results.
    Search,
    /// Stored favorites.
    Favorites,
}

impl Page {
    /// Navbar order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Search, Self::Favorites];

    /// Navbar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Search => "Search",
            Self::Favorites => "Favorites",
        }
    }

    /// Sections that exist on this page, in display order.
    #[must_use]
    pub const fn sections(self) -> &'static [SectionId] {
        match self {
            Self::Home => &[
                SectionId::PopularMovies,
                SectionId::PopularSeries,
                SectionId::UpcomingMovies,
            ],
            Self::Search => &[SectionId::SearchResults],
            Self::Favorites => &[SectionId::Favorites],
        }
    }
}

/// Identifies a card container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    /// Home: popular movies.
    PopularMovies,
    /// Home: popular series.
    PopularSeries,
    /// Home: upcoming movies.
    UpcomingMovies,
    /// Search results.
    SearchResults,
    /// Favorites grid.
    Favorites,
}

impl SectionId {
    /// Section heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PopularMovies => "Popular Movies",
            Self::PopularSeries => "Popular Series",
            Self::UpcomingMovies => "Coming Soon",
            Self::SearchResults => "Results",
            Self::Favorites => "My Favorites",
        }
    }
}

/// What a section currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Fetch in flight.
    Loading(String),
    /// Fetch failed.
    Error(String),
    /// Informational message (empty list, prompt).
    Notice(String),
    /// Rendered cards.
    Cards(Vec<Card>),
}

impl SectionContent {
    /// Cards in this section (empty unless `Cards`).
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Cards(cards) => cards,
            Self::Loading(_) | Self::Error(_) | Self::Notice(_) => &[],
        }
    }
}

/// A card container on the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Which container.
    pub id: SectionId,
    /// What it shows.
    pub content: SectionContent,
}

/// Focusable element under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The home hero banner.
    Hero,
    /// A card: section position and card position within it.
    Card {
        /// Index into `AppState::sections`.
        section: usize,
        /// Index into the section's cards.
        index: usize,
    },
}

/// Screen regions of the details popup from the last draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalHitAreas {
    /// Whole popup; clicks outside it hit the backdrop.
    pub popup: Rect,
    /// The Play button.
    pub play: Rect,
    /// The Close button.
    pub close: Rect,
}

/// Everything the renderer needs for the current page.
#[derive(Debug)]
pub struct AppState {
    /// Current page.
    pub page: Page,
    /// Home banner, once loaded.
    pub hero: Option<Hero>,
    /// Sections that exist on this page.
    pub sections: Vec<Section>,
    /// Position in the flat focus order.
    pub cursor: usize,
    /// Search box (search page only).
    pub search: Option<SearchState>,
    /// Details popup (at most one).
    pub modal: Option<DetailsModal>,
    /// Blocking acknowledgement.
    pub alert: Option<String>,
    /// Content scroll offset in rows.
    pub scroll_offset: u16,
    /// Popup regions from the last draw, for mouse hits.
    pub modal_hits: Option<ModalHitAreas>,
}

impl AppState {
    /// Fresh state for `page`, discarding everything from any previous page.
    #[must_use]
    pub fn for_page(page: Page, text: &Messages) -> Self {
        let initial = match page {
            Page::Home => SectionContent::Loading(String::from(text.loading)),
            Page::Search | Page::Favorites => SectionContent::Notice(String::new()),
        };
        let sections = page
            .sections()
            .iter()
            .map(|&id| Section {
                id,
                content: initial.clone(),
            })
            .collect();
        Self {
            page,
            hero: None,
            sections,
            cursor: 0,
            search: (page == Page::Search).then(SearchState::new),
            modal: None,
            alert: None,
            scroll_offset: 0,
            modal_hits: None,
        }
    }

    /// Returns the section with `id`, if it exists on this page.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Replaces a section's content. No-op when the section is absent.
    pub fn set_section(&mut self, id: SectionId, content: SectionContent) {
        let Some(section) = self.sections.iter_mut().find(|s| s.id == id) else {
            tracing::debug!(?id, page = ?self.page, "Section not on page, skipping update");
            return;
        };
        section.content = content;
        self.clamp_cursor();
    }

    /// Flat focus order: hero first (if any), then every card by section.
    #[must_use]
    pub fn focus_order(&self) -> Vec<Focus> {
        let hero = self.hero.iter().map(|_| Focus::Hero);
        let cards = self.sections.iter().enumerate().flat_map(|(section, s)| {
            (0..s.content.cards().len()).map(move |index| Focus::Card { section, index })
        });
        hero.chain(cards).collect()
    }

    /// Element under the cursor.
    #[must_use]
    pub fn focused(&self) -> Option<Focus> {
        self.focus_order().get(self.cursor).copied()
    }

    /// Card under the cursor.
    #[must_use]
    pub fn focused_card(&self) -> Option<&Card> {
        match self.focused()? {
            Focus::Hero => None,
            Focus::Card { section, index } => {
                self.sections.get(section)?.content.cards().get(index)
            }
        }
    }

    /// `(id, media_type)` of the focused card or hero.
    #[must_use]
    pub fn focused_target(&self) -> Option<(u64, MediaType)> {
        match self.focused()? {
            Focus::Hero => self.hero.as_ref().map(|h| (h.id, h.media_type)),
            Focus::Card { .. } => self.focused_card().map(|c| (c.id, c.media_type)),
        }
    }

    /// URL the `o` key opens: the focused poster or the hero backdrop.
    #[must_use]
    pub fn focused_image_url(&self) -> Option<String> {
        match self.focused()? {
            Focus::Hero => self.hero.as_ref().and_then(|h| h.backdrop_url.clone()),
            Focus::Card { .. } => self.focused_card().map(|c| c.poster_url.clone()),
        }
    }

    /// Moves the cursor to the previous element.
    pub const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor to the next element.
    pub fn move_down(&mut self) {
        if self.cursor.saturating_add(1) < self.focus_order().len() {
            self.cursor = self.cursor.saturating_add(1);
        }
    }

    /// Jumps to the first element of the next section.
    pub fn next_section(&mut self) {
        let order = self.focus_order();
        let current = order.get(self.cursor).copied();
        if let Some(pos) = order
            .iter()
            .enumerate()
            .skip(self.cursor.saturating_add(1))
            .find(|(_, f)| section_of(**f) != current.and_then(section_of))
            .map(|(pos, _)| pos)
        {
            self.cursor = pos;
        }
    }

    /// Jumps to the first element of the current section, or of the
    /// previous one when already there.
    pub fn prev_section(&mut self) {
        let order = self.focus_order();
        let Some(current) = order.get(self.cursor).copied() else {
            return;
        };
        let start_of = |pos: usize| {
            let group = order.get(pos).copied().and_then(section_of);
            order
                .iter()
                .take(pos)
                .rposition(|f| section_of(*f) != group)
                .map_or(0, |p| p.saturating_add(1))
        };
        let start = start_of(self.cursor);
        self.cursor = if start < self.cursor || self.cursor == 0 {
            start
        } else if section_of(current).is_none() {
            0
        } else {
            start_of(start.saturating_sub(1))
        };
    }

    /// Sets the heart on every card for `(id, media_type)` on this page.
    pub fn set_favorite_flag(&mut self, id: u64, media_type: MediaType, is_favorite: bool) {
        for section in &mut self.sections {
            if let SectionContent::Cards(cards) = &mut section.content {
                for card in cards
                    .iter_mut()
                    .filter(|c| c.id == id && c.media_type == media_type)
                {
                    card.is_favorite = is_favorite;
                }
            }
        }
    }

    /// Returns `true` while the navbar uses its scrolled style.
    #[must_use]
    pub const fn navbar_scrolled(&self) -> bool {
        self.scroll_offset > NAVBAR_SCROLL_THRESHOLD
    }

    /// Returns `true` when a popup or acknowledgement blocks the page.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.modal.is_some() || self.alert.is_some()
    }

    /// Keeps the cursor inside the focus order after content changes.
    fn clamp_cursor(&mut self) {
        let len = self.focus_order().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}

/// Section index of a focus element (`None` for the hero).
const fn section_of(focus: Focus) -> Option<usize> {
    match focus {
        Focus::Hero => None,
        Focus::Card { section, .. } => Some(section),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;
    use crate::tui::text::ENGLISH;

    fn card(id: u64, media_type: MediaType) -> Card {
        Card {
            id,
            media_type,
            title: format!("Title {id}"),
            year: String::from("2020"),
            rating: String::from("7.0"),
            poster_path: None,
            poster_url: format!("https://example.test/{id}.jpg"),
            is_favorite: false,
        }
    }

    fn hero() -> Hero {
        Hero {
            id: 99,
            media_type: MediaType::Movie,
            title: String::from("Hero"),
            description: String::from("desc"),
            backdrop_url: Some(String::from("https://example.test/bd.jpg")),
        }
    }

    /// Home with hero, 2 movies, 1 series, 2 upcoming.
    fn loaded_home() -> AppState {
        let mut state = AppState::for_page(Page::Home, &ENGLISH);
        state.hero = Some(hero());
        state.set_section(
            SectionId::PopularMovies,
            SectionContent::Cards(vec![card(1, MediaType::Movie), card(2, MediaType::Movie)]),
        );
        state.set_section(
            SectionId::PopularSeries,
            SectionContent::Cards(vec![card(1, MediaType::Tv)]),
        );
        state.set_section(
            SectionId::UpcomingMovies,
            SectionContent::Cards(vec![card(1, MediaType::Movie), card(3, MediaType::Movie)]),
        );
        state
    }

    #[test]
    fn test_home_starts_loading() {
        // Arrange & Act
        let state = AppState::for_page(Page::Home, &ENGLISH);

        // Assert
        assert_eq!(state.sections.len(), 3);
        assert!(
            state
                .sections
                .iter()
                .all(|s| s.content == SectionContent::Loading(String::from(ENGLISH.loading)))
        );
        assert!(state.search.is_none());
    }

    #[test]
    fn test_search_page_has_input() {
        // Arrange & Act
        let state = AppState::for_page(Page::Search, &ENGLISH);

        // Assert
        assert!(state.search.is_some());
        assert!(state.section(SectionId::SearchResults).is_some());
    }

    #[test]
    fn test_set_absent_section_is_noop() {
        // Arrange
        let mut state = AppState::for_page(Page::Favorites, &ENGLISH);

        // Act
        state.set_section(
            SectionId::PopularMovies,
            SectionContent::Cards(vec![card(1, MediaType::Movie)]),
        );

        // Assert
        assert!(state.section(SectionId::PopularMovies).is_none());
        assert_eq!(state.sections.len(), 1);
        assert!(state.focus_order().is_empty());
    }

    #[test]
    fn test_focus_order_starts_with_hero() {
        // Arrange
        let state = loaded_home();

        // Act
        let order = state.focus_order();

        // Assert
        assert_eq!(order.len(), 6);
        assert_eq!(order[0], Focus::Hero);
        assert_eq!(order[1], Focus::Card { section: 0, index: 0 });
        assert_eq!(state.focused_target(), Some((99, MediaType::Movie)));
    }

    #[test]
    fn test_move_down_stops_at_end() {
        // Arrange
        let mut state = loaded_home();

        // Act
        for _ in 0..10 {
            state.move_down();
        }

        // Assert
        assert_eq!(state.cursor, 5);
        assert_eq!(state.focused_target(), Some((3, MediaType::Movie)));
    }

    #[test]
    fn test_section_jumps() {
        // Arrange
        let mut state = loaded_home();

        // Act & Assert
        state.next_section();
        assert_eq!(state.focused(), Some(Focus::Card { section: 0, index: 0 }));
        state.next_section();
        assert_eq!(state.focused(), Some(Focus::Card { section: 1, index: 0 }));
        state.move_down();
        state.move_down();
        assert_eq!(state.focused(), Some(Focus::Card { section: 2, index: 1 }));
        state.prev_section();
        assert_eq!(state.focused(), Some(Focus::Card { section: 2, index: 0 }));
        state.prev_section();
        assert_eq!(state.focused(), Some(Focus::Card { section: 1, index: 0 }));
        state.prev_section();
        assert_eq!(state.focused(), Some(Focus::Card { section: 0, index: 0 }));
        state.prev_section();
        assert_eq!(state.focused(), Some(Focus::Hero));
    }

    #[test]
    fn test_set_favorite_flag_updates_matching_cards_only() {
        // Arrange
        let mut state = loaded_home();

        // Act
        state.set_favorite_flag(1, MediaType::Movie, true);

        // Assert
        let hearts: Vec<bool> = state
            .sections
            .iter()
            .flat_map(|s| s.content.cards().iter().map(|c| c.is_favorite))
            .collect();
        assert_eq!(hearts, vec![true, false, false, true, false]);
    }

    #[test]
    fn test_cursor_clamped_when_cards_shrink() {
        // Arrange
        let mut state = loaded_home();
        state.cursor = 5;

        // Act
        state.set_section(
            SectionId::UpcomingMovies,
            SectionContent::Error(String::from(ENGLISH.home_error)),
        );

        // Assert
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn test_navbar_scrolled_threshold() {
        // Arrange
        let mut state = AppState::for_page(Page::Home, &ENGLISH);

        // Act & Assert
        state.scroll_offset = NAVBAR_SCROLL_THRESHOLD;
        assert!(!state.navbar_scrolled());
        state.scroll_offset = NAVBAR_SCROLL_THRESHOLD + 1;
        assert!(state.navbar_scrolled());
    }

    #[test]
    fn test_focused_image_url() {
        // Arrange
        let mut state = loaded_home();

        // Act & Assert
        assert_eq!(
            state.focused_image_url().as_deref(),
            Some("https://example.test/bd.jpg")
        );
        state.move_down();
        assert_eq!(
            state.focused_image_url().as_deref(),
            Some("https://example.test/1.jpg")
        );
    }
}
