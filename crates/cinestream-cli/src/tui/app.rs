//! Controller: owns the page state and turns actions and fetch outcomes
//! into state changes.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use cinestream_api::tmdb::{ListResponse, MediaDetails, MediaType, SearchResponse, TmdbApi};
use cinestream_store::FavoritesStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::UnboundedSender;

use super::card::{Card, DetailsModal, Hero, ModalButton};
use super::keymap::Action;
use super::search::SearchDecision;
use super::state::{AppState, HOME_SECTION_LIMIT, Page, SectionContent, SectionId};
use super::text::{self, Messages};

/// Services shared by every page, built once at startup.
#[derive(Debug)]
pub struct AppContext<C> {
    /// Catalog client.
    pub api: Arc<C>,
    /// Favorites persistence.
    pub favorites: FavoritesStore,
    /// Response language for every catalog query.
    pub language: String,
    /// Where spawned fetches report back.
    pub outcomes: UnboundedSender<FetchOutcome>,
}

/// The three home lists, fetched together.
#[derive(Debug)]
pub struct HomeData {
    /// Popular movies.
    pub movies: ListResponse,
    /// Popular series.
    pub series: ListResponse,
    /// Upcoming movies.
    pub upcoming: ListResponse,
}

/// Result of a spawned fetch. `generation` identifies the page load that
/// issued it.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Home lists.
    Home {
        /// Page load generation.
        generation: u64,
        /// All three lists, or the first failure.
        result: Result<HomeData>,
    },
    /// Multi search.
    Search {
        /// Page load generation.
        generation: u64,
        /// Query sequence number.
        seq: u64,
        /// Raw search response.
        result: Result<SearchResponse>,
    },
    /// Details for the popup.
    Details {
        /// Page load generation.
        generation: u64,
        /// Details request sequence number.
        seq: u64,
        /// Requested ID.
        id: u64,
        /// Requested media type.
        media_type: MediaType,
        /// Details response.
        result: Result<MediaDetails>,
    },
}

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep running.
    Continue,
    /// Exit the TUI.
    Quit,
}

/// Page controller.
#[derive(Debug)]
pub struct App<C> {
    ctx: AppContext<C>,
    /// Current page state (read by the renderer).
    pub state: AppState,
    rng: StdRng,
    text: &'static Messages,
    generation: u64,
    details_seq: u64,
}

impl<C> App<C>
where
    C: TmdbApi + Send + Sync + 'static,
{
    /// Creates a controller on `page`. Call [`App::start`] to begin loading.
    #[must_use]
    pub fn new(ctx: AppContext<C>, page: Page) -> Self {
        Self::with_rng(ctx, page, StdRng::from_entropy())
    }

    /// Same as [`App::new`] with an explicit hero RNG.
    #[must_use]
    pub fn with_rng(ctx: AppContext<C>, page: Page, rng: StdRng) -> Self {
        let text = text::for_language(&ctx.language);
        Self {
            ctx,
            state: AppState::for_page(page, text),
            rng,
            text,
            generation: 0,
            details_seq: 0,
        }
    }

    /// Loads the current page from scratch.
    pub fn start(&mut self) {
        let page = self.state.page;
        self.navigate(page);
    }

    /// Prefills the search box. The query runs once the debounce settles.
    pub fn prefill_search(&mut self, query: String, now: Instant) {
        if let Some(search) = self.state.search.as_mut() {
            search.editing = false;
            search.set_input(query, now);
        }
    }

    /// Full reload into `page`. Everything from the previous page is
    /// dropped and its in-flight fetches become stale.
    pub fn navigate(&mut self, page: Page) {
        self.generation = self.generation.saturating_add(1);
        self.state = AppState::for_page(page, self.text);
        tracing::info!(page = page.title(), generation = self.generation, "Loading page");

        match page {
            Page::Home => self.spawn_home(),
            Page::Search => {}
            Page::Favorites => self.render_favorites(),
        }
    }

    /// Handles one action tag.
    pub fn dispatch(&mut self, action: Action, now: Instant) -> Control {
        if action == Action::Quit {
            return Control::Quit;
        }
        if self.state.alert.is_some() {
            if action == Action::DismissAlert {
                self.state.alert = None;
            }
            return Control::Continue;
        }
        if self.state.modal.is_some() {
            self.dispatch_modal(action);
            return Control::Continue;
        }

        match action {
            Action::MoveUp => self.state.move_up(),
            Action::MoveDown => self.state.move_down(),
            Action::NextSection => self.state.next_section(),
            Action::PrevSection => self.state.prev_section(),
            Action::Info => self.open_details(),
            Action::ToggleFavorite => self.toggle_favorite(),
            Action::Play => self.show_alert(self.text.playback),
            Action::OpenPoster => self.open_poster(),
            Action::OpenSearch => {
                if let Some(search) = self.state.search.as_mut() {
                    search.editing = true;
                } else {
                    self.navigate(Page::Search);
                }
            }
            Action::Navigate(page) => self.navigate(page),
            Action::Input(c) => {
                if let Some(search) = self.state.search.as_mut() {
                    search.push(c, now);
                }
            }
            Action::Backspace => {
                if let Some(search) = self.state.search.as_mut() {
                    search.pop(now);
                }
            }
            Action::EndEditing => {
                if let Some(search) = self.state.search.as_mut() {
                    search.editing = false;
                }
            }
            Action::CloseModal
            | Action::ModalSwitchButton
            | Action::ModalActivate
            | Action::DismissAlert
            | Action::Quit => {}
        }
        Control::Continue
    }

    /// Popup input. The page underneath ignores everything else.
    fn dispatch_modal(&mut self, action: Action) {
        match action {
            Action::CloseModal => self.state.modal = None,
            Action::ModalSwitchButton => {
                if let Some(modal) = self.state.modal.as_mut() {
                    modal.toggle_focus();
                }
            }
            Action::ModalActivate => match self.state.modal.as_ref().map(|m| m.focused) {
                Some(ModalButton::Play) => self.show_alert(self.text.playback),
                Some(ModalButton::Close) => self.state.modal = None,
                None => {}
            },
            Action::Play => self.show_alert(self.text.playback),
            _ => {}
        }
    }

    /// Advances time-driven state (the search debounce).
    pub fn tick(&mut self, now: Instant) {
        let Some(decision) = self.state.search.as_mut().and_then(|s| s.poll(now)) else {
            return;
        };
        match decision {
            SearchDecision::TooShort => {
                self.state.set_section(
                    SectionId::SearchResults,
                    SectionContent::Notice(String::from(self.text.search_prompt)),
                );
            }
            SearchDecision::Query { query, seq } => {
                self.state.set_section(
                    SectionId::SearchResults,
                    SectionContent::Loading(String::from(self.text.searching)),
                );
                self.spawn_search(query, seq);
            }
        }
    }

    /// Applies a fetch outcome. Outcomes from an earlier page load, and
    /// search or details responses older than the latest request, are
    /// discarded.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Home { generation, result } => {
                if self.is_stale(generation) {
                    return;
                }
                self.apply_home(result);
            }
            FetchOutcome::Search {
                generation,
                seq,
                result,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                if !self.state.search.as_ref().is_some_and(|s| s.is_current(seq)) {
                    tracing::debug!(seq, "Discarding stale search response");
                    return;
                }
                self.apply_search(result);
            }
            FetchOutcome::Details {
                generation,
                seq,
                id,
                media_type,
                result,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                if seq != self.details_seq {
                    tracing::debug!(seq, id, "Discarding stale details response");
                    return;
                }
                match result {
                    Ok(details) => {
                        let modal = DetailsModal::from_details(&details, id, media_type, self.text);
                        self.state.modal = Some(modal);
                    }
                    Err(e) => {
                        tracing::error!(id, %media_type, error = %e, "Error loading details");
                        self.show_alert(self.text.details_error);
                    }
                }
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = generation != self.generation;
        if stale {
            tracing::debug!(generation, current = self.generation, "Discarding outcome");
        }
        stale
    }

    fn apply_home(&mut self, result: Result<HomeData>) {
        let text = self.text;
        let data = match result {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Error loading home page");
                for id in Page::Home.sections() {
                    self.state
                        .set_section(*id, SectionContent::Error(String::from(text.home_error)));
                }
                return;
            }
        };
        tracing::info!(
            movies = data.movies.results.len(),
            series = data.series.results.len(),
            upcoming = data.upcoming.results.len(),
            "Home data loaded"
        );

        let stored = self.ctx.favorites.list();
        let section = |list: &ListResponse, media_type: MediaType| {
            if list.results.is_empty() {
                return SectionContent::Notice(String::from(text.empty_section));
            }
            SectionContent::Cards(
                list.results
                    .iter()
                    .take(HOME_SECTION_LIMIT)
                    .map(|item| Card::from_item(item, media_type, &stored))
                    .collect(),
            )
        };
        let movies = section(&data.movies, MediaType::Movie);
        let series = section(&data.series, MediaType::Tv);
        let upcoming = section(&data.upcoming, MediaType::Movie);

        self.state.hero = Hero::choose(&data.movies.results, &mut self.rng, text);
        self.state.set_section(SectionId::PopularMovies, movies);
        self.state.set_section(SectionId::PopularSeries, series);
        self.state.set_section(SectionId::UpcomingMovies, upcoming);
    }

    fn apply_search(&mut self, result: Result<SearchResponse>) {
        let text = self.text;
        let content = match result {
            Ok(response) if response.results.is_empty() => {
                SectionContent::Notice(String::from(text.no_results))
            }
            Ok(response) => {
                let stored = self.ctx.favorites.list();
                let cards: Vec<Card> = response
                    .results
                    .iter()
                    .filter_map(|r| {
                        r.catalog_media_type()
                            .map(|t| Card::from_item(&r.item, t, &stored))
                    })
                    .collect();
                if cards.is_empty() {
                    SectionContent::Notice(String::from(text.no_media_results))
                } else {
                    SectionContent::Cards(cards)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Search error");
                SectionContent::Error(String::from(text.search_error))
            }
        };
        self.state.set_section(SectionId::SearchResults, content);
    }

    fn render_favorites(&mut self) {
        let entries = self.ctx.favorites.list();
        let content = if entries.is_empty() {
            SectionContent::Notice(String::from(self.text.no_favorites))
        } else {
            SectionContent::Cards(entries.iter().map(Card::from_favorite).collect())
        };
        self.state.set_section(SectionId::Favorites, content);
    }

    /// Store-driven toggle: the store decides the current state, the heart
    /// is re-derived from it afterwards.
    fn toggle_favorite(&mut self) {
        let Some(card) = self.state.focused_card().cloned() else {
            return;
        };
        let favorites = &mut self.ctx.favorites;
        if favorites.contains(card.id, card.media_type) {
            favorites.remove(card.id, card.media_type);
        } else {
            favorites.add(card.to_favorite_entry());
        }
        let is_favorite = favorites.contains(card.id, card.media_type);
        self.state
            .set_favorite_flag(card.id, card.media_type, is_favorite);
    }

    fn open_details(&mut self) {
        let Some((id, media_type)) = self.state.focused_target() else {
            return;
        };
        self.details_seq = self.details_seq.saturating_add(1);
        let seq = self.details_seq;
        let api = Arc::clone(&self.ctx.api);
        let language = self.ctx.language.clone();
        let outcomes = self.ctx.outcomes.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = match media_type {
                MediaType::Movie => api.movie_details(id, &language).await,
                MediaType::Tv => api.tv_details(id, &language).await,
            };
            // Receiver gone means the TUI is shutting down.
            let _ = outcomes.send(FetchOutcome::Details {
                generation,
                seq,
                id,
                media_type,
                result,
            });
        });
    }

    fn spawn_home(&self) {
        let api = Arc::clone(&self.ctx.api);
        let language = self.ctx.language.clone();
        let outcomes = self.ctx.outcomes.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = tokio::try_join!(
                api.popular_movies(&language),
                api.popular_series(&language),
                api.upcoming_movies(&language),
            )
            .map(|(movies, series, upcoming)| HomeData {
                movies,
                series,
                upcoming,
            });
            let _ = outcomes.send(FetchOutcome::Home { generation, result });
        });
    }

    fn spawn_search(&self, query: String, seq: u64) {
        let api = Arc::clone(&self.ctx.api);
        let language = self.ctx.language.clone();
        let outcomes = self.ctx.outcomes.clone();
        let generation = self.generation;
        tracing::debug!(%query, seq, "Searching");
        tokio::spawn(async move {
            let result = api.search_multi(&query, &language).await;
            let _ = outcomes.send(FetchOutcome::Search {
                generation,
                seq,
                result,
            });
        });
    }

    fn open_poster(&self) {
        let Some(url) = self.state.focused_image_url() else {
            return;
        };
        tracing::debug!(%url, "Opening image in browser");
        if let Err(e) = open::that_detached(&url) {
            tracing::warn!(%url, error = %e, "Failed to open browser");
        }
    }

    fn show_alert(&mut self, message: &str) {
        self.state.alert = Some(String::from(message));
    }
}
