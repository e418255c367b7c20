//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 catalog endpoints
//! (popular lists, upcoming releases, multi search and details).

mod api;
mod client;
mod images;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use images::{
    IMAGE_BASE_URL, ORIGINAL_IMAGE_BASE_URL, PLACEHOLDER_IMAGE_URL, backdrop_url, poster_url,
};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    CatalogItem, Genre, ListResponse, MediaDetails, MediaType, ResultKind, SearchResponse,
    SearchResult, TmdbErrorResponse,
};
