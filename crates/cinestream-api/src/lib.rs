//! API client library for cinestream.
//!
//! Provides the TMDB metadata client used to browse and search
//! movies and TV series.

/// TMDB API client.
pub mod tmdb;
