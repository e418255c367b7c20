//! cinestream - terminal movie and TV discovery client.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};
use crate::tui::card::{format_rating, format_year};
use crate::tui::{Page, run_tui};
use cinestream_api::tmdb::{ListResponse, MediaDetails, MediaType, TmdbApi, TmdbClient};
use cinestream_store::{FavoritesStore, FileKeyValueStore, MemoryKeyValueStore, resolve_data_dir};

/// Log file written while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "cinestream.log";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run (default: `home`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular and upcoming titles.
    Home,
    /// Search movies and series.
    Search(SearchArgs),
    /// Browse stored favorites.
    Favorites,
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Print stored favorites.
    FavoritesList,
    /// Remove a stored favorite.
    FavoritesRemove(FavoriteArgs),
    /// Config file operations.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Initial query typed into the search box.
    #[arg(long)]
    query: Option<String>,
}

/// Arguments identifying a stored favorite.
#[derive(clap::Args)]
struct FavoriteArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Media type ("movie" or "tv").
    #[arg(long = "type", required = true)]
    media_type: MediaType,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// List popular movies.
    PopularMovies(LanguageArgs),
    /// List popular TV series.
    PopularSeries(LanguageArgs),
    /// List upcoming movies.
    Upcoming(LanguageArgs),
    /// Search movies, series and people.
    Search(TmdbSearchArgs),
    /// Get movie or series details.
    Details(TmdbDetailsArgs),
}

/// Response language override.
#[derive(clap::Args)]
struct LanguageArgs {
    /// Response language (default: `tmdb.language` from config).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Search query (e.g. "Breaking Bad").
    #[arg(long, required = true)]
    query: String,
    /// Response language (default: `tmdb.language` from config).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `tmdb details` subcommand.
#[derive(clap::Args)]
struct TmdbDetailsArgs {
    /// TMDB ID.
    #[arg(long, required = true)]
    id: u64,
    /// Media type ("movie" or "tv").
    #[arg(long = "type", required = true)]
    media_type: MediaType,
    /// Response language (default: `tmdb.language` from config).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print resolved paths and settings.
    Show,
    /// Write a default config file.
    Init,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Resolves the data directory: `--dir`, then `storage.data_dir`, then the default.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
fn resolve_storage_dir(dir: Option<&PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    resolve_data_dir(dir.or(config.storage.data_dir.as_ref()))
        .context("failed to resolve data directory")
}

/// Opens the file-backed favorites store. Falls back to an in-memory store
/// when the data directory cannot be created.
fn open_favorites(data_dir: PathBuf) -> FavoritesStore {
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!(
            dir = %data_dir.display(),
            error = %e,
            "Data directory unavailable, favorites will not persist"
        );
        return FavoritesStore::new(Box::new(MemoryKeyValueStore::new()));
    }
    FavoritesStore::new(Box::new(FileKeyValueStore::new(data_dir)))
}

/// Builds a `TmdbClient` from config and the environment.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Runs the TUI on `page`.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the TUI fails.
async fn run_browser(
    config: AppConfig,
    data_dir: PathBuf,
    page: Page,
    initial_query: Option<String>,
) -> Result<()> {
    let client = build_tmdb_client(&config)?;
    tracing::info!(
        page = page.title(),
        language = %config.tmdb.language,
        data_dir = %data_dir.display(),
        "Launching TUI"
    );
    run_tui(
        Arc::new(client),
        open_favorites(data_dir),
        config.tmdb.language,
        page,
        initial_query,
    )
    .await
    .context("TUI failed")
}

/// Logs a catalog list as a table.
fn log_list(response: &ListResponse, media_type: MediaType) {
    tracing::info!("Total results: {}", response.total_results);
    tracing::info!("ID\tYear\tRating\tTitle");
    for item in &response.results {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            item.id,
            format_year(item.date_for(media_type)),
            format_rating(item.vote_average),
            item.display_title(media_type),
        );
    }
}

/// Runs the `tmdb popular-movies|popular-series|upcoming` subcommands.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_list(
    config: &AppConfig,
    args: &LanguageArgs,
    command: &TmdbSubcommands,
) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let (response, media_type) = match command {
        TmdbSubcommands::PopularSeries(_) => (
            client
                .popular_series(language)
                .await
                .context("TMDB tv/popular request failed")?,
            MediaType::Tv,
        ),
        TmdbSubcommands::Upcoming(_) => (
            client
                .upcoming_movies(language)
                .await
                .context("TMDB movie/upcoming request failed")?,
            MediaType::Movie,
        ),
        _ => (
            client
                .popular_movies(language)
                .await
                .context("TMDB movie/popular request failed")?,
            MediaType::Movie,
        ),
    };

    log_list(&response, media_type);
    Ok(())
}

/// Runs the `tmdb search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_search(config: &AppConfig, args: &TmdbSearchArgs) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let response = client
        .search_multi(&args.query, language)
        .await
        .context("TMDB search/multi request failed")?;

    tracing::info!("Total results: {}", response.total_results);
    tracing::info!("ID\tType\tYear\tRating\tTitle");
    for result in &response.results {
        let Some(media_type) = result.catalog_media_type() else {
            tracing::info!("{}\t-\t-\t-\t(skipped non-media result)", result.item.id);
            continue;
        };
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            result.item.id,
            media_type,
            format_year(result.item.date_for(media_type)),
            format_rating(result.item.vote_average),
            result.item.display_title(media_type),
        );
    }

    Ok(())
}

/// Runs the `tmdb details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_details(config: &AppConfig, args: &TmdbDetailsArgs) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let details: MediaDetails = match args.media_type {
        MediaType::Movie => client
            .movie_details(args.id, language)
            .await
            .context("TMDB movie details request failed")?,
        MediaType::Tv => client
            .tv_details(args.id, language)
            .await
            .context("TMDB tv details request failed")?,
    };

    let media_type = args.media_type;
    tracing::info!("ID: {}", details.id);
    tracing::info!("Title: {}", details.display_title(media_type));
    tracing::info!("Year: {}", format_year(details.date_for(media_type)));
    tracing::info!("Rating: {}/10", format_rating(details.vote_average));
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("Tagline: {tagline}");
    }
    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        tracing::info!("Genres: {}", genres.join(", "));
    }
    match media_type {
        MediaType::Movie => {
            if let Some(runtime) = details.runtime {
                tracing::info!("Runtime: {runtime} min");
            }
        }
        MediaType::Tv => {
            if let Some(seasons) = details.number_of_seasons {
                tracing::info!("Seasons: {seasons}");
            }
        }
    }
    tracing::info!("---");
    tracing::info!("{}", details.overview.as_deref().unwrap_or("-"));

    Ok(())
}

/// Runs the `favorites-list` subcommand.
#[instrument(skip_all)]
fn run_favorites_list(data_dir: PathBuf) {
    let favorites = open_favorites(data_dir);
    let entries = favorites.list();
    if entries.is_empty() {
        tracing::info!("No favorites stored.");
        return;
    }

    tracing::info!("ID\tType\tTitle");
    for entry in &entries {
        tracing::info!("{}\t{}\t{}", entry.id, entry.media_type, entry.title);
    }
    tracing::info!("Total: {} favorites", entries.len());
}

/// Runs the `favorites-remove` subcommand.
#[instrument(skip_all)]
fn run_favorites_remove(data_dir: PathBuf, args: &FavoriteArgs) {
    let mut favorites = open_favorites(data_dir);
    if !favorites.contains(args.id, args.media_type) {
        tracing::info!("Not a favorite: {} {}", args.media_type, args.id);
        return;
    }
    favorites.remove(args.id, args.media_type);
    tracing::info!(
        "Removed {} {} ({} remaining)",
        args.media_type,
        args.id,
        favorites.len()
    );
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if paths cannot be resolved or the config is invalid.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let data_dir = resolve_storage_dir(dir, &config)?;
    let key_source = if std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) {
        API_KEY_ENV
    } else if config.tmdb.api_key.is_some() {
        "config.toml"
    } else {
        "(not set)"
    };

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("Data dir: {}", data_dir.display());
    tracing::info!("Language: {}", config.tmdb.language);
    tracing::info!(
        "Base URL: {}",
        config.tmdb.base_url.as_deref().unwrap_or("(default)")
    );
    tracing::info!("API key: {key_source}");

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or written.
#[instrument(skip_all)]
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }
    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Opens `{data_dir}/cinestream.log` for appending.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be created.
fn open_log_file(data_dir: &Path) -> Result<File> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create directory {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Picks the log writer and whether it takes ANSI colors.
///
/// While the TUI runs logs go to a file under the data dir; when that file
/// cannot be opened they are discarded so the TUI still starts. Other
/// commands log to stdout.
fn log_writer(tui_data_dir: Option<&Path>) -> (BoxMakeWriter, bool) {
    let Some(data_dir) = tui_data_dir else {
        return (BoxMakeWriter::new(std::io::stdout), true);
    };
    match open_log_file(data_dir) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
        Err(_) => (BoxMakeWriter::new(std::io::sink), false),
    }
}

/// Installs the global tracing subscriber.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    let command = cli.command.unwrap_or(Commands::Home);

    let config = load_config(dir)?;
    let data_dir = resolve_storage_dir(dir, &config)?;
    let tui_page = match &command {
        Commands::Home => Some(Page::Home),
        Commands::Search(_) => Some(Page::Search),
        Commands::Favorites => Some(Page::Favorites),
        _ => None,
    };

    let (writer, ansi) = log_writer(tui_page.map(|_| data_dir.as_path()));
    init_tracing(writer, ansi);

    match command {
        Commands::Home | Commands::Favorites => {
            let page = tui_page.unwrap_or(Page::Home);
            run_browser(config, data_dir, page, None).await
        }
        Commands::Search(args) => run_browser(config, data_dir, Page::Search, args.query).await,
        Commands::Tmdb(tmdb) => match &tmdb.command {
            TmdbSubcommands::PopularMovies(args)
            | TmdbSubcommands::PopularSeries(args)
            | TmdbSubcommands::Upcoming(args) => run_tmdb_list(&config, args, &tmdb.command).await,
            TmdbSubcommands::Search(args) => run_tmdb_search(&config, args).await,
            TmdbSubcommands::Details(args) => run_tmdb_details(&config, args).await,
        },
        Commands::FavoritesList => {
            run_favorites_list(data_dir);
            Ok(())
        }
        Commands::FavoritesRemove(args) => {
            run_favorites_remove(data_dir, &args);
            Ok(())
        }
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Init => run_config_init(dir),
        },
    }
}
