//! onesdk - command-line client for The One API.

/// Application configuration (TOML).
mod config;
/// Row rendering for API records.
mod output;

use std::path::{Path, PathBuf};
use std::pin::pin;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{ApiConfig, AppConfig};
use crate::output::TableRow;
use onesdk_api::{ClientPage, DEFAULT_BASE_URL, OneApiClient, PaginatedParams};

/// Environment variable holding the API token.
const TOKEN_ENV: &str = "ONE_API_TOKEN";
/// Environment variable overriding the API base URL.
const BASE_URL_ENV: &str = "ONE_API_BASE_URL";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query books.
    Book(BookCommand),
    /// Query movies.
    Movie(MovieCommand),
    /// Query characters.
    Character(CharacterCommand),
    /// Query quotes.
    Quote(QuoteCommand),
    /// Query chapters.
    Chapter(ChapterCommand),
    /// Manage the local configuration.
    Config(ConfigCommand),
}

/// Arguments for fetching one record.
#[derive(clap::Args)]
struct GetArgs {
    /// Record ID.
    #[arg(long)]
    id: String,
}

/// Arguments shared by every listing.
#[derive(clap::Args)]
struct ListArgs {
    /// Maximum number of documents per page.
    #[arg(long)]
    limit: Option<u32>,

    /// Page number (1-based, default: 1).
    #[arg(long)]
    page: Option<u32>,

    /// Sort expression, e.g. "name:asc".
    #[arg(long)]
    sort: Option<String>,

    /// Raw filter expression sent as-is, e.g. "name=/Ring/i".
    #[arg(long)]
    filter: Option<String>,

    /// Follow pages until the last one.
    #[arg(long)]
    all: bool,
}

impl ListArgs {
    /// Builds the request parameters.
    fn to_params(&self) -> PaginatedParams {
        let mut params = PaginatedParams::new();
        if let Some(limit) = self.limit {
            params = params.limit(limit);
        }
        if let Some(page) = self.page {
            params = params.page(page);
        }
        if let Some(sort) = &self.sort {
            params = params.sort(sort);
        }
        if let Some(filter) = &self.filter {
            params = params.filter(filter);
        }
        params
    }
}

/// Arguments for listing records related to a parent record.
#[derive(clap::Args)]
struct RelatedArgs {
    /// Parent record ID.
    #[arg(long)]
    id: String,

    /// Listing options.
    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `book` subcommand.
#[derive(clap::Args)]
struct BookCommand {
    /// Book subcommand to run.
    #[command(subcommand)]
    command: BookSubcommands,
}

/// Available book subcommands.
#[derive(Subcommand)]
enum BookSubcommands {
    /// Fetch one book.
    Get(GetArgs),
    /// List books.
    List(ListArgs),
    /// List the chapters of a book.
    Chapters(RelatedArgs),
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieCommand {
    /// Movie subcommand to run.
    #[command(subcommand)]
    command: MovieSubcommands,
}

/// Available movie subcommands.
#[derive(Subcommand)]
enum MovieSubcommands {
    /// Fetch one movie.
    Get(GetArgs),
    /// List movies.
    List(ListArgs),
    /// List the quotes of a movie.
    Quotes(RelatedArgs),
}

/// Arguments for the `character` subcommand.
#[derive(clap::Args)]
struct CharacterCommand {
    /// Character subcommand to run.
    #[command(subcommand)]
    command: CharacterSubcommands,
}

/// Available character subcommands.
#[derive(Subcommand)]
enum CharacterSubcommands {
    /// Fetch one character.
    Get(GetArgs),
    /// List characters.
    List(ListArgs),
    /// List the quotes of a character.
    Quotes(RelatedArgs),
}

/// Arguments for the `quote` subcommand.
#[derive(clap::Args)]
struct QuoteCommand {
    /// Quote subcommand to run.
    #[command(subcommand)]
    command: LeafSubcommands,
}

/// Arguments for the `chapter` subcommand.
#[derive(clap::Args)]
struct ChapterCommand {
    /// Chapter subcommand to run.
    #[command(subcommand)]
    command: LeafSubcommands,
}

/// Subcommands of resources without nested listings.
#[derive(Subcommand)]
enum LeafSubcommands {
    /// Fetch one record.
    Get(GetArgs),
    /// List records.
    List(ListArgs),
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
    /// Store the API token in the config file.
    SetToken(SetTokenArgs),
    /// Show the effective configuration.
    Show,
}

/// Arguments for the `config set-token` subcommand.
#[derive(clap::Args)]
struct SetTokenArgs {
    /// Bearer token from <https://the-one-api.dev/sign-up>.
    #[arg(long)]
    token: String,
}

/// Reads an environment variable, treating an empty value as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Picks the token: environment first, then config.
///
/// # Errors
///
/// Returns an error if neither source provides a token.
fn resolve_token(from_env: Option<String>, config: &ApiConfig) -> Result<String> {
    from_env
        .or_else(|| config.token.clone())
        .filter(|t| !t.is_empty())
        .with_context(|| {
            format!("no API token found: set {TOKEN_ENV} or run `onesdk config set-token --token <TOKEN>`")
        })
}

/// Picks the base URL: environment first, then config, then the public API.
///
/// # Errors
///
/// Returns an error if the chosen value is not a valid URL.
fn resolve_base_url(from_env: Option<String>, config: &ApiConfig) -> Result<Url> {
    let raw = from_env
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| String::from(DEFAULT_BASE_URL));
    Url::parse(&raw).with_context(|| format!("invalid base URL: {raw}"))
}

/// Builds the API client from environment and config.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, no token is available,
/// or the client fails to build.
fn build_client(dir: Option<&Path>) -> Result<OneApiClient> {
    let config_path = AppConfig::resolve_path(dir)?;
    let config = AppConfig::load(&config_path)?;

    let token = resolve_token(env_value(TOKEN_ENV), &config.api)?;
    let base_url = resolve_base_url(env_value(BASE_URL_ENV), &config.api)?;

    OneApiClient::builder(token)
        .base_url(base_url)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build The One API client")
}

/// Prints one record.
fn print_record<T: TableRow>(record: &T) {
    tracing::info!("{}", T::HEADER);
    tracing::info!("{}", record.row());
}

/// Prints the records of one page.
fn print_page<T: TableRow>(page: &ClientPage<'_, T>) {
    tracing::info!(
        "Page {}/{} (total: {}, limit: {})",
        page.page_number(),
        page.pages(),
        page.total(),
        page.limit()
    );
    tracing::info!("{}", T::HEADER);
    for record in page.items() {
        tracing::info!("{}", record.row());
    }
}

/// Prints `first`, and every following page when `all` is set.
///
/// # Errors
///
/// Returns an error if fetching a following page fails.
async fn print_pages<'c, T>(first: ClientPage<'c, T>, all: bool) -> Result<()>
where
    T: TableRow + DeserializeOwned + Send + 'c,
{
    if !all {
        print_page(&first);
        return Ok(());
    }

    let mut pages = pin!(first.into_stream());
    let mut fetched = 0_usize;
    while let Some(page) = pages
        .try_next()
        .await
        .context("The One API page request failed")?
    {
        fetched = fetched.saturating_add(page.items().len());
        print_page(&page);
    }
    tracing::info!("Fetched {fetched} records");

    Ok(())
}

/// Runs the `book` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_book(cmd: &BookCommand, dir: Option<&Path>) -> Result<()> {
    let client = build_client(dir)?;
    match &cmd.command {
        BookSubcommands::Get(args) => {
            let book = client
                .book(&args.id)
                .await
                .context("The One API book request failed")?;
            print_record(&book);
            Ok(())
        }
        BookSubcommands::List(args) => {
            let page = client
                .books(&args.to_params())
                .await
                .context("The One API book list request failed")?;
            print_pages(page, args.all).await
        }
        BookSubcommands::Chapters(args) => {
            let page = client
                .book_chapters(&args.id, &args.list.to_params())
                .await
                .context("The One API book chapters request failed")?;
            print_pages(page, args.list.all).await
        }
    }
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_movie(cmd: &MovieCommand, dir: Option<&Path>) -> Result<()> {
    let client = build_client(dir)?;
    match &cmd.command {
        MovieSubcommands::Get(args) => {
            let movie = client
                .movie(&args.id)
                .await
                .context("The One API movie request failed")?;
            print_record(&movie);
            Ok(())
        }
        MovieSubcommands::List(args) => {
            let page = client
                .movies(&args.to_params())
                .await
                .context("The One API movie list request failed")?;
            print_pages(page, args.all).await
        }
        MovieSubcommands::Quotes(args) => {
            let page = client
                .movie_quotes(&args.id, &args.list.to_params())
                .await
                .context("The One API movie quotes request failed")?;
            print_pages(page, args.list.all).await
        }
    }
}

/// Runs the `character` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_character(cmd: &CharacterCommand, dir: Option<&Path>) -> Result<()> {
    let client = build_client(dir)?;
    match &cmd.command {
        CharacterSubcommands::Get(args) => {
            let character = client
                .character(&args.id)
                .await
                .context("The One API character request failed")?;
            print_record(&character);
            Ok(())
        }
        CharacterSubcommands::List(args) => {
            let page = client
                .characters(&args.to_params())
                .await
                .context("The One API character list request failed")?;
            print_pages(page, args.all).await
        }
        CharacterSubcommands::Quotes(args) => {
            let page = client
                .character_quotes(&args.id, &args.list.to_params())
                .await
                .context("The One API character quotes request failed")?;
            print_pages(page, args.list.all).await
        }
    }
}

/// Runs the `quote` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_quote(cmd: &QuoteCommand, dir: Option<&Path>) -> Result<()> {
    let client = build_client(dir)?;
    match &cmd.command {
        LeafSubcommands::Get(args) => {
            let quote = client
                .quote(&args.id)
                .await
                .context("The One API quote request failed")?;
            print_record(&quote);
            Ok(())
        }
        LeafSubcommands::List(args) => {
            let page = client
                .quotes(&args.to_params())
                .await
                .context("The One API quote list request failed")?;
            print_pages(page, args.all).await
        }
    }
}

/// Runs the `chapter` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_chapter(cmd: &ChapterCommand, dir: Option<&Path>) -> Result<()> {
    let client = build_client(dir)?;
    match &cmd.command {
        LeafSubcommands::Get(args) => {
            let chapter = client
                .chapter(&args.id)
                .await
                .context("The One API chapter request failed")?;
            print_record(&chapter);
            Ok(())
        }
        LeafSubcommands::List(args) => {
            let page = client
                .chapters(&args.to_params())
                .await
                .context("The One API chapter list request failed")?;
            print_pages(page, args.all).await
        }
    }
}

/// Trailing token characters left readable by `config show`.
const VISIBLE_TOKEN_CHARS: usize = 4;

/// Masks all but the last four characters of a token; short tokens are
/// masked entirely.
fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    let hidden = if count <= VISIBLE_TOKEN_CHARS {
        count
    } else {
        count.saturating_sub(VISIBLE_TOKEN_CHARS)
    };
    let tail: String = token.chars().skip(hidden).collect();
    format!("{}{tail}", "*".repeat(hidden))
}

/// Runs the `config set-token` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
fn run_config_set_token(args: &SetTokenArgs, dir: Option<&Path>) -> Result<()> {
    if args.token.trim().is_empty() {
        bail!("token must not be empty");
    }

    let config_path = AppConfig::resolve_path(dir)?;
    let mut config = AppConfig::load(&config_path)?;
    config.api.token = Some(String::from(args.token.trim()));
    config.save(&config_path)?;

    tracing::info!("Saved token to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let config_path = AppConfig::resolve_path(dir)?;
    let config = AppConfig::load(&config_path)?;

    let env_token = env_value(TOKEN_ENV);
    let token = match (&env_token, &config.api.token) {
        (Some(t), _) => format!("{} (from {TOKEN_ENV})", mask_token(t)),
        (None, Some(t)) => format!("{} (from config)", mask_token(t)),
        (None, None) => String::from("<not set>"),
    };
    let base_url = resolve_base_url(env_value(BASE_URL_ENV), &config.api)?;

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("Token:       {token}");
    tracing::info!("Base URL:    {base_url}");
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match &cli.command {
        Commands::Book(cmd) => run_book(cmd, dir).await,
        Commands::Movie(cmd) => run_movie(cmd, dir).await,
        Commands::Character(cmd) => run_character(cmd, dir).await,
        Commands::Quote(cmd) => run_quote(cmd, dir).await,
        Commands::Chapter(cmd) => run_chapter(cmd, dir).await,
        Commands::Config(cfg) => match &cfg.command {
            ConfigSubcommands::SetToken(args) => run_config_set_token(args, dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}
