//! Web layer module
//!
//! This module provides the HTTP interface for the listings proxy. Handlers
//! are thin: they validate path and query parameters, build a [`Query`] and
//! hand it to the shared [`SourceResolver`] with the matching adapter chain.
//!
//! # Architecture
//!
//! - **Handlers**: one module per endpoint group
//! - **Responses**: response bodies and the single `AppError` to status mapping
//! - **Extractors**: request parameter parsing and validation

use anyhow::Result;
use axum::{routing::get, Router};
use chrono_tz::Tz;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::Query;
use crate::resolver::SourceResolver;
use crate::sources::{factory::summarize, AdapterFactory, AdapterSummary, SourceAdapter};
use crate::utils::parse_timezone;

pub mod extractors;
pub mod handlers;
pub mod responses;

pub use responses::{handle_error, Lookup, MovieListingResponse, ScheduleResponse};

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, state: AppState) -> Result<Self> {
        let app = create_router(state);
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/schedule/:entity/:date", get(handlers::schedule::get_schedule))
        .route("/movies/:postal_code/:date", get(handlers::movies::get_movies))
        .route("/current-time", get(handlers::clock::current_time))
        .route("/sources", get(handlers::sources::list_sources))
}

/// Application state shared across all handlers
///
/// Chains are built once at startup; adapters are stateless so every request
/// shares them.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SourceResolver>,
    pub schedule_chain: Arc<[Arc<dyn SourceAdapter>]>,
    pub movie_chain: Arc<[Arc<dyn SourceAdapter>]>,
    pub clock_timezone: Tz,
}

impl AppState {
    pub fn new(
        resolver: SourceResolver,
        schedule_chain: Vec<Arc<dyn SourceAdapter>>,
        movie_chain: Vec<Arc<dyn SourceAdapter>>,
        clock_timezone: Tz,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            schedule_chain: Arc::from(schedule_chain),
            movie_chain: Arc::from(movie_chain),
            clock_timezone,
        }
    }

    /// Build resolver and both chains from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let factory = AdapterFactory::new(config)?;
        let schedule_chain = factory.schedule_chain()?;
        let movie_chain = factory.movie_chain()?;
        let clock_timezone =
            parse_timezone(config.resolver.clock_timezone()).map_err(AppError::configuration)?;

        info!(
            "Schedule chain: [{}]; movie chain: [{}]",
            chain_names(&schedule_chain),
            chain_names(&movie_chain)
        );

        Ok(Self::new(
            SourceResolver::new(&config.resolver)?,
            schedule_chain,
            movie_chain,
            clock_timezone,
        ))
    }

    /// Resolve a schedule query against the schedule chain
    pub async fn lookup_schedule(&self, query: &Query) -> AppResult<Lookup<ScheduleResponse>> {
        let outcome = self.resolver.resolve(query, &self.schedule_chain).await?;
        Ok(Lookup::from_outcome(query, outcome, ScheduleResponse::new))
    }

    /// Resolve a movie query against the movie chain
    pub async fn lookup_movies(&self, query: &Query) -> AppResult<Lookup<MovieListingResponse>> {
        let outcome = self.resolver.resolve(query, &self.movie_chain).await?;
        Ok(Lookup::from_outcome(query, outcome, MovieListingResponse::new))
    }

    pub fn schedule_sources(&self) -> Vec<AdapterSummary> {
        summarize(&self.schedule_chain)
    }

    pub fn movie_sources(&self) -> Vec<AdapterSummary> {
        summarize(&self.movie_chain)
    }
}

fn chain_names(chain: &[Arc<dyn SourceAdapter>]) -> String {
    chain
        .iter()
        .map(|adapter| adapter.name())
        .collect::<Vec<_>>()
        .join(", ")
}
