use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listings_proxy::{
    config::Config,
    models::Query,
    web::{extractors::parse_date_param, handlers::sources::SourcesResponse, AppState, Lookup, WebServer},
};

#[derive(Parser)]
#[command(name = "listings-proxy")]
#[command(version)]
#[command(about = "TV schedule and movie listing service with multi-provider fallback")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP", global = true)]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT", global = true)]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Resolve one network schedule and print it as JSON
    Schedule {
        /// Network code, e.g. nbc
        entity: String,
        /// YYYY-MM-DD, defaults to today
        date: Option<String>,
    },
    /// Resolve movie showtimes near a postal code and print them as JSON
    Movies {
        postal_code: String,
        /// YYYY-MM-DD, defaults to today
        date: Option<String>,
        /// Search radius in miles
        #[arg(short, long)]
        radius: Option<u32>,
    },
    /// Print the configured adapter chains
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("listings_proxy={},tower_http=trace", cli.log_level)
    } else {
        format!("listings_proxy={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let state = AppState::from_config(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Listings Proxy v{}", env!("CARGO_PKG_VERSION"));
            let web_server = WebServer::new(&config, state)?;
            info!(
                "Starting web server on {}:{}",
                web_server.host(),
                web_server.port()
            );
            web_server.serve().await?;
        }
        Command::Schedule { entity, date } => {
            let query = Query::new(entity, resolve_date(date.as_deref())?)?;
            let lookup = state.lookup_schedule(&query).await?;
            print_lookup(&lookup)?;
        }
        Command::Movies {
            postal_code,
            date,
            radius,
        } => {
            let mut query = Query::new(&postal_code, resolve_date(date.as_deref())?)?
                .with_postal_code(postal_code.as_str());
            if let Some(radius) = radius {
                query = query.with_radius(radius);
            }
            let lookup = state.lookup_movies(&query).await?;
            print_lookup(&lookup)?;
        }
        Command::Sources => {
            println!(
                "{}",
                serde_json::to_string_pretty(&SourcesResponse::from_state(&state))?
            );
        }
    }

    Ok(())
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(date) => Ok(parse_date_param(date)?),
        None => Ok(Local::now().date_naive()),
    }
}

/// Print the response body; a terminal failure also exits non-zero
fn print_lookup<T: Serialize>(lookup: &Lookup<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&lookup.to_json()?)?);
    if !lookup.is_found() {
        anyhow::bail!("no source produced listings");
    }
    Ok(())
}
